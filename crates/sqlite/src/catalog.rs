// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Catalog queries.
//!
//! Reads `sqlite_schema` and the pragma table-valued functions and maps the
//! raw rows into the typed snapshot records immediately — stringly-typed
//! metadata handling stops at this module boundary.

use std::collections::BTreeMap;

use rewinddb_catalog::{CascadeRelation, CatalogColumn, CatalogSnapshot, CatalogTable};
use rewinddb_core::{Error, LOG_TABLE, Result};
use rusqlite::{Connection, params};

/// Read a fresh schema snapshot for one open connection.
///
/// The rewind log's own table and `sqlite_%` internals are excluded. Any
/// metadata query failure aborts with `CatalogUnavailable`.
pub fn read_snapshot(connection: &Connection) -> Result<CatalogSnapshot> {
	let names = table_names(connection)?;

	let mut tables = Vec::with_capacity(names.len());
	let mut cascades = Vec::new();
	for name in &names {
		tables.push(CatalogTable::new(name.clone(), columns(connection, name)?));
		cascades.extend(cascade_relations(connection, name)?);
	}

	Ok(CatalogSnapshot::new(tables, cascades))
}

fn table_names(connection: &Connection) -> Result<Vec<String>> {
	let sql = "SELECT \"name\" FROM \"sqlite_schema\" \
		 WHERE \"type\" = 'table' AND \"name\" NOT LIKE 'sqlite_%' AND \"name\" <> ?1 \
		 ORDER BY \"name\"";

	let mut statement = connection.prepare(sql).map_err(catalog_error)?;
	let rows = statement.query_map(params![LOG_TABLE], |row| row.get(0)).map_err(catalog_error)?;
	rows.collect::<rusqlite::Result<Vec<String>>>().map_err(catalog_error)
}

fn columns(connection: &Connection, table: &str) -> Result<Vec<CatalogColumn>> {
	// hidden: 0 = ordinary, 1 = vtab-hidden, 2 = generated virtual,
	// 3 = generated stored.
	let sql = "SELECT \"name\", \"type\", \"hidden\" FROM pragma_table_xinfo(?1) ORDER BY \"cid\"";

	let mut statement = connection.prepare(sql).map_err(catalog_error)?;
	let rows = statement
		.query_map(params![table], |row| {
			Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?, row.get::<_, i64>(2)?))
		})
		.map_err(catalog_error)?;

	let mut columns = Vec::new();
	for row in rows {
		let (name, declared, hidden) = row.map_err(catalog_error)?;
		if hidden == 1 {
			continue;
		}
		columns.push(CatalogColumn::new(name, &declared, hidden == 2 || hidden == 3));
	}
	Ok(columns)
}

fn cascade_relations(connection: &Connection, child: &str) -> Result<Vec<CascadeRelation>> {
	let sql = "SELECT \"id\", \"table\", \"from\", \"to\", \"on_delete\" \
		 FROM pragma_foreign_key_list(?1) ORDER BY \"id\", \"seq\"";

	let mut statement = connection.prepare(sql).map_err(catalog_error)?;
	let rows = statement
		.query_map(params![child], |row| {
			Ok((
				row.get::<_, i64>(0)?,
				row.get::<_, String>(1)?,
				row.get::<_, String>(2)?,
				row.get::<_, Option<String>>(3)?,
				row.get::<_, String>(4)?,
			))
		})
		.map_err(catalog_error)?;

	// Group the per-column rows by foreign-key id, keeping column order.
	let mut grouped: BTreeMap<i64, (String, Vec<(String, Option<String>)>)> = BTreeMap::new();
	for row in rows {
		let (id, parent, from, to, on_delete) = row.map_err(catalog_error)?;
		if !on_delete.eq_ignore_ascii_case("CASCADE") {
			continue;
		}
		grouped.entry(id).or_insert_with(|| (parent, Vec::new())).1.push((from, to));
	}

	let mut relations = Vec::new();
	for (_, (parent, pairs)) in grouped {
		relations.push(CascadeRelation::new(child, parent.clone(), resolve_pairs(connection, &parent, pairs)?));
	}
	Ok(relations)
}

/// A foreign key that references a parent without naming columns points at
/// the parent's primary key; resolve those pairs positionally.
fn resolve_pairs(
	connection: &Connection,
	parent: &str,
	pairs: Vec<(String, Option<String>)>,
) -> Result<Vec<(String, String)>> {
	if pairs.iter().all(|(_, to)| to.is_some()) {
		return Ok(pairs.into_iter().map(|(from, to)| (from, to.expect("checked above"))).collect());
	}

	let key = primary_key_columns(connection, parent)?;
	if key.len() != pairs.len() {
		return Err(Error::CatalogUnavailable {
			reason: format!(
				"cannot resolve implicit referenced columns of `{parent}`: key has {} column(s), foreign key has {}",
				key.len(),
				pairs.len()
			),
		});
	}

	Ok(pairs.into_iter().zip(key).map(|((from, _), to)| (from, to)).collect())
}

fn primary_key_columns(connection: &Connection, table: &str) -> Result<Vec<String>> {
	let sql = "SELECT \"name\" FROM pragma_table_xinfo(?1) WHERE \"pk\" > 0 ORDER BY \"pk\"";

	let mut statement = connection.prepare(sql).map_err(catalog_error)?;
	let rows = statement.query_map(params![table], |row| row.get(0)).map_err(catalog_error)?;
	rows.collect::<rusqlite::Result<Vec<String>>>().map_err(catalog_error)
}

fn catalog_error(error: rusqlite::Error) -> Error {
	Error::CatalogUnavailable {
		reason: error.to_string(),
	}
}
