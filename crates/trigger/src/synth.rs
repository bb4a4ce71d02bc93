// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Trigger DDL generation.

use rewinddb_catalog::{CascadeRelation, CatalogSnapshot, CatalogTable};
use rewinddb_core::{LOG_TABLE, TRIGGER_PREFIX, quote_ident, truncated};

use crate::{
	command::UndoCommand,
	encoder::{RowAlias, value_template},
};

/// Identifier-length safety margin for the table tag inside trigger names.
const TAG_MAX: usize = 32;

/// One synthesized trigger, ready to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerDef {
	pub name: String,
	pub ddl: String,
}

/// Generate the full instrumentation set for one schema snapshot.
///
/// Cascade triggers are numbered first; the sequence counter is shared with
/// the per-table triggers so names stay unique across one install run.
/// Tables without capturable columns are skipped entirely.
pub fn synthesize(snapshot: &CatalogSnapshot) -> Vec<TriggerDef> {
	let mut triggers = Vec::new();
	let mut seq = 0usize;

	for relation in &snapshot.cascades {
		seq += 1;
		triggers.push(cascade_trigger(relation, seq));
	}

	for table in &snapshot.tables {
		if !table.has_captured_columns() {
			continue;
		}
		seq += 1;
		triggers.push(delete_trigger(table, seq));
		triggers.push(insert_trigger(table, seq));
		triggers.push(update_trigger(table, seq));
	}

	triggers
}

/// Undoing an insert means deleting the row again, matched by its full
/// captured column set — no stable key is assumed.
fn insert_trigger(table: &CatalogTable, seq: usize) -> TriggerDef {
	let mut command = UndoCommand::new();
	command.text(format!("DELETE FROM {} WHERE ", quote_ident(&table.name)));
	push_row_match(&mut command, table);
	command.text(";");

	let name = trigger_name(seq, "ai", &table.name);
	let ddl = trigger_ddl(&name, "AFTER INSERT", &table.name, &log_append(&command));
	TriggerDef {
		name,
		ddl,
	}
}

/// Undoing a delete means re-inserting the row from its `old` values.
fn delete_trigger(table: &CatalogTable, seq: usize) -> TriggerDef {
	let columns = table.captured_columns().map(|c| quote_ident(&c.name)).collect::<Vec<_>>().join(", ");

	let mut command = UndoCommand::new();
	command.text(format!("INSERT INTO {} ({}) VALUES (", quote_ident(&table.name), columns));
	let mut first = true;
	for column in table.captured_columns() {
		if !first {
			command.text(", ");
		}
		first = false;
		command.expr(value_template(column).render(RowAlias::Old));
	}
	command.text(");");

	let name = trigger_name(seq, "ad", &table.name);
	let ddl = trigger_ddl(&name, "AFTER DELETE", &table.name, &log_append(&command));
	TriggerDef {
		name,
		ddl,
	}
}

/// Undoing an update means setting every captured column back to its `old`
/// value, with the row located by its post-update (`new`) state.
fn update_trigger(table: &CatalogTable, seq: usize) -> TriggerDef {
	let mut command = UndoCommand::new();
	command.text(format!("UPDATE {} SET ", quote_ident(&table.name)));
	let mut first = true;
	for column in table.captured_columns() {
		if !first {
			command.text(", ");
		}
		first = false;
		command.text(format!("{} = ", quote_ident(&column.name)));
		command.expr(value_template(column).render(RowAlias::Old));
	}
	command.text(" WHERE ");
	push_row_match(&mut command, table);
	command.text(";");

	let name = trigger_name(seq, "au", &table.name);
	let ddl = trigger_ddl(&name, "AFTER UPDATE", &table.name, &log_append(&command));
	TriggerDef {
		name,
		ddl,
	}
}

/// The engine cascades child deletes without firing the child's own delete
/// trigger. Deleting the children explicitly before the parent row goes
/// away makes the child trigger fire and capture its undo entries; the
/// native cascade that follows then affects zero rows.
fn cascade_trigger(relation: &CascadeRelation, seq: usize) -> TriggerDef {
	let clauses = relation
		.column_pairs
		.iter()
		.map(|(child, parent)| format!("{} IS old.{}", quote_ident(child), quote_ident(parent)))
		.collect::<Vec<_>>()
		.join(" AND ");

	let body = format!("DELETE FROM {} WHERE {};", quote_ident(&relation.child_table), clauses);

	let name = trigger_name(seq, "bd", &relation.child_table);
	let ddl = trigger_ddl(&name, "BEFORE DELETE", &relation.parent_table, &body);
	TriggerDef {
		name,
		ddl,
	}
}

/// Full-column row match evaluated against `new` values: NULL columns are
/// matched with `IS NULL`, everything else with equality.
fn push_row_match(command: &mut UndoCommand, table: &CatalogTable) {
	let mut first = true;
	for column in table.captured_columns() {
		if !first {
			command.text(" AND ");
		}
		first = false;

		let column_ident = quote_ident(&column.name);
		command.text(column_ident.clone());
		command.expr(format!(
			"CASE WHEN new.{} IS NULL THEN ' IS NULL' ELSE ' = ' || {} END",
			column_ident,
			value_template(column).render(RowAlias::New)
		));
	}
}

fn log_append(command: &UndoCommand) -> String {
	format!("INSERT INTO {} ({}) VALUES ({});", quote_ident(LOG_TABLE), quote_ident("command"), command.render())
}

fn trigger_ddl(name: &str, event: &str, table: &str, body: &str) -> String {
	format!(
		"CREATE TRIGGER {} {} ON {}\nFOR EACH ROW\nBEGIN\n\t{}\nEND",
		quote_ident(name),
		event,
		quote_ident(table),
		body
	)
}

fn trigger_name(seq: usize, action: &str, tag: &str) -> String {
	format!("{TRIGGER_PREFIX}_{seq:05}_{action}_{}", truncated(tag, TAG_MAX))
}

#[cfg(test)]
mod tests {
	use rewinddb_catalog::CatalogColumn;

	use super::*;

	fn orders() -> CatalogTable {
		CatalogTable::new(
			"orders",
			vec![
				CatalogColumn::new("id", "INTEGER", false),
				CatalogColumn::new("note", "TEXT", false),
				CatalogColumn::new("total_with_tax", "REAL", true),
			],
		)
	}

	#[test]
	fn test_insert_trigger_logs_a_delete() {
		let trigger = insert_trigger(&orders(), 3);

		assert_eq!(trigger.name, "__tr_rewind_00003_ai_orders");
		assert!(trigger.ddl.starts_with("CREATE TRIGGER \"__tr_rewind_00003_ai_orders\" AFTER INSERT ON \"orders\""));
		// The leading statement text and the first column name collapse
		// into one literal.
		assert!(trigger.ddl.contains("'DELETE FROM \"orders\" WHERE \"id\"'"));
		assert!(trigger.ddl.contains("CASE WHEN new.\"id\" IS NULL THEN ' IS NULL' ELSE ' = ' || quote(new.\"id\") END"));
	}

	#[test]
	fn test_delete_trigger_logs_an_insert_from_old_values() {
		let trigger = delete_trigger(&orders(), 1);

		assert_eq!(trigger.name, "__tr_rewind_00001_ad_orders");
		assert!(trigger.ddl.contains("'INSERT INTO \"orders\" (\"id\", \"note\") VALUES ('"));
		assert!(trigger.ddl.contains("quote(old.\"id\")"));
		assert!(trigger.ddl.contains("quote(CAST(old.\"note\" AS TEXT))"));
	}

	#[test]
	fn test_update_trigger_sets_old_and_matches_new() {
		let trigger = update_trigger(&orders(), 2);

		assert_eq!(trigger.name, "__tr_rewind_00002_au_orders");
		assert!(trigger.ddl.contains("'UPDATE \"orders\" SET \"id\" = '"));
		assert!(trigger.ddl.contains("', \"note\" = '"));
		assert!(trigger.ddl.contains("quote(old.\"id\")"));
		assert!(trigger.ddl.contains("' WHERE \"id\"'"));
		assert!(trigger.ddl.contains("ELSE ' = ' || quote(new.\"note\") END"));
	}

	#[test]
	fn test_generated_columns_never_appear() {
		let table = orders();
		for trigger in [insert_trigger(&table, 1), delete_trigger(&table, 1), update_trigger(&table, 1)] {
			assert!(!trigger.ddl.contains("total_with_tax"), "{}", trigger.ddl);
		}
	}

	#[test]
	fn test_cascade_trigger_deletes_children_before_parent() {
		let relation = CascadeRelation::new(
			"order_lines",
			"orders",
			vec![("order_id".to_string(), "id".to_string())],
		);
		let trigger = cascade_trigger(&relation, 1);

		assert_eq!(trigger.name, "__tr_rewind_00001_bd_order_lines");
		assert_eq!(
			trigger.ddl,
			"CREATE TRIGGER \"__tr_rewind_00001_bd_order_lines\" BEFORE DELETE ON \"orders\"\n\
			 FOR EACH ROW\n\
			 BEGIN\n\
			 \tDELETE FROM \"order_lines\" WHERE \"order_id\" IS old.\"id\";\n\
			 END"
		);
	}

	#[test]
	fn test_synthesize_orders_cascades_first_and_shares_the_counter() {
		let snapshot = CatalogSnapshot::new(
			vec![
				orders(),
				// Nothing capturable: skipped.
				CatalogTable::new("derived", vec![CatalogColumn::new("v", "INTEGER", true)]),
			],
			vec![CascadeRelation::new(
				"order_lines",
				"orders",
				vec![("order_id".to_string(), "id".to_string())],
			)],
		);

		let triggers = synthesize(&snapshot);
		let names: Vec<_> = triggers.iter().map(|t| t.name.as_str()).collect();

		assert_eq!(
			names,
			vec![
				"__tr_rewind_00001_bd_order_lines",
				"__tr_rewind_00002_ad_orders",
				"__tr_rewind_00002_ai_orders",
				"__tr_rewind_00002_au_orders",
			]
		);
	}

	#[test]
	fn test_trigger_name_tag_is_truncated() {
		let long = "a_very_long_table_name_that_exceeds_the_tag_limit";
		let name = trigger_name(7, "ai", long);

		assert_eq!(name, format!("__tr_rewind_00007_ai_{}", &long[..32]));
	}
}
