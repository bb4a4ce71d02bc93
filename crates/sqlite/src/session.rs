// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! [`Session`] implementation over one open rusqlite connection.

use rewinddb_core::{Error, LOG_TABLE, LogEntry, Result, Session, quote_ident};
use rusqlite::{Connection, Row, params};

pub struct SqliteSession {
	connection: Connection,
}

impl SqliteSession {
	pub fn new(connection: Connection) -> Self {
		Self {
			connection,
		}
	}

	pub fn connection(&self) -> &Connection {
		&self.connection
	}
}

fn map_entry(row: &Row<'_>) -> rusqlite::Result<LogEntry> {
	Ok(LogEntry {
		id: row.get(0)?,
		command: row.get(1)?,
	})
}

fn sql_error(sql: &str, error: rusqlite::Error) -> Error {
	Error::Sql {
		statement: sql.to_string(),
		reason: error.to_string(),
	}
}

impl Session for SqliteSession {
	fn execute(&mut self, sql: &str) -> Result<usize> {
		self.connection.execute(sql, []).map_err(|error| sql_error(sql, error))
	}

	fn log_batch_below(&mut self, below: Option<i64>, limit: usize) -> Result<Vec<LogEntry>> {
		let sql = match below {
			Some(_) => format!(
				"SELECT \"id\", \"command\" FROM {} WHERE \"id\" < ?1 ORDER BY \"id\" DESC LIMIT ?2",
				quote_ident(LOG_TABLE)
			),
			None => format!(
				"SELECT \"id\", \"command\" FROM {} ORDER BY \"id\" DESC LIMIT ?1",
				quote_ident(LOG_TABLE)
			),
		};

		let mut statement = self.connection.prepare(&sql).map_err(|error| sql_error(&sql, error))?;
		let rows = match below {
			Some(bound) => statement.query_map(params![bound, limit as i64], map_entry),
			None => statement.query_map(params![limit as i64], map_entry),
		}
		.map_err(|error| sql_error(&sql, error))?;

		rows.collect::<rusqlite::Result<Vec<_>>>().map_err(|error| sql_error(&sql, error))
	}
}
