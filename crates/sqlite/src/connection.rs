// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! SQLite connection handling.

use std::path::PathBuf;

use rewinddb_core::{Error, Result};
use rusqlite::{Connection, OpenFlags};

/// Location of one target SQLite database.
#[derive(Debug, Clone)]
pub enum DbPath {
	/// Database file on disk.
	File(PathBuf),
	/// Named in-memory database, shared by every connection opened in
	/// this process while at least one of them stays open.
	Memory(String),
}

/// Opens schema-bound connections on demand; one factory per target.
///
/// Connections are scoped to a single provider call — opened on entry and
/// released on every exit path, never shared across calls.
#[derive(Debug, Clone)]
pub struct SqliteConnectionFactory {
	path: DbPath,
	target: String,
}

impl SqliteConnectionFactory {
	pub fn file(path: impl Into<PathBuf>) -> Self {
		let path = path.into();
		let target = path.display().to_string();
		Self {
			path: DbPath::File(path),
			target,
		}
	}

	pub fn memory(name: impl Into<String>) -> Self {
		let name = name.into();
		let target = format!("memory:{name}");
		Self {
			path: DbPath::Memory(name),
			target,
		}
	}

	/// Human-readable target name, used in spans and errors.
	pub fn target(&self) -> &str {
		&self.target
	}

	/// Open a new connection. Foreign-key enforcement is switched on per
	/// connection; cascade capture depends on it.
	pub fn connect(&self) -> Result<Connection> {
		let connection = match &self.path {
			DbPath::File(path) => Connection::open_with_flags(
				path,
				OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE,
			),
			DbPath::Memory(name) => Connection::open_with_flags(
				format!("file:{name}?mode=memory&cache=shared"),
				OpenFlags::SQLITE_OPEN_READ_WRITE
					| OpenFlags::SQLITE_OPEN_CREATE
					| OpenFlags::SQLITE_OPEN_URI,
			),
		}
		.map_err(|error| self.connection_error(error))?;

		connection.pragma_update(None, "foreign_keys", "ON").map_err(|error| self.connection_error(error))?;

		Ok(connection)
	}

	fn connection_error(&self, error: rusqlite::Error) -> Error {
		Error::Connection {
			target: self.target.clone(),
			reason: error.to_string(),
		}
	}
}
