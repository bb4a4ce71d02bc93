// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Install/uninstall/checkpoint/rewind orchestration for one SQLite target.
//!
//! The async surface dispatches onto the blocking pool; the actual work is
//! sequential over one connection per call.

use std::path::PathBuf;

use async_trait::async_trait;
use rewinddb_core::{
	Error, LOG_TABLE, ReplayReport, Result, RewindProvider, Session, TRIGGER_PREFIX, quote_ident,
};
use rewinddb_engine::RewindLog;
use rusqlite::params;
use tokio::task;
use tracing::{debug, instrument};

use crate::{catalog, connection::SqliteConnectionFactory, session::SqliteSession};

/// Rewind provider for one SQLite database.
#[derive(Debug)]
pub struct SqliteRewindProvider {
	factory: SqliteConnectionFactory,
}

impl SqliteRewindProvider {
	pub fn new(factory: SqliteConnectionFactory) -> Self {
		Self {
			factory,
		}
	}

	/// Provider over a database file on disk.
	pub fn file(path: impl Into<PathBuf>) -> Self {
		Self::new(SqliteConnectionFactory::file(path))
	}

	/// Provider over a named shared in-memory database.
	pub fn memory(name: impl Into<String>) -> Self {
		Self::new(SqliteConnectionFactory::memory(name))
	}
}

#[async_trait]
impl RewindProvider for SqliteRewindProvider {
	fn target(&self) -> &str {
		self.factory.target()
	}

	async fn install(&self, reinstall: bool) -> Result<()> {
		let factory = self.factory.clone();
		task::spawn_blocking(move || install_blocking(&factory, reinstall)).await.map_err(runtime_error)?
	}

	async fn uninstall(&self) -> Result<()> {
		let factory = self.factory.clone();
		task::spawn_blocking(move || uninstall_blocking(&factory)).await.map_err(runtime_error)?
	}

	async fn create_checkpoint(&self, name: &str) -> Result<()> {
		let factory = self.factory.clone();
		let name = name.to_string();
		task::spawn_blocking(move || checkpoint_blocking(&factory, &name)).await.map_err(runtime_error)?
	}

	async fn rewind(&self, checkpoint: Option<&str>) -> Result<ReplayReport> {
		let factory = self.factory.clone();
		let checkpoint = checkpoint.map(str::to_string);
		task::spawn_blocking(move || rewind_blocking(&factory, checkpoint.as_deref()))
			.await
			.map_err(runtime_error)?
	}
}

fn runtime_error(error: task::JoinError) -> Error {
	Error::Runtime {
		reason: error.to_string(),
	}
}

#[instrument(name = "rewind::sqlite::install", level = "debug", skip(factory), fields(target = %factory.target()))]
fn install_blocking(factory: &SqliteConnectionFactory, reinstall: bool) -> Result<()> {
	let mut session = SqliteSession::new(factory.connect()?);

	if reinstall {
		uninstall_on(&mut session)?;
	} else if log_table_exists(&session)? {
		debug!("instrumentation already present");
		return Ok(());
	}

	let snapshot = catalog::read_snapshot(session.connection())?;
	let triggers = rewinddb_trigger::synthesize(&snapshot);

	// The log table goes in first so the triggers have somewhere to write
	// from the moment they exist. Any failure below leaves the schema
	// partially instrumented; the caller re-runs install with reinstall.
	session.execute(&format!(
		"CREATE TABLE {} ({} INTEGER PRIMARY KEY AUTOINCREMENT, {} TEXT NOT NULL)",
		quote_ident(LOG_TABLE),
		quote_ident("id"),
		quote_ident("command")
	))?;
	for trigger in &triggers {
		session.execute(&trigger.ddl)?;
	}

	debug!(tables = snapshot.tables.len(), triggers = triggers.len(), "installed");
	Ok(())
}

#[instrument(name = "rewind::sqlite::uninstall", level = "debug", skip(factory), fields(target = %factory.target()))]
fn uninstall_blocking(factory: &SqliteConnectionFactory) -> Result<()> {
	let mut session = SqliteSession::new(factory.connect()?);
	uninstall_on(&mut session)
}

#[instrument(name = "rewind::sqlite::checkpoint", level = "debug", skip(factory), fields(target = %factory.target()))]
fn checkpoint_blocking(factory: &SqliteConnectionFactory, name: &str) -> Result<()> {
	let mut session = SqliteSession::new(factory.connect()?);
	RewindLog::new(&mut session).mark(name)
}

#[instrument(name = "rewind::sqlite::rewind", level = "debug", skip(factory), fields(target = %factory.target()))]
fn rewind_blocking(factory: &SqliteConnectionFactory, checkpoint: Option<&str>) -> Result<ReplayReport> {
	let mut session = SqliteSession::new(factory.connect()?);
	rewinddb_engine::rewind(&mut session, checkpoint)
}

fn uninstall_on(session: &mut SqliteSession) -> Result<()> {
	session.execute(&format!("DROP TABLE IF EXISTS {}", quote_ident(LOG_TABLE)))?;

	for name in trigger_names(session)? {
		session.execute(&format!("DROP TRIGGER IF EXISTS {}", quote_ident(&name)))?;
	}
	Ok(())
}

fn log_table_exists(session: &SqliteSession) -> Result<bool> {
	let sql = "SELECT 1 FROM \"sqlite_schema\" WHERE \"type\" = 'table' AND \"name\" = ?1";

	match session.connection().query_row(sql, params![LOG_TABLE], |_| Ok(())) {
		Ok(()) => Ok(true),
		Err(rusqlite::Error::QueryReturnedNoRows) => Ok(false),
		Err(error) => Err(Error::Sql {
			statement: sql.to_string(),
			reason: error.to_string(),
		}),
	}
}

fn trigger_names(session: &SqliteSession) -> Result<Vec<String>> {
	let sql = "SELECT \"name\" FROM \"sqlite_schema\" WHERE \"type\" = 'trigger' AND \"name\" LIKE ?1";

	let mut statement = session.connection().prepare(sql).map_err(|error| Error::Sql {
		statement: sql.to_string(),
		reason: error.to_string(),
	})?;
	let rows = statement
		.query_map(params![format!("{TRIGGER_PREFIX}_%")], |row| row.get(0))
		.map_err(|error| Error::Sql {
			statement: sql.to_string(),
			reason: error.to_string(),
		})?;

	rows.collect::<rusqlite::Result<Vec<String>>>().map_err(|error| Error::Sql {
		statement: sql.to_string(),
		reason: error.to_string(),
	})
}
