// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Boundary traits between the engine and a concrete database driver.

use async_trait::async_trait;

use crate::{
	error::Result,
	log::LogEntry,
	report::ReplayReport,
};

/// One open, schema-bound database session.
///
/// This is the narrow seam where generated SQL meets a driver; everything
/// above it is driver-agnostic. Implementations are expected to be scoped to
/// a single call — opened on entry, released on every exit path.
pub trait Session {
	/// Execute one statement, returning the number of affected rows.
	fn execute(&mut self, sql: &str) -> Result<usize>;

	/// One batch of rewind-log entries ordered by identifier descending,
	/// restricted to identifiers strictly below `below` (unrestricted when
	/// `None`), at most `limit` rows. Each call re-queries the store.
	fn log_batch_below(&mut self, below: Option<i64>, limit: usize) -> Result<Vec<LogEntry>>;
}

/// Install/uninstall/checkpoint/rewind for exactly one target database.
///
/// A provider owns one connection factory and performs its work sequentially;
/// distinct providers are independent and may run concurrently.
#[async_trait]
pub trait RewindProvider: std::fmt::Debug + Send + Sync {
	/// Human-readable name of the target, used in spans and fan-out errors.
	fn target(&self) -> &str;

	/// Instrument the target: catalog read, trigger synthesis, log-table
	/// creation. With `reinstall` the previous installation is removed
	/// first; without it an existing installation makes this a no-op.
	async fn install(&self, reinstall: bool) -> Result<()>;

	/// Drop the rewind log and every instrumentation trigger.
	/// Existence-tolerant: uninstalling an uninstrumented target succeeds.
	async fn uninstall(&self) -> Result<()>;

	/// Append a named checkpoint marker to the rewind log.
	async fn create_checkpoint(&self, name: &str) -> Result<()>;

	/// Replay the undo log backward, stopping at `checkpoint` when given,
	/// and prune the replayed entries. Individual statement failures are
	/// reported, not raised.
	async fn rewind(&self, checkpoint: Option<&str>) -> Result<ReplayReport>;
}
