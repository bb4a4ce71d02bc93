// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Append-only log protocol: checkpoint markers, pruning and the lazy
//! descending scan.

use rewinddb_core::{LOG_TABLE, LogEntry, Result, Session, marker_text, quote_ident};

/// Protocol operations over the reserved log table, bound to one session.
pub struct RewindLog<'s, S: Session> {
	session: &'s mut S,
}

impl<'s, S: Session> RewindLog<'s, S> {
	pub fn new(session: &'s mut S) -> Self {
		Self {
			session,
		}
	}

	/// Insert a checkpoint marker. Over-length names are truncated by the
	/// marker encoding, never rejected.
	pub fn mark(&mut self, name: &str) -> Result<()> {
		let text = marker_text(name);
		let sql = format!(
			"INSERT INTO {} ({}) VALUES ('{}');",
			quote_ident(LOG_TABLE),
			quote_ident("command"),
			text.replace('\'', "''")
		);
		self.session.execute(&sql)?;
		Ok(())
	}

	/// Delete every entry with identifier >= `id`, returning how many went.
	pub fn prune_from(&mut self, id: i64) -> Result<usize> {
		let sql = format!("DELETE FROM {} WHERE {} >= {};", quote_ident(LOG_TABLE), quote_ident("id"), id);
		self.session.execute(&sql)
	}

	/// Lazy scan of the log ordered by identifier descending. Each batch
	/// re-queries the store keyed on the last identifier seen, so the scan
	/// is finite and restartable per call.
	pub fn scan_descending(&mut self, batch_size: usize) -> LogScan<'_, S> {
		LogScan {
			session: &mut *self.session,
			batch_size,
			buffer: Vec::new(),
			pos: 0,
			last_id: None,
			exhausted: false,
		}
	}
}

/// Batched descending iterator over the rewind log.
pub struct LogScan<'a, S: Session> {
	session: &'a mut S,
	batch_size: usize,
	buffer: Vec<LogEntry>,
	pos: usize,
	last_id: Option<i64>,
	exhausted: bool,
}

impl<S: Session> LogScan<'_, S> {
	fn refill(&mut self) -> Result<()> {
		self.buffer = self.session.log_batch_below(self.last_id, self.batch_size)?;
		self.pos = 0;
		if let Some(last) = self.buffer.last() {
			self.last_id = Some(last.id);
		}
		// Only an empty batch means we are done; a partial batch may just
		// be the tail of the table.
		self.exhausted = self.buffer.is_empty();
		Ok(())
	}
}

impl<S: Session> Iterator for LogScan<'_, S> {
	type Item = Result<LogEntry>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.pos >= self.buffer.len() && !self.exhausted {
			if let Err(error) = self.refill() {
				self.exhausted = true;
				return Some(Err(error));
			}
		}

		if self.pos < self.buffer.len() {
			let entry = self.buffer[self.pos].clone();
			self.pos += 1;
			Some(Ok(entry))
		} else {
			None
		}
	}
}

#[cfg(test)]
mod tests {
	use rewinddb_core::Error;

	use super::*;

	struct FixedLog {
		entries: Vec<LogEntry>,
		batch_queries: usize,
	}

	impl FixedLog {
		fn with_ids(ids: &[i64]) -> Self {
			Self {
				entries: ids
					.iter()
					.map(|&id| LogEntry {
						id,
						command: format!("DELETE FROM \"t\" WHERE \"id\" = {id};"),
					})
					.collect(),
				batch_queries: 0,
			}
		}
	}

	impl Session for FixedLog {
		fn execute(&mut self, sql: &str) -> Result<usize> {
			Err(Error::Sql {
				statement: sql.to_string(),
				reason: "not expected here".to_string(),
			})
		}

		fn log_batch_below(&mut self, below: Option<i64>, limit: usize) -> Result<Vec<LogEntry>> {
			self.batch_queries += 1;
			let mut batch: Vec<_> = self
				.entries
				.iter()
				.filter(|entry| below.is_none_or(|bound| entry.id < bound))
				.cloned()
				.collect();
			batch.sort_by_key(|entry| std::cmp::Reverse(entry.id));
			batch.truncate(limit);
			Ok(batch)
		}
	}

	#[test]
	fn test_scan_is_descending_across_batches() {
		let mut session = FixedLog::with_ids(&[1, 2, 3, 4, 5, 6, 7, 8]);
		let mut log = RewindLog::new(&mut session);

		let ids: Vec<i64> =
			log.scan_descending(3).map(|entry| entry.unwrap().id).collect();

		assert_eq!(ids, vec![8, 7, 6, 5, 4, 3, 2, 1]);
		// 3 full batches, one partial, one empty terminator.
		assert_eq!(session.batch_queries, 4);
	}

	#[test]
	fn test_scan_of_empty_log_yields_nothing() {
		let mut session = FixedLog::with_ids(&[]);
		let mut log = RewindLog::new(&mut session);

		assert!(log.scan_descending(16).next().is_none());
	}

	#[test]
	fn test_scan_restarts_fresh_per_call() {
		let mut session = FixedLog::with_ids(&[1, 2]);
		let mut log = RewindLog::new(&mut session);

		let first: Vec<i64> = log.scan_descending(16).map(|e| e.unwrap().id).collect();
		let second: Vec<i64> = log.scan_descending(16).map(|e| e.unwrap().id).collect();

		assert_eq!(first, second);
	}
}
