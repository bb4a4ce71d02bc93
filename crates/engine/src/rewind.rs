// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! The reverse-replay algorithm.
//!
//! Rewind scans the log newest-first, collects every executable entry up to
//! an optional checkpoint marker, executes the collected statements in that
//! order on one session, and prunes the log from the lowest replayed
//! identifier. Replay is best-effort: individual statement failures are
//! reported and skipped, never retried, and never abort the pass.

use rewinddb_core::{LogEntry, LogEntryKind, ReplayFailure, ReplayReport, Result, Session};
use tracing::{debug, warn};

use crate::log::RewindLog;

const SCAN_BATCH: usize = 256;

/// Replay the undo log backward, stopping at the `checkpoint` marker when
/// one is named and present. A named but absent checkpoint exhausts the
/// scan, which makes the call equivalent to a full rewind.
pub fn rewind<S: Session>(session: &mut S, checkpoint: Option<&str>) -> Result<ReplayReport> {
	let entries = collect_replay_set(session, checkpoint)?;

	if entries.is_empty() {
		debug!(checkpoint = checkpoint.unwrap_or("<none>"), "nothing to replay");
		return Ok(ReplayReport::default());
	}

	let mut report = ReplayReport::default();
	for entry in &entries {
		match session.execute(&entry.command) {
			Ok(0) => {
				warn!(entry = entry.id, statement = %entry.command, "undo statement affected no rows");
				report.record_failure(entry.id, &entry.command, ReplayFailure::NoRowsAffected);
			}
			Ok(_) => report.record_success(),
			Err(error) => {
				warn!(entry = entry.id, statement = %entry.command, %error, "undo statement failed");
				report.record_failure(entry.id, &entry.command, ReplayFailure::Statement(error.to_string()));
			}
		}
	}

	// The scan was descending, so the last collected entry carries the
	// lowest identifier. Pruning happens regardless of statement outcomes
	// and also removes whatever the replay statements themselves appended
	// through the live triggers. A bounding marker sits below the cutoff
	// and survives, so the same checkpoint can be rewound to again.
	let cutoff = entries[entries.len() - 1].id;
	let pruned = RewindLog::new(session).prune_from(cutoff)?;

	debug!(attempted = report.attempted, failed = report.failed(), cutoff = cutoff, pruned = pruned, "rewind complete");
	Ok(report)
}

fn collect_replay_set<S: Session>(session: &mut S, checkpoint: Option<&str>) -> Result<Vec<LogEntry>> {
	let mut log = RewindLog::new(session);
	let mut entries = Vec::new();

	for entry in log.scan_descending(SCAN_BATCH) {
		let entry = entry?;
		match entry.kind() {
			LogEntryKind::Marker => {
				if checkpoint.is_some_and(|name| entry.is_marker_for(name)) {
					break;
				}
				// Foreign markers are skipped, the scan continues.
			}
			LogEntryKind::Executable => entries.push(entry),
		}
	}

	Ok(entries)
}

#[cfg(test)]
mod tests {
	use rewinddb_core::{Error, marker_text};

	use super::*;

	/// In-memory session scripting a log plus statement outcomes. Executed
	/// undo statements append fresh log entries when `emit_noise` is set,
	/// mimicking the live triggers firing during replay.
	struct MockSession {
		entries: Vec<LogEntry>,
		next_id: i64,
		executed: Vec<String>,
		fail_contains: Option<&'static str>,
		zero_rows_contains: Option<&'static str>,
		emit_noise: bool,
	}

	impl MockSession {
		fn with_log(commands: &[&str]) -> Self {
			let entries: Vec<LogEntry> = commands
				.iter()
				.enumerate()
				.map(|(index, command)| LogEntry {
					id: index as i64 + 1,
					command: (*command).to_string(),
				})
				.collect();
			let next_id = entries.len() as i64 + 1;

			Self {
				entries,
				next_id,
				executed: Vec::new(),
				fail_contains: None,
				zero_rows_contains: None,
				emit_noise: false,
			}
		}

		fn ids(&self) -> Vec<i64> {
			self.entries.iter().map(|entry| entry.id).collect()
		}
	}

	impl Session for MockSession {
		fn execute(&mut self, sql: &str) -> Result<usize> {
			if let Some(rest) = sql.strip_prefix("DELETE FROM \"__rewind_log\" WHERE \"id\" >= ") {
				let id: i64 = rest.trim_end_matches(';').parse().expect("prune cutoff");
				let before = self.entries.len();
				self.entries.retain(|entry| entry.id < id);
				return Ok(before - self.entries.len());
			}

			if self.fail_contains.is_some_and(|needle| sql.contains(needle)) {
				return Err(Error::Sql {
					statement: sql.to_string(),
					reason: "scripted failure".to_string(),
				});
			}

			self.executed.push(sql.to_string());

			if self.emit_noise {
				self.entries.push(LogEntry {
					id: self.next_id,
					command: format!("DELETE FROM \"noise\" WHERE \"id\" = {};", self.next_id),
				});
				self.next_id += 1;
			}

			if self.zero_rows_contains.is_some_and(|needle| sql.contains(needle)) {
				return Ok(0);
			}
			Ok(1)
		}

		fn log_batch_below(&mut self, below: Option<i64>, limit: usize) -> Result<Vec<LogEntry>> {
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

	fn marker(name: &str) -> String {
		marker_text(name)
	}

	#[test]
	fn test_full_rewind_replays_newest_first_and_empties_the_log() {
		let mut session = MockSession::with_log(&["UNDO 1;", "UNDO 2;", &marker("cp"), "UNDO 4;"]);

		let report = rewind(&mut session, None).unwrap();

		assert_eq!(session.executed, vec!["UNDO 4;", "UNDO 2;", "UNDO 1;"]);
		assert_eq!(report.attempted, 3);
		assert_eq!(report.succeeded, 3);
		// Cutoff 1 takes the skipped marker with it.
		assert!(session.ids().is_empty());
	}

	#[test]
	fn test_scoped_rewind_stops_at_marker_and_retains_it() {
		let mut session = MockSession::with_log(&["UNDO 1;", &marker("cp"), "UNDO 3;", "UNDO 4;"]);

		let report = rewind(&mut session, Some("cp")).unwrap();

		assert_eq!(session.executed, vec!["UNDO 4;", "UNDO 3;"]);
		assert_eq!(report.attempted, 2);
		// Entries below the marker and the marker itself survive.
		assert_eq!(session.ids(), vec![1, 2]);
	}

	#[test]
	fn test_immediate_re_rewind_is_a_noop() {
		let mut session = MockSession::with_log(&["UNDO 1;", &marker("cp"), "UNDO 3;"]);

		rewind(&mut session, Some("cp")).unwrap();
		session.executed.clear();
		let report = rewind(&mut session, Some("cp")).unwrap();

		assert_eq!(report.attempted, 0);
		assert!(session.executed.is_empty());
		assert_eq!(session.ids(), vec![1, 2]);
	}

	#[test]
	fn test_unknown_checkpoint_degenerates_to_full_rewind() {
		let mut session = MockSession::with_log(&["UNDO 1;", &marker("cp"), "UNDO 3;"]);

		let report = rewind(&mut session, Some("never-created")).unwrap();

		assert_eq!(report.attempted, 2);
		assert!(session.ids().is_empty());
	}

	#[test]
	fn test_foreign_markers_are_skipped_not_replayed() {
		let mut session = MockSession::with_log(&["UNDO 1;", &marker("other"), "UNDO 3;"]);

		let report = rewind(&mut session, None).unwrap();

		assert_eq!(session.executed, vec!["UNDO 3;", "UNDO 1;"]);
		assert_eq!(report.attempted, 2);
	}

	#[test]
	fn test_replay_continues_past_failures_and_still_prunes() {
		let mut session = MockSession::with_log(&["UNDO 1;", "UNDO 2;", "UNDO 3;"]);
		session.fail_contains = Some("UNDO 2;");

		let report = rewind(&mut session, None).unwrap();

		assert_eq!(session.executed, vec!["UNDO 3;", "UNDO 1;"]);
		assert_eq!(report.attempted, 3);
		assert_eq!(report.succeeded, 2);
		assert_eq!(report.failed(), 1);
		assert!(matches!(report.diagnostics[0].failure, ReplayFailure::Statement(_)));
		// Pruning is idempotent with the scan, not with execution success.
		assert!(session.ids().is_empty());
	}

	#[test]
	fn test_zero_row_statements_are_diagnosed() {
		let mut session = MockSession::with_log(&["UNDO 1;", "UNDO 2;"]);
		session.zero_rows_contains = Some("UNDO 1;");

		let report = rewind(&mut session, None).unwrap();

		assert_eq!(report.attempted, 2);
		assert_eq!(report.succeeded, 1);
		assert_eq!(report.diagnostics[0].failure, ReplayFailure::NoRowsAffected);
		assert_eq!(report.diagnostics[0].entry_id, 1);
	}

	#[test]
	fn test_replay_noise_from_live_triggers_is_pruned() {
		let mut session = MockSession::with_log(&["UNDO 1;", "UNDO 2;"]);
		session.emit_noise = true;

		rewind(&mut session, None).unwrap();

		// Every noise entry got an identifier above the cutoff.
		assert!(session.ids().is_empty());
	}

	#[test]
	fn test_empty_log_is_a_noop() {
		let mut session = MockSession::with_log(&[]);

		let report = rewind(&mut session, None).unwrap();

		assert_eq!(report, ReplayReport::default());
	}

	#[test]
	fn test_marker_only_log_scoped_rewind_is_a_noop() {
		let mut session = MockSession::with_log(&[&marker("cp")]);

		let report = rewind(&mut session, Some("cp")).unwrap();

		assert_eq!(report.attempted, 0);
		assert_eq!(session.ids(), vec![1]);
	}

	#[test]
	fn test_long_checkpoint_names_match_their_truncated_marker() {
		let long_name = "n".repeat(150);
		let mut session = MockSession::with_log(&["UNDO 1;", &marker(&long_name), "UNDO 3;"]);

		let report = rewind(&mut session, Some(&long_name)).unwrap();

		assert_eq!(report.attempted, 1);
		assert_eq!(session.ids(), vec![1, 2]);
	}
}
