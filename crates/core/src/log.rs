// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Rewind-log entry model and the reserved names the instrumentation
//! claims inside a target database.

use crate::ident::truncated;

/// Name of the reserved table holding the undo log.
pub const LOG_TABLE: &str = "__rewind_log";

/// Prefix shared by every instrumentation trigger.
pub const TRIGGER_PREFIX: &str = "__tr_rewind";

/// Prefix marking a non-executable checkpoint entry. A leading SQL comment
/// keeps markers inert even if one were ever executed by accident.
pub const MARKER_PREFIX: &str = "-- ";

/// Checkpoint names longer than this are truncated, not rejected. Callers
/// must not rely on uniqueness of over-length names.
pub const MARKER_NAME_MAX: usize = 100;

/// One row of the rewind log.
///
/// Identifiers are assigned by the log store, strictly increase in append
/// order and are never reused; they are the sole ordering guarantee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
	pub id: i64,
	pub command: String,
}

/// The two disjoint kinds of log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogEntryKind {
	/// A literal SQL statement undoing one mutation.
	Executable,
	/// A named checkpoint; never executed.
	Marker,
}

impl LogEntry {
	pub fn kind(&self) -> LogEntryKind {
		if self.command.starts_with("--") {
			LogEntryKind::Marker
		} else {
			LogEntryKind::Executable
		}
	}

	/// Whether this entry is the marker for `name`, by exact text match
	/// against the encoded (and therefore truncated) form.
	pub fn is_marker_for(&self, name: &str) -> bool {
		self.command == marker_text(name)
	}
}

/// Encode a checkpoint name into its marker entry text.
pub fn marker_text(name: &str) -> String {
	format!("{}{}", MARKER_PREFIX, truncated(name, MARKER_NAME_MAX))
}
