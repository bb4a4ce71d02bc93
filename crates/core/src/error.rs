// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Error taxonomy.
//!
//! Fatal conditions only. A single undo statement failing during replay is
//! not an error — it is recorded in the
//! [`ReplayReport`](crate::report::ReplayReport) and the replay continues.

use std::fmt::{self, Display, Formatter};

/// Fatal failure of a rewind operation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// A connection to the target database could not be opened.
	#[error("cannot open connection to `{target}`: {reason}")]
	Connection {
		target: String,
		reason: String,
	},

	/// Schema metadata could not be queried; install aborts.
	#[error("catalog metadata unavailable: {reason}")]
	CatalogUnavailable {
		reason: String,
	},

	/// A statement failed outside the tolerant replay loop.
	#[error("statement failed: {reason}; statement: {statement}")]
	Sql {
		statement: String,
		reason: String,
	},

	/// No provider is registered for the requested database kind.
	#[error("unsupported database kind `{kind}`")]
	UnsupportedKind {
		kind: String,
	},

	/// Target configuration could not be parsed.
	#[error("invalid configuration: {reason}")]
	Config {
		reason: String,
	},

	/// The async runtime could not be set up or a worker task died.
	#[error("runtime failure: {reason}")]
	Runtime {
		reason: String,
	},

	/// One or more targets failed during a fan-out; every target was
	/// still attempted.
	#[error("{} of {attempted} target(s) failed", .failures.len())]
	Fanout {
		attempted: usize,
		failures: Vec<TargetFailure>,
	},
}

/// The failure of one target inside a fan-out.
#[derive(Debug)]
pub struct TargetFailure {
	pub target: String,
	pub error: Error,
}

impl Display for TargetFailure {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "{}: {}", self.target, self.error)
	}
}

/// Result type used throughout rewinddb.
pub type Result<T> = std::result::Result<T, Error>;
