// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Target configuration.

use rewinddb_core::{DatabaseKind, Error, Result};
use serde::Deserialize;

/// Configuration for a set of rewind targets.
#[derive(Debug, Clone, Deserialize)]
pub struct RewinderConfig {
	pub targets: Vec<TargetConfig>,
}

/// One target database.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
	/// Optional display name; defaults to the path.
	#[serde(default)]
	pub name: Option<String>,
	pub kind: DatabaseKind,
	/// Engine-specific location. For SQLite this is a file path, or
	/// `memory:<name>` for a named shared in-memory database.
	pub path: String,
}

impl RewinderConfig {
	pub fn from_json(text: &str) -> Result<Self> {
		serde_json::from_str(text).map_err(|error| Error::Config {
			reason: error.to_string(),
		})
	}
}
