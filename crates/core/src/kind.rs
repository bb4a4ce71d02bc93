// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Supported database engines.

use std::{
	fmt::{self, Display, Formatter},
	str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Identifies a database engine a provider implementation exists for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseKind {
	Sqlite,
}

impl Display for DatabaseKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			DatabaseKind::Sqlite => f.write_str("sqlite"),
		}
	}
}

impl FromStr for DatabaseKind {
	type Err = Error;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		match value.to_ascii_lowercase().as_str() {
			"sqlite" => Ok(DatabaseKind::Sqlite),
			other => Err(Error::UnsupportedKind {
				kind: other.to_string(),
			}),
		}
	}
}
