// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

/// A foreign key whose delete rule is CASCADE.
///
/// The engine will delete child rows automatically — and silently, without
/// firing the child table's own delete trigger. Each relation therefore gets
/// a compensating before-delete trigger on the parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeRelation {
	pub child_table: String,
	pub parent_table: String,
	/// Ordered (child column, parent column) pairs making up the key.
	pub column_pairs: Vec<(String, String)>,
}

impl CascadeRelation {
	pub fn new(
		child_table: impl Into<String>,
		parent_table: impl Into<String>,
		column_pairs: Vec<(String, String)>,
	) -> Self {
		Self {
			child_table: child_table.into(),
			parent_table: parent_table.into(),
			column_pairs,
		}
	}
}
