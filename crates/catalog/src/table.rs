// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::column::CatalogColumn;

/// One user table, identified by name within the target schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogTable {
	pub name: String,
	pub columns: Vec<CatalogColumn>,
}

impl CatalogTable {
	pub fn new(name: impl Into<String>, columns: Vec<CatalogColumn>) -> Self {
		Self {
			name: name.into(),
			columns,
		}
	}

	/// Columns that participate in undo capture, i.e. everything that is
	/// not engine-generated, in declaration order.
	pub fn captured_columns(&self) -> impl Iterator<Item = &CatalogColumn> {
		self.columns.iter().filter(|column| !column.generated)
	}

	/// Tables without capturable columns get no per-table triggers —
	/// there is nothing to reconstruct.
	pub fn has_captured_columns(&self) -> bool {
		self.captured_columns().next().is_some()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_captured_columns_excludes_generated() {
		let table = CatalogTable::new(
			"orders",
			vec![
				CatalogColumn::new("id", "INTEGER", false),
				CatalogColumn::new("total_with_tax", "REAL", true),
				CatalogColumn::new("total", "REAL", false),
			],
		);

		let captured: Vec<_> = table.captured_columns().map(|c| c.name.as_str()).collect();
		assert_eq!(captured, vec!["id", "total"]);
		assert!(table.has_captured_columns());
	}

	#[test]
	fn test_all_generated_table_has_nothing_to_capture() {
		let table = CatalogTable::new("derived", vec![CatalogColumn::new("v", "INTEGER", true)]);
		assert!(!table.has_captured_columns());
	}
}
