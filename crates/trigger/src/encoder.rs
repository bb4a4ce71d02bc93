// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Value-literal templates.
//!
//! For every captured column the synthesizer needs an expression that, when
//! the trigger fires, evaluates to the SQL-literal spelling of the column's
//! row value — ready to be spliced into the text of an undo statement. The
//! expression depends only on the column's type class and the row alias
//! (`old` or `new`) it reads from.

use rewinddb_catalog::{CatalogColumn, TypeClass};
use rewinddb_core::quote_ident;

/// The trigger-scoped row a value expression reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAlias {
	Old,
	New,
}

impl RowAlias {
	pub fn as_str(self) -> &'static str {
		match self {
			RowAlias::Old => "old",
			RowAlias::New => "new",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TemplatePiece {
	Lit(String),
	Alias,
}

/// A value expression with unresolved row-alias slots.
///
/// Kept structured (literal fragments and alias slots, not a formatted
/// string) so the same template renders against `old` and `new` and tests
/// can assert on it before rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueTemplate {
	pieces: Vec<TemplatePiece>,
}

impl ValueTemplate {
	fn lit(mut self, text: impl Into<String>) -> Self {
		self.pieces.push(TemplatePiece::Lit(text.into()));
		self
	}

	fn alias(mut self) -> Self {
		self.pieces.push(TemplatePiece::Alias);
		self
	}

	/// Resolve every alias slot and produce the final SQL expression.
	pub fn render(&self, alias: RowAlias) -> String {
		let mut rendered = String::new();
		for piece in &self.pieces {
			match piece {
				TemplatePiece::Lit(text) => rendered.push_str(text),
				TemplatePiece::Alias => rendered.push_str(alias.as_str()),
			}
		}
		rendered
	}
}

/// Build the literal-producing expression template for one column.
///
/// Every template evaluates to non-NULL text: NULL row values come out as
/// the four characters `NULL`, so splicing a rendered template into a text
/// concatenation can never null out the whole command.
pub fn value_template(column: &CatalogColumn) -> ValueTemplate {
	let column_ref = format!(".{}", quote_ident(&column.name));

	match column.type_class {
		// Strip insignificant trailing zeros and a trailing decimal
		// point; integer and exponent spellings pass through untouched.
		TypeClass::Fractional => ValueTemplate::default()
			.lit("CASE WHEN ")
			.alias()
			.lit(format!("{column_ref} IS NULL THEN 'NULL' WHEN instr(CAST("))
			.alias()
			.lit(format!("{column_ref} AS TEXT), '.') = 0 OR instr(CAST("))
			.alias()
			.lit(format!("{column_ref} AS TEXT), 'e') > 0 THEN CAST("))
			.alias()
			.lit(format!("{column_ref} AS TEXT) ELSE rtrim(rtrim(CAST("))
			.alias()
			.lit(format!("{column_ref} AS TEXT), '0'), '.') END")),
		TypeClass::Boolean => ValueTemplate::default()
			.lit("CASE WHEN ")
			.alias()
			.lit(format!("{column_ref} IS NULL THEN 'NULL' WHEN "))
			.alias()
			.lit(format!("{column_ref} THEN '1' ELSE '0' END")),
		TypeClass::Text => ValueTemplate::default()
			.lit("quote(CAST(")
			.alias()
			.lit(format!("{column_ref} AS TEXT))")),
		TypeClass::Other => ValueTemplate::default()
			.lit("quote(")
			.alias()
			.lit(format!("{column_ref})")),
	}
}
