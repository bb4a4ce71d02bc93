// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Structured assembly of undo-command text.
//!
//! A trigger body does not store a fixed statement — it stores an
//! expression that concatenates literal SQL fragments with values read from
//! the firing row. [`UndoCommand`] models that as an ordered list of typed
//! parts and renders the concatenation once, which keeps quoting in one
//! place and lets tests assert on the parts instead of on string soup.

/// One part of the undo statement under construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandPart {
	/// Verbatim text of the undo statement.
	Text(String),
	/// An expression evaluated by the engine when the trigger fires.
	Expr(String),
}

/// Ordered parts of one undo statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UndoCommand {
	parts: Vec<CommandPart>,
}

impl UndoCommand {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn text(&mut self, text: impl Into<String>) -> &mut Self {
		self.parts.push(CommandPart::Text(text.into()));
		self
	}

	pub fn expr(&mut self, expr: impl Into<String>) -> &mut Self {
		self.parts.push(CommandPart::Expr(expr.into()));
		self
	}

	pub fn parts(&self) -> &[CommandPart] {
		&self.parts
	}

	/// Render the concatenation expression. Adjacent text parts collapse
	/// into one quoted literal; embedded quotes are escaped.
	pub fn render(&self) -> String {
		let mut operands: Vec<String> = Vec::new();
		let mut pending = String::new();

		for part in &self.parts {
			match part {
				CommandPart::Text(text) => pending.push_str(text),
				CommandPart::Expr(expr) => {
					if !pending.is_empty() {
						operands.push(quote_text(&pending));
						pending.clear();
					}
					operands.push(expr.clone());
				}
			}
		}
		if !pending.is_empty() {
			operands.push(quote_text(&pending));
		}

		operands.join(" || ")
	}
}

fn quote_text(text: &str) -> String {
	format!("'{}'", text.replace('\'', "''"))
}
