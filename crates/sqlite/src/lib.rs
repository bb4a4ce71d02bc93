// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! SQLite rewind provider.
//!
//! Binds the driver-agnostic pieces — catalog snapshot, trigger synthesis,
//! log protocol, replay engine — to SQLite through `rusqlite`. Schema
//! metadata comes from `sqlite_schema` and the `pragma_table_xinfo` /
//! `pragma_foreign_key_list` table-valued functions; this crate is the one
//! place where those stringly-typed rows are mapped into typed records.

pub mod catalog;
pub mod connection;
pub mod provider;
pub mod session;

pub use connection::{DbPath, SqliteConnectionFactory};
pub use provider::SqliteRewindProvider;
pub use session::SqliteSession;
