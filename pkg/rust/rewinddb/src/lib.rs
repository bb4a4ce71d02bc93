// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Trigger-based undo logging and point-in-time rewind.
//!
//! A [`Rewinder`] fans the four operations — install, uninstall,
//! checkpoint, rewind — out over any number of target databases. Each
//! target is served by a [`RewindProvider`]; providers are created from
//! configuration through the [`ProviderRegistry`], or constructed directly:
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use rewinddb::{Rewinder, SqliteRewindProvider};
//!
//! # async fn demo() -> rewinddb::Result<()> {
//! let rewinder = Rewinder::new(vec![Arc::new(SqliteRewindProvider::file("app.db"))]);
//!
//! rewinder.install(true).await?;
//! rewinder.create_checkpoint("before-test").await?;
//! // ... mutate the database ...
//! rewinder.rewind(Some("before-test")).await?;
//! # Ok(())
//! # }
//! ```

pub mod blocking;
pub mod config;
pub mod registry;
pub mod service;

pub use blocking::BlockingRewinder;
pub use config::{RewinderConfig, TargetConfig};
pub use registry::ProviderRegistry;
pub use rewinddb_core::{
	DatabaseKind, Error, LogEntry, LogEntryKind, ReplayDiagnostic, ReplayFailure, ReplayReport, Result,
	RewindProvider, TargetFailure,
};
pub use rewinddb_sqlite::SqliteRewindProvider;
pub use service::Rewinder;
