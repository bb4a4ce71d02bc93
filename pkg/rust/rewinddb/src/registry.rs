// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Provider construction.
//!
//! A registry maps database kinds to provider factories, so supporting a
//! new engine means registering one factory — the orchestration code never
//! changes.

use std::{collections::HashMap, sync::Arc};

use rewinddb_core::{DatabaseKind, Error, Result, RewindProvider};
use rewinddb_sqlite::SqliteRewindProvider;

use crate::config::TargetConfig;

type ProviderFactory = Box<dyn Fn(&TargetConfig) -> Result<Arc<dyn RewindProvider>> + Send + Sync>;

/// Creates providers from target configuration, keyed by database kind.
pub struct ProviderRegistry {
	factories: HashMap<DatabaseKind, ProviderFactory>,
}

impl ProviderRegistry {
	/// A registry with no factories at all.
	pub fn empty() -> Self {
		Self {
			factories: HashMap::new(),
		}
	}

	/// Register (or replace) the factory for one database kind.
	pub fn register<F>(&mut self, kind: DatabaseKind, factory: F)
	where
		F: Fn(&TargetConfig) -> Result<Arc<dyn RewindProvider>> + Send + Sync + 'static,
	{
		self.factories.insert(kind, Box::new(factory));
	}

	/// Create the provider for one configured target.
	pub fn create(&self, target: &TargetConfig) -> Result<Arc<dyn RewindProvider>> {
		let factory = self.factories.get(&target.kind).ok_or_else(|| Error::UnsupportedKind {
			kind: target.kind.to_string(),
		})?;
		factory(target)
	}
}

impl Default for ProviderRegistry {
	fn default() -> Self {
		let mut registry = Self::empty();
		registry.register(DatabaseKind::Sqlite, |target| {
			let provider = match target.path.strip_prefix("memory:") {
				Some(name) => SqliteRewindProvider::memory(name),
				None => SqliteRewindProvider::file(&target.path),
			};
			Ok(Arc::new(provider))
		});
		registry
	}
}
