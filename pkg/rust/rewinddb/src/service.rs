// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! The multi-target service.
//!
//! One task per provider, all of them awaited: a failing target never
//! cancels its siblings, and every failure comes back attached to its
//! target name.

use std::sync::Arc;

use rewinddb_core::{Error, Result, RewindProvider, TargetFailure};
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::{config::RewinderConfig, registry::ProviderRegistry};

/// Fan-out over all configured rewind targets.
pub struct Rewinder {
	providers: Vec<Arc<dyn RewindProvider>>,
}

impl Rewinder {
	pub fn new(providers: Vec<Arc<dyn RewindProvider>>) -> Self {
		Self {
			providers,
		}
	}

	/// Build one provider per configured target through the registry.
	pub fn from_config(config: &RewinderConfig, registry: &ProviderRegistry) -> Result<Self> {
		let mut providers = Vec::with_capacity(config.targets.len());
		for target in &config.targets {
			providers.push(registry.create(target)?);
		}
		Ok(Self::new(providers))
	}

	pub fn targets(&self) -> Vec<&str> {
		self.providers.iter().map(|provider| provider.target()).collect()
	}

	/// (Re)install the instrumentation on every target.
	pub async fn install(&self, reinstall: bool) -> Result<()> {
		let mut tasks = JoinSet::new();
		for provider in &self.providers {
			let provider = Arc::clone(provider);
			tasks.spawn(async move {
				let target = provider.target().to_string();
				(target, provider.install(reinstall).await)
			});
		}
		drain(tasks, self.providers.len()).await
	}

	/// Remove the instrumentation from every target.
	pub async fn uninstall(&self) -> Result<()> {
		let mut tasks = JoinSet::new();
		for provider in &self.providers {
			let provider = Arc::clone(provider);
			tasks.spawn(async move {
				let target = provider.target().to_string();
				(target, provider.uninstall().await)
			});
		}
		drain(tasks, self.providers.len()).await
	}

	/// Create the same named checkpoint on every target.
	pub async fn create_checkpoint(&self, name: &str) -> Result<()> {
		let mut tasks = JoinSet::new();
		for provider in &self.providers {
			let provider = Arc::clone(provider);
			let name = name.to_string();
			tasks.spawn(async move {
				let target = provider.target().to_string();
				(target, provider.create_checkpoint(&name).await)
			});
		}
		drain(tasks, self.providers.len()).await
	}

	/// Rewind every target, optionally to a named checkpoint. Per-target
	/// replay reports are logged; only fatal failures surface.
	pub async fn rewind(&self, checkpoint: Option<&str>) -> Result<()> {
		let mut tasks = JoinSet::new();
		for provider in &self.providers {
			let provider = Arc::clone(provider);
			let checkpoint = checkpoint.map(str::to_string);
			tasks.spawn(async move {
				let target = provider.target().to_string();
				let outcome = provider.rewind(checkpoint.as_deref()).await.map(|report| {
					if report.is_clean() {
						debug!("[{}] rewound {} statement(s)", target, report.attempted);
					} else {
						warn!(
							"[{}] rewind skipped {} of {} statement(s)",
							target,
							report.failed(),
							report.attempted
						);
					}
				});
				(target, outcome)
			});
		}
		drain(tasks, self.providers.len()).await
	}
}

async fn drain(mut tasks: JoinSet<(String, Result<()>)>, attempted: usize) -> Result<()> {
	let mut failures = Vec::new();

	while let Some(joined) = tasks.join_next().await {
		match joined {
			Ok((_, Ok(()))) => {}
			Ok((target, Err(error))) => {
				warn!("[{}] {}", target, error);
				failures.push(TargetFailure {
					target,
					error,
				});
			}
			Err(error) => failures.push(TargetFailure {
				target: "<unknown>".to_string(),
				error: Error::Runtime {
					reason: error.to_string(),
				},
			}),
		}
	}

	if failures.is_empty() {
		Ok(())
	} else {
		Err(Error::Fanout {
			attempted,
			failures,
		})
	}
}
