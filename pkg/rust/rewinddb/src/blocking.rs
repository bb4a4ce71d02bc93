// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Blocking facade.
//!
//! Every method is defined as "block on the asynchronous form"; the
//! contract is otherwise identical to [`Rewinder`].

use rewinddb_core::{Error, Result};
use tokio::runtime::{Builder, Runtime};

use crate::service::Rewinder;

/// [`Rewinder`] behind an owned runtime, for callers without one.
pub struct BlockingRewinder {
	runtime: Runtime,
	inner: Rewinder,
}

impl BlockingRewinder {
	pub fn new(inner: Rewinder) -> Result<Self> {
		let runtime = Builder::new_multi_thread().enable_all().build().map_err(|error| Error::Runtime {
			reason: error.to_string(),
		})?;
		Ok(Self {
			runtime,
			inner,
		})
	}

	pub fn install(&self, reinstall: bool) -> Result<()> {
		self.runtime.block_on(self.inner.install(reinstall))
	}

	pub fn uninstall(&self) -> Result<()> {
		self.runtime.block_on(self.inner.uninstall())
	}

	pub fn create_checkpoint(&self, name: &str) -> Result<()> {
		self.runtime.block_on(self.inner.create_checkpoint(name))
	}

	pub fn rewind(&self, checkpoint: Option<&str>) -> Result<()> {
		self.runtime.block_on(self.inner.rewind(checkpoint))
	}

	pub fn inner(&self) -> &Rewinder {
		&self.inner
	}
}
