use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::error::Result;
use crate::{DependencyPolicies, LoaderConfig};

/// Live configuration shared by every component of one load session.
///
/// Readers load the current value at the moment they decide something, so an
/// override only affects decisions that have not been made yet.
#[derive(Debug, Clone)]
pub struct ConfigHandle {
	inner: Arc<ArcSwap<LoaderConfig>>,
}

impl Default for ConfigHandle {
	fn default() -> Self {
		Self::new(LoaderConfig::default())
	}
}

impl ConfigHandle {
	pub fn new(config: LoaderConfig) -> Self {
		Self {
			inner: Arc::new(ArcSwap::from_pointee(config)),
		}
	}

	/// The configuration as of now.
	pub fn current(&self) -> Arc<LoaderConfig> {
		self.inner.load_full()
	}

	pub fn dependencies(&self) -> DependencyPolicies {
		self.inner.load().dependencies
	}

	/// Applies a dotted-key override. On error nothing changes.
	pub fn set(&self, key: &str, value: &str) -> Result<()> {
		let mut next = LoaderConfig::clone(&self.inner.load());
		next.set(key, value)?;
		self.inner.store(Arc::new(next));
		tracing::debug!(key, value, "config.set");
		Ok(())
	}

	/// Replaces the whole configuration.
	pub fn replace(&self, config: LoaderConfig) {
		self.inner.store(Arc::new(config));
	}
}
