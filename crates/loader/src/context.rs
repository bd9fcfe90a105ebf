use std::sync::Arc;

use bia_config::ConfigHandle;

use crate::host::{Fetcher, Renderer};
use crate::registry::Registry;

/// Everything a load task needs, shared by one session.
pub(crate) struct Context {
	pub fetcher: Arc<dyn Fetcher>,
	pub renderer: Arc<dyn Renderer>,
	pub config: ConfigHandle,
	pub registry: Registry,
}
