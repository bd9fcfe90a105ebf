//! Collaborator interfaces the loader drives.

use std::time::Duration;

use async_trait::async_trait;
use bia_primitives::LoadKind;
use bia_request::{BlockId, DirectiveBlock};

use crate::error::{FetchError, RenderError};

/// Retrieves resource text.
#[async_trait]
pub trait Fetcher: Send + Sync {
	async fn fetch_text(&self, url: &str) -> Result<String, FetchError>;
}

/// Identity of a mounted region container, as assigned by the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerId(pub String);

/// Where to look for directive blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanRoot {
	/// The whole document.
	Document,
	/// The contents of one mounted region.
	Region(ContainerId),
}

/// Region container parameters.
///
/// The renderer creates it hidden, tags it with `target` as its identity,
/// remembers `display` for the later reveal, and marks it as a region so
/// swaps can find every mounted region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionContainer {
	pub target: String,
	pub display: String,
}

/// The live document the loader mounts into.
#[async_trait]
pub trait Renderer: Send + Sync {
	/// Appends a script or style block at `location`.
	fn mount(&self, kind: LoadKind, content: &str, location: &str) -> Result<(), RenderError>;

	/// Parses `fragment` into a new hidden container appended at `location`.
	fn create_region_container(&self, container: &RegionContainer, fragment: &str, location: &str) -> Result<ContainerId, RenderError>;

	/// Directive blocks under `root`, in document order.
	fn find_directive_blocks(&self, root: &ScanRoot) -> Vec<DirectiveBlock>;

	/// Removes a block whose directives have been turned into requests.
	///
	/// A retired block must not be returned by later
	/// [`Renderer::find_directive_blocks`] calls, or a second load registers
	/// and fetches its directives again.
	fn retire_block(&self, block: BlockId);

	/// Hides a mounted region over `duration`.
	async fn hide_region(&self, target: &str, duration: Duration);

	/// Shows a mounted region with its display value over `duration`.
	async fn reveal_region(&self, target: &str, display: &str, duration: Duration);
}
