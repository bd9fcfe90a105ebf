use std::sync::Arc;

use bia_request::{LoadRequest, RequestSpec};

use crate::context::Context;
use crate::error::LoadError;
use crate::host::{RegionContainer, ScanRoot};
use crate::tasks::Discovery;

/// Fetches a region, mounts it in a hidden container, and reports any
/// directive blocks the fragment brought with it.
///
/// The completion resolves as soon as the container is mounted, whether or
/// not the region needs further expansion.
pub(crate) async fn run(ctx: Arc<Context>, request: Arc<LoadRequest>) -> Discovery {
	let RequestSpec::Region(spec) = request.spec() else {
		return Discovery::Settled;
	};

	let fragment = match ctx.fetcher.fetch_text(&spec.source).await {
		Ok(text) => text,
		Err(e) => {
			request.fail(LoadError::from(e));
			return Discovery::Settled;
		}
	};

	let container = RegionContainer {
		target: spec.target.clone(),
		display: spec.display.clone(),
	};
	let location = ctx.config.current().insertion.region.clone();
	let id = match ctx.renderer.create_region_container(&container, &fragment, &location) {
		Ok(id) => id,
		Err(e) => {
			request.fail(LoadError::from(e));
			return Discovery::Settled;
		}
	};
	ctx.registry.record_region(&spec.target, &spec.display);

	let blocks = ctx.renderer.find_directive_blocks(&ScanRoot::Region(id));
	request.mark_mounted();

	if blocks.is_empty() {
		Discovery::Settled
	} else {
		tracing::debug!(region = %spec.target, blocks = blocks.len(), "Region has its own load blocks, expanding");
		Discovery::Nested(blocks)
	}
}
