//! The load orchestrator.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use bia_config::{ConfigHandle, LoaderConfig};
use bia_events::{EventBus, LoadEvent};
use bia_request::{DirectiveBlock, LoadRequest, RequestSpec, build_block};
use parking_lot::Mutex;

use crate::context::Context;
use crate::error::SwapError;
use crate::graph::fail_cycles;
use crate::host::{Fetcher, Renderer, ScanRoot};
use crate::outcome::{Outcome, aggregate};
use crate::registry::LoadedRegion;
use crate::tasks::{Discovery, LoadTasks};
use crate::{region, script, style};

/// One load session: owns the request registry, the mounted regions and the
/// configuration, and drives every request to a terminal state.
///
/// Cheap to clone; clones share the session.
#[derive(Clone)]
pub struct LoadSession {
	inner: Arc<SessionInner>,
}

struct SessionInner {
	ctx: Arc<Context>,
	events: EventBus,
	active_region: Mutex<Option<String>>,
	begun: AtomicBool,
}

impl LoadSession {
	/// Creates a session with default configuration.
	pub fn new(fetcher: Arc<dyn Fetcher>, renderer: Arc<dyn Renderer>) -> Self {
		Self::with_config(fetcher, renderer, LoaderConfig::default())
	}

	pub fn with_config(fetcher: Arc<dyn Fetcher>, renderer: Arc<dyn Renderer>, config: LoaderConfig) -> Self {
		let ctx = Context {
			fetcher,
			renderer,
			config: ConfigHandle::new(config),
			registry: Default::default(),
		};
		Self {
			inner: Arc::new(SessionInner {
				ctx: Arc::new(ctx),
				events: EventBus::new(),
				active_region: Mutex::new(None),
				begun: AtomicBool::new(false),
			}),
		}
	}

	/// Live configuration. Overrides apply to decisions not yet made.
	pub fn config(&self) -> &ConfigHandle {
		&self.inner.ctx.config
	}

	/// Dotted-key configuration override, e.g. `dependencies.missing = skip`.
	pub fn configure(&self, key: &str, value: &str) -> bia_config::Result<()> {
		self.inner.ctx.config.set(key, value)
	}

	pub fn events(&self) -> &EventBus {
		&self.inner.events
	}

	/// Every request built so far, in registration order.
	pub fn requests(&self) -> Vec<Arc<LoadRequest>> {
		self.inner.ctx.registry.snapshot()
	}

	/// Targets of the regions mounted so far, in mount order.
	pub fn loaded_regions(&self) -> Vec<String> {
		self.inner.ctx.registry.region_targets()
	}

	/// Target of the region revealed by the last successful swap.
	pub fn active_region(&self) -> Option<String> {
		self.inner.active_region.lock().clone()
	}

	/// Loads everything the document declares, including directives found in
	/// loaded regions, and reports the aggregate outcome.
	///
	/// Emits `begin` on the session's first load, then exactly one of
	/// `success`, `partial` or `fail`, then `done`. Failures never surface as
	/// errors here; inspect [`LoadSession::requests`] for details.
	pub async fn load(&self) -> Outcome {
		if !self.inner.begun.swap(true, Ordering::AcqRel) {
			self.inner.events.emit(LoadEvent::Begin);
		}

		self.expand().await;

		let requests = self.inner.ctx.registry.snapshot();
		let outcome = aggregate(&requests).await;
		tracing::info!(%outcome, requests = requests.len(), regions = self.loaded_regions().len(), "loader.load.settled");

		self.inner.events.emit(outcome.event());
		self.inner.events.emit(LoadEvent::Done);
		outcome
	}

	/// Drains the directive work queue: blocks from the document first, then
	/// blocks discovered in regions as they mount.
	async fn expand(&self) {
		let ctx = &self.inner.ctx;
		let mut queue: VecDeque<DirectiveBlock> = ctx.renderer.find_directive_blocks(&ScanRoot::Document).into();
		let mut tasks = LoadTasks::new();

		loop {
			while let Some(block) = queue.pop_front() {
				self.dispatch_block(block, &mut tasks);
			}
			match tasks.join_next().await {
				Some(Discovery::Nested(blocks)) => queue.extend(blocks),
				Some(Discovery::Settled) => {}
				None => break,
			}
		}
	}

	fn dispatch_block(&self, block: DirectiveBlock, tasks: &mut LoadTasks) {
		let ctx = &self.inner.ctx;
		let requests = ctx.registry.register(build_block(&block));
		tracing::debug!(block = block.id.0, requests = requests.len(), registered = ctx.registry.len(), "loader.block");
		ctx.renderer.retire_block(block.id);

		fail_cycles(&ctx.registry);
		for request in requests {
			self.dispatch(request, tasks);
		}
		tracing::trace!(pending = tasks.len(), "loader.block.dispatched");
	}

	fn dispatch(&self, request: Arc<LoadRequest>, tasks: &mut LoadTasks) {
		if !request.begin() {
			return;
		}
		let ctx = Arc::clone(&self.inner.ctx);
		let owner = Arc::clone(&request);
		match request.spec() {
			RequestSpec::Script(spec) => {
				let Some(dependencies) = script::resolve(&ctx, &request, spec) else {
					return;
				};
				tasks.spawn(owner, async move {
					script::run(ctx, request, dependencies).await;
					Discovery::Settled
				});
			}
			RequestSpec::Style(_) => {
				tasks.spawn(owner, async move {
					style::run(ctx, request).await;
					Discovery::Settled
				});
			}
			RequestSpec::Region(_) => {
				tasks.spawn(owner, region::run(ctx, request));
			}
		}
	}

	/// Swaps to `target` using the configured transition duration.
	pub async fn swap(&self, target: &str) -> Result<(), SwapError> {
		let duration = self.inner.ctx.config.current().transition.duration();
		self.swap_with(target, duration).await
	}

	/// Hides every mounted region, then reveals `target`.
	pub async fn swap_with(&self, target: &str, duration: Duration) -> Result<(), SwapError> {
		let ctx = &self.inner.ctx;
		self.inner.events.emit(LoadEvent::Swap { target: target.to_string() });

		let Some(region) = ctx.registry.region(target) else {
			return Err(SwapError::UnknownRegion {
				target: target.to_string(),
				loaded: ctx.registry.region_targets(),
			});
		};

		let mut seen = HashSet::new();
		let mounted: Vec<LoadedRegion> = ctx.registry.regions().into_iter().filter(|r| seen.insert(r.target.clone())).collect();
		let hides: Vec<_> = mounted.iter().map(|r| ctx.renderer.hide_region(&r.target, duration)).collect();
		futures::future::join_all(hides).await;
		ctx.renderer.reveal_region(&region.target, &region.display, duration).await;

		tracing::debug!(region = %region.target, hidden = mounted.len(), "loader.swap");
		*self.inner.active_region.lock() = Some(region.target);
		Ok(())
	}
}
