//! In-memory collaborators for loader integration tests.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use async_trait::async_trait;
use bia_loader::{
	BlockId, ContainerId, DirectiveBlock, DirectiveElement, FetchError, Fetcher, LoadKind, LoadSession, RegionContainer, RenderError,
	Renderer, ScanRoot,
};
use parking_lot::Mutex;
use regex::Regex;

static BLOCK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<bia-load>(.*?)</bia-load>").unwrap());
static ELEMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<load\s+([^>]*?)/?>").unwrap());
static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"([\w-]+)="([^"]*)""#).unwrap());

pub fn init_tracing() {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

struct Resource {
	body: Result<String, String>,
	delay: Duration,
}

/// Serves registered URLs from memory; anything else is a 404.
#[derive(Default)]
pub struct MemoryFetcher {
	resources: Mutex<HashMap<String, Resource>>,
	fetched: Mutex<Vec<String>>,
	panics: Mutex<HashSet<String>>,
}

impl MemoryFetcher {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn serve(self, url: &str, body: &str) -> Self {
		self.serve_after(url, body, 0)
	}

	pub fn serve_after(self, url: &str, body: &str, delay_ms: u64) -> Self {
		self.resources.lock().insert(
			url.to_string(),
			Resource {
				body: Ok(body.to_string()),
				delay: Duration::from_millis(delay_ms),
			},
		);
		self
	}

	pub fn fail_after(self, url: &str, delay_ms: u64) -> Self {
		self.resources.lock().insert(
			url.to_string(),
			Resource {
				body: Err("500 internal server error".to_string()),
				delay: Duration::from_millis(delay_ms),
			},
		);
		self
	}

	/// Makes fetching `url` panic inside the load task.
	pub fn panic_on(self, url: &str) -> Self {
		self.panics.lock().insert(url.to_string());
		self
	}

	pub fn fetch_count(&self, url: &str) -> usize {
		self.fetched.lock().iter().filter(|u| *u == url).count()
	}
}

#[async_trait]
impl Fetcher for MemoryFetcher {
	async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
		self.fetched.lock().push(url.to_string());
		if self.panics.lock().contains(url) {
			panic!("fetcher exploded on {url}");
		}
		let found = self.resources.lock().get(url).map(|r| (r.body.clone(), r.delay));
		let Some((body, delay)) = found else {
			return Err(FetchError::new(url, "404 not found"));
		};
		if !delay.is_zero() {
			tokio::time::sleep(delay).await;
		}
		body.map_err(|reason| FetchError::new(url, reason))
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mount {
	pub kind: LoadKind,
	pub content: String,
	pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountedRegion {
	pub id: ContainerId,
	pub target: String,
	pub display: String,
	pub location: String,
	pub visible: bool,
}

/// Transition calls, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
	Hide(String),
	Reveal { target: String, display: String },
}

/// Renderer over a tiny markup dialect: `<bia-load>` blocks holding
/// `<load attr="value">` elements.
#[derive(Default)]
pub struct MemoryRenderer {
	next_block: AtomicU64,
	document: Mutex<Vec<DirectiveBlock>>,
	region_blocks: Mutex<HashMap<ContainerId, Vec<DirectiveBlock>>>,
	retired: Mutex<HashSet<BlockId>>,
	mounts: Mutex<Vec<Mount>>,
	regions: Mutex<Vec<MountedRegion>>,
	transitions: Mutex<Vec<Transition>>,
	broken_locations: Mutex<HashSet<String>>,
}

impl MemoryRenderer {
	pub fn new(document: &str) -> Self {
		let renderer = Self::default();
		let blocks = renderer.parse(document);
		*renderer.document.lock() = blocks;
		renderer
	}

	/// Makes every mount at `location` fail.
	pub fn break_location(self, location: &str) -> Self {
		self.broken_locations.lock().insert(location.to_string());
		self
	}

	fn parse(&self, markup: &str) -> Vec<DirectiveBlock> {
		BLOCK
			.captures_iter(markup)
			.map(|block| {
				let elements = ELEMENT
					.captures_iter(&block[1])
					.map(|element| {
						ATTRIBUTE
							.captures_iter(&element[1])
							.map(|attr| (attr[1].to_string(), attr[2].to_string()))
							.collect::<DirectiveElement>()
					})
					.collect();
				DirectiveBlock::new(BlockId(self.next_block.fetch_add(1, Ordering::Relaxed)), elements)
			})
			.collect()
	}

	fn check(&self, location: &str) -> Result<(), RenderError> {
		if self.broken_locations.lock().contains(location) {
			return Err(RenderError::new(location, "mount point missing"));
		}
		Ok(())
	}

	pub fn mounts(&self) -> Vec<Mount> {
		self.mounts.lock().clone()
	}

	pub fn mounts_of(&self, kind: LoadKind) -> Vec<Mount> {
		self.mounts.lock().iter().filter(|m| m.kind == kind).cloned().collect()
	}

	pub fn regions(&self) -> Vec<MountedRegion> {
		self.regions.lock().clone()
	}

	pub fn visible_regions(&self) -> Vec<String> {
		self.regions.lock().iter().filter(|r| r.visible).map(|r| r.target.clone()).collect()
	}

	pub fn transitions(&self) -> Vec<Transition> {
		self.transitions.lock().clone()
	}

	pub fn retired_count(&self) -> usize {
		self.retired.lock().len()
	}
}

#[async_trait]
impl Renderer for MemoryRenderer {
	fn mount(&self, kind: LoadKind, content: &str, location: &str) -> Result<(), RenderError> {
		self.check(location)?;
		self.mounts.lock().push(Mount {
			kind,
			content: content.to_string(),
			location: location.to_string(),
		});
		Ok(())
	}

	fn create_region_container(&self, container: &RegionContainer, fragment: &str, location: &str) -> Result<ContainerId, RenderError> {
		self.check(location)?;
		let mut regions = self.regions.lock();
		let id = ContainerId(format!("{}#{}", container.target, regions.len()));
		regions.push(MountedRegion {
			id: id.clone(),
			target: container.target.clone(),
			display: container.display.clone(),
			location: location.to_string(),
			visible: false,
		});
		drop(regions);
		let blocks = self.parse(fragment);
		self.region_blocks.lock().insert(id.clone(), blocks);
		Ok(id)
	}

	fn find_directive_blocks(&self, root: &ScanRoot) -> Vec<DirectiveBlock> {
		let retired = self.retired.lock().clone();
		let blocks = match root {
			ScanRoot::Document => self.document.lock().clone(),
			ScanRoot::Region(id) => self.region_blocks.lock().get(id).cloned().unwrap_or_default(),
		};
		blocks.into_iter().filter(|b| !retired.contains(&b.id)).collect()
	}

	fn retire_block(&self, block: BlockId) {
		self.retired.lock().insert(block);
	}

	async fn hide_region(&self, target: &str, duration: Duration) {
		if !duration.is_zero() {
			tokio::time::sleep(duration).await;
		}
		for region in self.regions.lock().iter_mut().filter(|r| r.target == target) {
			region.visible = false;
		}
		self.transitions.lock().push(Transition::Hide(target.to_string()));
	}

	async fn reveal_region(&self, target: &str, display: &str, duration: Duration) {
		if !duration.is_zero() {
			tokio::time::sleep(duration).await;
		}
		for region in self.regions.lock().iter_mut().filter(|r| r.target == target) {
			region.visible = true;
		}
		self.transitions.lock().push(Transition::Reveal {
			target: target.to_string(),
			display: display.to_string(),
		});
	}
}

/// Builds a session over the given collaborators.
pub fn session(fetcher: MemoryFetcher, renderer: MemoryRenderer) -> (LoadSession, Arc<MemoryFetcher>, Arc<MemoryRenderer>) {
	init_tracing();
	let fetcher = Arc::new(fetcher);
	let renderer = Arc::new(renderer);
	let session = LoadSession::new(fetcher.clone(), renderer.clone());
	(session, fetcher, renderer)
}

/// Wraps directive elements in one `<bia-load>` block.
pub fn block(elements: &[&str]) -> String {
	format!("<bia-load>\n{}\n</bia-load>", elements.join("\n"))
}
