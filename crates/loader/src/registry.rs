use std::sync::Arc;

use bia_primitives::LoadKind;
use bia_request::{LoadRequest, RequestSpec};
use parking_lot::Mutex;

/// A region that was mounted successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedRegion {
	pub target: String,
	pub display: String,
}

/// Append-only record of every request built in one session, plus the
/// regions mounted so far.
#[derive(Debug, Default)]
pub struct Registry {
	requests: Mutex<Vec<Arc<LoadRequest>>>,
	regions: Mutex<Vec<LoadedRegion>>,
}

impl Registry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `specs` in order and returns the new requests.
	pub fn register(&self, specs: Vec<RequestSpec>) -> Vec<Arc<LoadRequest>> {
		let mut requests = self.requests.lock();
		let added: Vec<_> = specs
			.into_iter()
			.enumerate()
			.map(|(offset, spec)| Arc::new(LoadRequest::new(requests.len() + offset, spec)))
			.collect();
		requests.extend(added.iter().cloned());
		added
	}

	/// First registered script with `id`. Ids are not required to be unique.
	pub fn find_script(&self, id: &str) -> Option<Arc<LoadRequest>> {
		self.requests.lock().iter().find(|r| r.spec().script_id() == Some(id)).cloned()
	}

	pub fn scripts(&self) -> Vec<Arc<LoadRequest>> {
		self.requests.lock().iter().filter(|r| r.kind() == LoadKind::Script).cloned().collect()
	}

	pub fn snapshot(&self) -> Vec<Arc<LoadRequest>> {
		self.requests.lock().clone()
	}

	pub fn len(&self) -> usize {
		self.requests.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn record_region(&self, target: &str, display: &str) {
		self.regions.lock().push(LoadedRegion {
			target: target.to_string(),
			display: display.to_string(),
		});
	}

	/// First mounted region with `target`.
	pub fn region(&self, target: &str) -> Option<LoadedRegion> {
		self.regions.lock().iter().find(|r| r.target == target).cloned()
	}

	pub fn regions(&self) -> Vec<LoadedRegion> {
		self.regions.lock().clone()
	}

	pub fn region_targets(&self) -> Vec<String> {
		self.regions.lock().iter().map(|r| r.target.clone()).collect()
	}
}
