use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use bia_request::{DirectiveBlock, LoadRequest};
use tokio::task::{Id, JoinSet};

use crate::error::LoadError;

/// What a finished load task found.
#[derive(Debug)]
pub(crate) enum Discovery {
	/// Nothing further to expand.
	Settled,
	/// A mounted region contains these directive blocks.
	Nested(Vec<DirectiveBlock>),
}

/// Join set of in-flight load tasks, each owned by one request.
///
/// A task that panics fails its request so aggregation never waits on a
/// completion nobody will settle.
#[derive(Default)]
pub(crate) struct LoadTasks {
	inner: JoinSet<Discovery>,
	owners: HashMap<Id, Arc<LoadRequest>>,
}

impl LoadTasks {
	pub(crate) fn new() -> Self {
		Self::default()
	}

	pub(crate) fn len(&self) -> usize {
		self.inner.len()
	}

	/// Spawns the task driving `request` on the current runtime.
	pub(crate) fn spawn<F>(&mut self, request: Arc<LoadRequest>, fut: F)
	where
		F: Future<Output = Discovery> + Send + 'static,
	{
		tracing::trace!(kind = %request.kind(), source = request.source(), pending = self.inner.len(), "loader.tasks.spawn");
		let handle = self.inner.spawn(fut);
		self.owners.insert(handle.id(), request);
	}

	/// Waits for the next task. `None` once the set is empty.
	pub(crate) async fn join_next(&mut self) -> Option<Discovery> {
		match self.inner.join_next_with_id().await? {
			Ok((id, discovery)) => {
				self.owners.remove(&id);
				Some(discovery)
			}
			Err(e) => {
				if let Some(request) = self.owners.remove(&e.id()) {
					tracing::error!(source = request.source(), error = %e, "loader.tasks.panicked");
					request.fail(LoadError::TaskPanicked {
						url: request.source().to_string(),
					});
				}
				Some(Discovery::Settled)
			}
		}
	}
}
