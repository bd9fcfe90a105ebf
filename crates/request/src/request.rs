use std::fmt;

use bia_primitives::{Completion, LoadKind, LoadState};
use parking_lot::Mutex;

use crate::spec::RequestSpec;

/// A registered request and its lifecycle.
///
/// The completion handle is allocated up front so that dependents can wait
/// on a script that has not been dispatched yet, but it is only exposed
/// through [`LoadRequest::completion`] once the request has left `Ready`.
#[derive(Debug)]
pub struct LoadRequest {
	index: usize,
	spec: RequestSpec,
	state: Mutex<LoadState>,
	completion: Completion,
	failure: Mutex<Option<String>>,
}

impl LoadRequest {
	/// Creates a `Ready` request at position `index` of the session registry.
	pub fn new(index: usize, spec: RequestSpec) -> Self {
		Self {
			index,
			spec,
			state: Mutex::new(LoadState::Ready),
			completion: Completion::new(),
			failure: Mutex::new(None),
		}
	}

	pub fn index(&self) -> usize {
		self.index
	}

	pub fn spec(&self) -> &RequestSpec {
		&self.spec
	}

	pub fn kind(&self) -> LoadKind {
		self.spec.kind()
	}

	pub fn source(&self) -> &str {
		self.spec.source()
	}

	pub fn target(&self) -> Option<&str> {
		self.spec.target()
	}

	pub fn state(&self) -> LoadState {
		*self.state.lock()
	}

	/// The completion handle, once loading has started.
	pub fn completion(&self) -> Option<Completion> {
		(self.state() != LoadState::Ready).then(|| self.completion.clone())
	}

	/// The completion handle regardless of state. Used to wait on a
	/// dependency that may still be queued.
	pub fn completion_handle(&self) -> &Completion {
		&self.completion
	}

	/// Reason recorded by [`LoadRequest::fail`].
	pub fn failure(&self) -> Option<String> {
		self.failure.lock().clone()
	}

	/// Moves `Ready -> Loading`. Returns `false` if the request was already
	/// dispatched, which makes dispatch idempotent.
	pub fn begin(&self) -> bool {
		let mut state = self.state.lock();
		if *state != LoadState::Ready {
			return false;
		}
		*state = LoadState::Loading;
		true
	}

	/// Moves `Loading -> Loaded`.
	pub fn mark_loaded(&self) -> bool {
		self.transition(LoadState::Loaded)
	}

	/// Moves `Loading -> Loaded -> Injected` once the content is mounted and
	/// resolves the completion.
	pub fn mark_mounted(&self) -> bool {
		self.mark_loaded() && self.mark_injected()
	}

	/// Moves `Loaded -> Injected` and resolves the completion.
	pub fn mark_injected(&self) -> bool {
		if !self.transition(LoadState::Injected) {
			return false;
		}
		self.completion.resolve();
		true
	}

	/// Moves to `Failed`, records `reason`, and rejects the completion.
	pub fn fail(&self, reason: impl fmt::Display) -> bool {
		if !self.transition(LoadState::Failed) {
			return false;
		}
		*self.failure.lock() = Some(reason.to_string());
		self.completion.reject();
		true
	}

	fn transition(&self, next: LoadState) -> bool {
		let mut state = self.state.lock();
		match state.advance(next) {
			Ok(advanced) => {
				tracing::trace!(index = self.index, kind = %self.kind(), from = %*state, to = %advanced, "request.transition");
				*state = advanced;
				true
			}
			Err(e) => {
				tracing::error!(index = self.index, source = self.source(), error = %e, "request.transition_rejected");
				false
			}
		}
	}
}
