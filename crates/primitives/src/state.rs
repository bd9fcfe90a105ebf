use std::fmt;

use thiserror::Error;

/// Lifecycle state of one load request.
///
/// States only move forward, along one of two paths:
///
/// ```text
/// Ready -> Loading -> Loaded -> Injected
/// Ready -> Loading -> Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoadState {
	/// Built and registered, not yet dispatched.
	#[default]
	Ready,
	/// Dispatched: waiting on dependencies or on the fetch.
	Loading,
	/// Terminal failure.
	Failed,
	/// Fetched, not yet mounted.
	Loaded,
	/// Mounted into the document. Terminal success.
	Injected,
}

impl LoadState {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Ready => "ready",
			Self::Loading => "loading",
			Self::Failed => "failed",
			Self::Loaded => "loaded",
			Self::Injected => "injected",
		}
	}

	/// Returns true for states no request ever leaves.
	pub const fn is_terminal(self) -> bool {
		matches!(self, Self::Failed | Self::Injected)
	}

	/// Whether `self -> next` is one of the permitted forward edges.
	///
	/// `Loaded` is only ever followed by `Injected`; failures leave from
	/// `Loading`.
	pub const fn can_advance_to(self, next: LoadState) -> bool {
		matches!(
			(self, next),
			(Self::Ready, Self::Loading)
				| (Self::Loading, Self::Loaded)
				| (Self::Loading, Self::Failed)
				| (Self::Loaded, Self::Injected)
		)
	}

	/// Validated transition.
	pub fn advance(self, next: LoadState) -> Result<LoadState, InvalidTransition> {
		if self.can_advance_to(next) {
			Ok(next)
		} else {
			Err(InvalidTransition { from: self, to: next })
		}
	}
}

impl fmt::Display for LoadState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A transition outside the permitted lifecycle paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("illegal load state transition {from} -> {to}")]
pub struct InvalidTransition {
	pub from: LoadState,
	pub to: LoadState,
}
