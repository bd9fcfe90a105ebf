use std::fmt;
use std::sync::Arc;

use bia_events::LoadEvent;
use bia_primitives::{LoadState, Settlement};
use bia_request::LoadRequest;

/// Aggregate result of one load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
	/// Every started request resolved.
	Success,
	/// Some request failed, at least one was injected.
	Partial,
	/// Some request failed, none was injected.
	Fail,
}

impl Outcome {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Success => "success",
			Self::Partial => "partial",
			Self::Fail => "fail",
		}
	}

	/// Classifies settled completions together with the final request states.
	pub fn classify(settlements: &[Settlement], states: &[LoadState]) -> Self {
		if settlements.iter().all(|s| s.is_resolved()) {
			Self::Success
		} else if states.contains(&LoadState::Injected) {
			Self::Partial
		} else {
			Self::Fail
		}
	}

	/// The event announcing this outcome.
	pub fn event(self) -> LoadEvent {
		match self {
			Self::Success => LoadEvent::Success,
			Self::Partial => LoadEvent::Partial,
			Self::Fail => LoadEvent::Fail,
		}
	}
}

impl fmt::Display for Outcome {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Waits on every started request and classifies the result. Requests that
/// never left `Ready` have no completion and are skipped.
pub(crate) async fn aggregate(requests: &[Arc<LoadRequest>]) -> Outcome {
	let mut settlements = Vec::with_capacity(requests.len());
	for request in requests {
		if let Some(completion) = request.completion() {
			settlements.push(completion.wait().await);
		}
	}
	let states: Vec<LoadState> = requests.iter().map(|r| r.state()).collect();
	Outcome::classify(&settlements, &states)
}

#[cfg(test)]
mod tests {
	use bia_primitives::Settlement::{Rejected, Resolved};

	use super::*;

	#[test]
	fn all_resolved_is_success() {
		assert_eq!(Outcome::classify(&[Resolved, Resolved], &[LoadState::Injected, LoadState::Injected]), Outcome::Success);
		assert_eq!(Outcome::classify(&[], &[]), Outcome::Success);
	}

	#[test]
	fn rejection_with_injection_is_partial() {
		assert_eq!(Outcome::classify(&[Resolved, Rejected], &[LoadState::Injected, LoadState::Failed]), Outcome::Partial);
	}

	#[test]
	fn rejection_without_injection_is_fail() {
		assert_eq!(Outcome::classify(&[Rejected, Rejected], &[LoadState::Failed, LoadState::Failed]), Outcome::Fail);
	}

	#[test]
	fn events_match_outcomes() {
		assert_eq!(Outcome::Success.event(), LoadEvent::Success);
		assert_eq!(Outcome::Partial.event(), LoadEvent::Partial);
		assert_eq!(Outcome::Fail.event(), LoadEvent::Fail);
	}
}
