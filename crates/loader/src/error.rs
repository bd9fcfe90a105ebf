//! Error types for load orchestration.

use thiserror::Error;

/// A resource could not be retrieved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to fetch {url}: {reason}")]
pub struct FetchError {
	pub url: String,
	pub reason: String,
}

impl FetchError {
	pub fn new(url: impl Into<String>, reason: impl Into<String>) -> Self {
		Self {
			url: url.into(),
			reason: reason.into(),
		}
	}
}

/// The renderer could not mount content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot mount at '{location}': {reason}")]
pub struct RenderError {
	pub location: String,
	pub reason: String,
}

impl RenderError {
	pub fn new(location: impl Into<String>, reason: impl Into<String>) -> Self {
		Self {
			location: location.into(),
			reason: reason.into(),
		}
	}
}

/// Why a request ended in `Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
	#[error(transparent)]
	Fetch(#[from] FetchError),

	#[error(transparent)]
	Render(#[from] RenderError),

	/// A named dependency was never declared and the policy is `skip`.
	#[error("script '{script}' depends on undeclared script '{dependency}'")]
	UnresolvedDependency { script: String, dependency: String },

	/// Dependencies failed and the policy is `skip`.
	#[error("script '{script}' skipped because dependencies failed: {}", dependencies.join(", "))]
	DependencyFailed { script: String, dependencies: Vec<String> },

	/// The script is part of a dependency cycle.
	#[error("dependency cycle: {}", cycle.join(" -> "))]
	DependencyCycle { cycle: Vec<String> },

	/// The task driving the request panicked.
	#[error("load task for {url} panicked")]
	TaskPanicked { url: String },
}

/// A region swap could not start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SwapError {
	#[error("region '{target}' is not loaded (loaded: {})", loaded.join(", "))]
	UnknownRegion { target: String, loaded: Vec<String> },
}
