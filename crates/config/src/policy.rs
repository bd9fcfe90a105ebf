use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What a script does about a dependency it cannot wait on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyPolicy {
	/// Ignore the dependency and load the script anyway.
	#[default]
	Load,
	/// Fail the script without fetching it.
	Skip,
}

impl DependencyPolicy {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Load => "load",
			Self::Skip => "skip",
		}
	}
}

impl fmt::Display for DependencyPolicy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A policy name other than `load` or `skip`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown dependency policy '{0}' (expected load or skip)")]
pub struct UnknownPolicy(pub String);

impl FromStr for DependencyPolicy {
	type Err = UnknownPolicy;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"load" => Ok(Self::Load),
			"skip" => Ok(Self::Skip),
			_ => Err(UnknownPolicy(s.to_string())),
		}
	}
}

/// Dependency policies, one per way a dependency can be unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DependencyPolicies {
	/// Applied when a named dependency was never declared.
	pub missing: DependencyPolicy,
	/// Applied when a named dependency failed to load.
	pub failed: DependencyPolicy,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_policy_names() {
		assert_eq!("load".parse::<DependencyPolicy>(), Ok(DependencyPolicy::Load));
		assert_eq!("skip".parse::<DependencyPolicy>(), Ok(DependencyPolicy::Skip));
	}

	#[test]
	fn unknown_policy_names_the_value() {
		let err = "Skip".parse::<DependencyPolicy>().unwrap_err();
		assert_eq!(err, UnknownPolicy("Skip".into()));
		assert_eq!(err.to_string(), "unknown dependency policy 'Skip' (expected load or skip)");
	}
}
