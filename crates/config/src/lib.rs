#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Configuration for the bia loader.
//!
//! Settings are addressed by dotted keys and may be overridden at any time:
//!
//! | Key | Default | Meaning |
//! |---|---|---|
//! | `insertion.script` | `body` | mount point for script blocks |
//! | `insertion.style` | `head` | mount point for style blocks |
//! | `insertion.region` | `body` | mount point for region containers |
//! | `dependencies.missing` | `load` | `load` or `skip` a script whose dependency was never declared |
//! | `dependencies.failed` | `load` | `load` or `skip` a script whose dependency failed |
//! | `transition.duration_ms` | `300` | region swap animation length |
//!
//! A file uses the same keys as TOML tables:
//!
//! ```toml
//! [insertion]
//! style = "#styles"
//!
//! [dependencies]
//! missing = "skip"
//! ```

pub mod error;
pub mod handle;
pub mod policy;

use std::path::Path;
use std::time::Duration;

pub use error::{ConfigError, Result};
pub use handle::ConfigHandle;
pub use policy::{DependencyPolicies, DependencyPolicy, UnknownPolicy};
use serde::{Deserialize, Serialize};

/// Every dotted key [`LoaderConfig::set`] accepts.
pub const KEYS: &[&str] = &[
	"insertion.script",
	"insertion.style",
	"insertion.region",
	"dependencies.missing",
	"dependencies.failed",
	"transition.duration_ms",
];

/// Mount points per resource kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Insertion {
	pub script: String,
	pub style: String,
	pub region: String,
}

impl Default for Insertion {
	fn default() -> Self {
		Self {
			script: "body".to_string(),
			style: "head".to_string(),
			region: "body".to_string(),
		}
	}
}

/// Region swap animation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Transition {
	pub duration_ms: u64,
}

impl Default for Transition {
	fn default() -> Self {
		Self { duration_ms: 300 }
	}
}

impl Transition {
	pub fn duration(&self) -> Duration {
		Duration::from_millis(self.duration_ms)
	}
}

/// Complete loader configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderConfig {
	pub insertion: Insertion,
	pub dependencies: DependencyPolicies,
	pub transition: Transition,
}

impl LoaderConfig {
	/// Parse a TOML string. Missing tables and keys keep their defaults.
	pub fn parse(input: &str) -> Result<Self> {
		Ok(toml::from_str(input)?)
	}

	/// Load configuration from a file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
			path: path.to_path_buf(),
			error: e,
		})?;
		Self::parse(&content)
	}

	/// Sets one value by dotted key.
	pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
		match key {
			"insertion.script" => self.insertion.script = value.to_string(),
			"insertion.style" => self.insertion.style = value.to_string(),
			"insertion.region" => self.insertion.region = value.to_string(),
			"dependencies.missing" => self.dependencies.missing = parse_policy("dependencies.missing", value)?,
			"dependencies.failed" => self.dependencies.failed = parse_policy("dependencies.failed", value)?,
			"transition.duration_ms" => {
				self.transition.duration_ms = value.trim().parse().map_err(|_| ConfigError::InvalidValue {
					key: "transition.duration_ms",
					value: value.to_string(),
					expected: "a whole number of milliseconds",
				})?;
			}
			_ => {
				return Err(ConfigError::UnknownKey {
					key: key.to_string(),
					suggestion: suggest_key(key),
				});
			}
		}
		Ok(())
	}

	/// Reads one value by dotted key.
	pub fn get(&self, key: &str) -> Option<String> {
		Some(match key {
			"insertion.script" => self.insertion.script.clone(),
			"insertion.style" => self.insertion.style.clone(),
			"insertion.region" => self.insertion.region.clone(),
			"dependencies.missing" => self.dependencies.missing.to_string(),
			"dependencies.failed" => self.dependencies.failed.to_string(),
			"transition.duration_ms" => self.transition.duration_ms.to_string(),
			_ => return None,
		})
	}
}

fn parse_policy(key: &'static str, value: &str) -> Result<DependencyPolicy> {
	value.parse().map_err(|_: UnknownPolicy| ConfigError::InvalidValue {
		key,
		value: value.to_string(),
		expected: "'load' or 'skip'",
	})
}

fn suggest_key(key: &str) -> Option<String> {
	KEYS.iter()
		.map(|candidate| (candidate, strsim::jaro_winkler(key, candidate)))
		.filter(|(_, score)| *score > 0.8)
		.max_by(|a, b| a.1.total_cmp(&b.1))
		.map(|(candidate, _)| candidate.to_string())
}

#[cfg(test)]
mod tests {
	use std::io::Write;

	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn defaults() {
		let config = LoaderConfig::default();
		assert_eq!(config.insertion.script, "body");
		assert_eq!(config.insertion.style, "head");
		assert_eq!(config.insertion.region, "body");
		assert_eq!(config.dependencies.missing, DependencyPolicy::Load);
		assert_eq!(config.dependencies.failed, DependencyPolicy::Load);
		assert_eq!(config.transition.duration(), Duration::from_millis(300));
	}

	#[test]
	fn dotted_set_and_get() {
		let mut config = LoaderConfig::default();
		config.set("insertion.style", "#styles").unwrap();
		config.set("dependencies.missing", "skip").unwrap();
		config.set("transition.duration_ms", "0").unwrap();
		assert_eq!(config.get("insertion.style").as_deref(), Some("#styles"));
		assert_eq!(config.get("dependencies.missing").as_deref(), Some("skip"));
		assert_eq!(config.transition.duration_ms, 0);
		for key in KEYS {
			assert!(config.get(key).is_some(), "{key} should be readable");
		}
	}

	#[test]
	fn unknown_key_suggests_closest() {
		let err = LoaderConfig::default().set("dependencies.misssing", "skip").unwrap_err();
		match err {
			ConfigError::UnknownKey { suggestion, .. } => assert_eq!(suggestion.as_deref(), Some("dependencies.missing")),
			other => panic!("unexpected error: {other}"),
		}
		assert!(LoaderConfig::default().get("nope").is_none());
	}

	#[test]
	fn invalid_policy_rejected() {
		let err = LoaderConfig::default().set("dependencies.failed", "retry").unwrap_err();
		assert!(matches!(err, ConfigError::InvalidValue { key: "dependencies.failed", .. }));
	}

	#[test]
	fn parses_partial_toml() {
		let config = LoaderConfig::parse("[dependencies]\nfailed = \"skip\"\n\n[insertion]\nregion = \"#app\"\n").unwrap();
		assert_eq!(config.dependencies.failed, DependencyPolicy::Skip);
		assert_eq!(config.dependencies.missing, DependencyPolicy::Load);
		assert_eq!(config.insertion.region, "#app");
		assert_eq!(config.insertion.script, "body");
	}

	#[test]
	fn rejects_unknown_toml_fields() {
		assert!(matches!(LoaderConfig::parse("[insertion]\nimage = \"body\"\n"), Err(ConfigError::Toml(_))));
		assert!(matches!(LoaderConfig::parse("[dependencies]\nmissing = \"maybe\"\n"), Err(ConfigError::Toml(_))));
	}

	#[test]
	fn loads_from_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "[transition]\nduration_ms = 120").unwrap();
		let config = LoaderConfig::load(file.path()).unwrap();
		assert_eq!(config.transition.duration_ms, 120);

		let missing = LoaderConfig::load(file.path().with_extension("absent"));
		assert!(matches!(missing, Err(ConfigError::Io { .. })));
	}
}
