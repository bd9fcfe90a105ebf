//! Error types for loader configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading or overriding configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or shape.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// A dotted key names no setting.
	#[error("unknown config key: {key}{}", suggestion.as_ref().map(|s| format!(" (did you mean '{s}'?)")).unwrap_or_default())]
	UnknownKey {
		/// The unrecognized key.
		key: String,
		/// A suggested alternative, if one is close enough.
		suggestion: Option<String>,
	},

	/// A value does not fit the setting.
	#[error("invalid value '{value}' for '{key}': expected {expected}")]
	InvalidValue {
		/// The dotted key being set.
		key: &'static str,
		/// The rejected value.
		value: String,
		/// Human readable description of accepted values.
		expected: &'static str,
	},
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
