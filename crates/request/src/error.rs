//! Errors raised while reading directive elements.

use bia_primitives::{LoadKind, UnknownKind};
use thiserror::Error;

/// A directive element that cannot become a load request.
///
/// Always recoverable: the element is skipped and its siblings still load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectiveError {
	/// The element has no `type` attribute.
	#[error("directive element has no 'type' attribute")]
	MissingType,

	/// The `type` attribute names no known kind.
	#[error(transparent)]
	UnknownType(#[from] UnknownKind),

	/// A required attribute is absent.
	#[error("{kind} directive is missing required attribute '{attribute}'")]
	MissingAttribute {
		/// Kind of the offending element.
		kind: LoadKind,
		/// Name of the absent attribute.
		attribute: &'static str,
	},
}

/// Result type for directive building.
pub type Result<T> = std::result::Result<T, DirectiveError>;
