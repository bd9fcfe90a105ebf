use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Kind of resource a directive element declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadKind {
	/// Script text wrapped in a scoped closure and mounted as a script block.
	Script,
	/// Stylesheet text, optionally scoped under the request target.
	Style,
	/// Markup fragment mounted inside a hidden region container.
	Region,
}

impl LoadKind {
	/// All kinds, in declaration order.
	pub const ALL: [LoadKind; 3] = [LoadKind::Script, LoadKind::Style, LoadKind::Region];

	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Script => "script",
			Self::Style => "style",
			Self::Region => "region",
		}
	}
}

impl fmt::Display for LoadKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Returned when a `type` attribute names no known kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown load kind '{0}' (expected script, style or region)")]
pub struct UnknownKind(pub String);

impl FromStr for LoadKind {
	type Err = UnknownKind;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"script" => Ok(Self::Script),
			"style" => Ok(Self::Style),
			"region" => Ok(Self::Region),
			other => Err(UnknownKind(other.to_string())),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_known_kinds() {
		for kind in LoadKind::ALL {
			assert_eq!(kind.as_str().parse::<LoadKind>(), Ok(kind));
		}
	}

	#[test]
	fn rejects_unknown_and_uppercase() {
		assert_eq!("image".parse::<LoadKind>(), Err(UnknownKind("image".into())));
		assert!("Script".parse::<LoadKind>().is_err());
	}
}
