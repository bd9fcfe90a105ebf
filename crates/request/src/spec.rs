use bia_primitives::LoadKind;

/// Script declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptSpec {
	/// Identity other scripts name in their dependency lists.
	pub id: String,
	pub source: String,
	/// Element id the script's scoped accessor is rooted at.
	pub target: String,
	/// Ids of scripts that must settle before this one is fetched.
	pub dependencies: Vec<String>,
}

/// Stylesheet declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSpec {
	pub source: String,
	/// Scope root. Always present unless `precompiled`.
	pub target: Option<String>,
	/// Mount the text verbatim instead of scoping it.
	pub precompiled: bool,
}

/// Region declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionSpec {
	pub source: String,
	/// Identity of the mounted container, also the swap key.
	pub target: String,
	/// CSS display value applied when the region is revealed.
	pub display: String,
}

/// A built load request, before any lifecycle state is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestSpec {
	Script(ScriptSpec),
	Style(StyleSpec),
	Region(RegionSpec),
}

impl RequestSpec {
	pub fn kind(&self) -> LoadKind {
		match self {
			Self::Script(_) => LoadKind::Script,
			Self::Style(_) => LoadKind::Style,
			Self::Region(_) => LoadKind::Region,
		}
	}

	pub fn source(&self) -> &str {
		match self {
			Self::Script(s) => &s.source,
			Self::Style(s) => &s.source,
			Self::Region(s) => &s.source,
		}
	}

	pub fn target(&self) -> Option<&str> {
		match self {
			Self::Script(s) => Some(&s.target),
			Self::Style(s) => s.target.as_deref(),
			Self::Region(s) => Some(&s.target),
		}
	}

	/// Script id, for dependency lookup.
	pub fn script_id(&self) -> Option<&str> {
		match self {
			Self::Script(s) => Some(&s.id),
			_ => None,
		}
	}
}
