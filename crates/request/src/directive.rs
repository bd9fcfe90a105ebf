use indexmap::IndexMap;

/// Opaque identity the renderer assigns to a directive block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u64);

/// One directive element and its attributes, in markup order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectiveElement {
	attributes: IndexMap<String, String>,
}

impl DirectiveElement {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds or replaces an attribute.
	pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.set(name, value);
		self
	}

	pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
		self.attributes.insert(name.into(), value.into());
	}

	pub fn attr(&self, name: &str) -> Option<&str> {
		self.attributes.get(name).map(String::as_str)
	}

	/// The resource location. `source` wins over the legacy `src` spelling.
	pub fn source(&self) -> Option<&str> {
		self.attr("source").or_else(|| self.attr("src"))
	}

	pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
		self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}
}

impl<K, V> FromIterator<(K, V)> for DirectiveElement
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self {
			attributes: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
		}
	}
}

/// A container of directive elements found in the document or in a region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveBlock {
	pub id: BlockId,
	pub elements: Vec<DirectiveElement>,
}

impl DirectiveBlock {
	pub fn new(id: BlockId, elements: Vec<DirectiveElement>) -> Self {
		Self { id, elements }
	}
}
