//! Directive element to [`RequestSpec`] builders.

use bia_primitives::LoadKind;

use crate::directive::{DirectiveBlock, DirectiveElement};
use crate::error::{DirectiveError, Result};
use crate::spec::{RegionSpec, RequestSpec, ScriptSpec, StyleSpec};

const DEFAULT_DISPLAY: &str = "block";

/// Builds the request an element declares.
pub fn build_request(element: &DirectiveElement) -> Result<RequestSpec> {
	let kind: LoadKind = element.attr("type").ok_or(DirectiveError::MissingType)?.parse()?;
	match kind {
		LoadKind::Script => build_script(element).map(RequestSpec::Script),
		LoadKind::Style => build_style(element).map(RequestSpec::Style),
		LoadKind::Region => build_region(element).map(RequestSpec::Region),
	}
}

/// Builds every well-formed element of `block`, in document order.
///
/// Malformed elements are logged and skipped.
pub fn build_block(block: &DirectiveBlock) -> Vec<RequestSpec> {
	block
		.elements
		.iter()
		.filter_map(|element| match build_request(element) {
			Ok(spec) => Some(spec),
			Err(e) => {
				tracing::warn!(block = block.id.0, error = %e, "Ignoring invalid load directive");
				None
			}
		})
		.collect()
}

fn required<'a>(element: &'a DirectiveElement, kind: LoadKind, attribute: &'static str) -> Result<&'a str> {
	let value = if attribute == "source" { element.source() } else { element.attr(attribute) };
	value.ok_or(DirectiveError::MissingAttribute { kind, attribute })
}

fn build_script(element: &DirectiveElement) -> Result<ScriptSpec> {
	let source = required(element, LoadKind::Script, "source")?;
	let target = required(element, LoadKind::Script, "target")?;
	let id = element.attr("id").map_or_else(|| script_stem(source), str::to_string);
	let dependencies = element
		.attr("dependencies")
		.map(|deps| deps.split_whitespace().map(str::to_string).collect())
		.unwrap_or_default();

	Ok(ScriptSpec {
		id,
		source: source.to_string(),
		target: target.to_string(),
		dependencies,
	})
}

fn build_style(element: &DirectiveElement) -> Result<StyleSpec> {
	let source = required(element, LoadKind::Style, "source")?;
	let precompiled = element.attr("precompiled") == Some("true");
	let target = match element.attr("target") {
		Some(target) => Some(target.to_string()),
		None if precompiled => None,
		None => {
			return Err(DirectiveError::MissingAttribute {
				kind: LoadKind::Style,
				attribute: "target",
			});
		}
	};

	Ok(StyleSpec {
		source: source.to_string(),
		target,
		precompiled,
	})
}

fn build_region(element: &DirectiveElement) -> Result<RegionSpec> {
	let source = required(element, LoadKind::Region, "source")?;
	let target = required(element, LoadKind::Region, "target")?;
	let display = element.attr("display").unwrap_or(DEFAULT_DISPLAY);

	Ok(RegionSpec {
		source: source.to_string(),
		target: target.to_string(),
		display: display.to_string(),
	})
}

/// Default script id: the file name without directories or `.js`.
fn script_stem(source: &str) -> String {
	let name = source.rsplit('/').next().unwrap_or(source);
	name.strip_suffix(".js").unwrap_or(name).to_string()
}
