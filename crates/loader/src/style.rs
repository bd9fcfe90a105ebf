use std::sync::Arc;

use bia_primitives::LoadKind;
use bia_request::{LoadRequest, RequestSpec, StyleSpec};

use crate::context::Context;
use crate::error::LoadError;
use crate::scope::scope_stylesheet;

/// Fetches a stylesheet, scopes it unless precompiled, and mounts it.
pub(crate) async fn run(ctx: Arc<Context>, request: Arc<LoadRequest>) {
	let RequestSpec::Style(spec) = request.spec() else {
		return;
	};

	let text = match ctx.fetcher.fetch_text(&spec.source).await {
		Ok(text) => text,
		Err(e) => {
			request.fail(LoadError::from(e));
			return;
		}
	};

	let css = prepare(spec, text);
	let location = ctx.config.current().insertion.style.clone();
	match ctx.renderer.mount(LoadKind::Style, &css, &location) {
		Ok(()) => {
			request.mark_mounted();
		}
		Err(e) => {
			request.fail(LoadError::from(e));
		}
	}
}

/// The text to mount for `spec`.
pub fn prepare(spec: &StyleSpec, text: String) -> String {
	match (&spec.target, spec.precompiled) {
		(Some(target), false) => scope_stylesheet(&text, target),
		_ => text,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn precompiled_text_is_verbatim() {
		let spec = StyleSpec {
			source: "site.css".into(),
			target: Some("x".into()),
			precompiled: true,
		};
		let css = "a{color:red}b{color:blue}";
		assert_eq!(prepare(&spec, css.to_string()), css);
	}

	#[test]
	fn scoped_when_not_precompiled() {
		let spec = StyleSpec {
			source: "site.css".into(),
			target: Some("x".into()),
			precompiled: false,
		};
		assert_eq!(prepare(&spec, "a{color:red}b{color:blue}".into()), "#x a{color:red}#x b{color:blue}");
	}
}
