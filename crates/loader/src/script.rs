//! Script dependency scheduling.
//!
//! Dependencies are resolved against the registry when the script is
//! dispatched, left to right. Found dependencies contribute their completion
//! handles; missing ones are handled by `dependencies.missing`. The task then
//! waits for every collected handle to settle and consults
//! `dependencies.failed` if any was rejected, before fetching.

use std::sync::Arc;

use bia_config::DependencyPolicy;
use bia_primitives::{Completion, LoadKind, Settlement, settle_all};
use bia_request::{LoadRequest, ScriptSpec};

use crate::context::Context;
use crate::error::LoadError;

/// A dependency resolved to a registered script.
#[derive(Debug, Clone)]
pub(crate) struct Dependency {
	pub id: String,
	pub completion: Completion,
}

/// Resolves the dependencies of a dispatched (`Loading`) script.
///
/// Returns `None` when the request was failed because a dependency is
/// missing and the policy is `skip`.
pub(crate) fn resolve(ctx: &Context, request: &LoadRequest, spec: &ScriptSpec) -> Option<Vec<Dependency>> {
	let mut resolved = Vec::with_capacity(spec.dependencies.len());
	for id in &spec.dependencies {
		if let Some(dependency) = ctx.registry.find_script(id) {
			resolved.push(Dependency {
				id: id.clone(),
				completion: dependency.completion_handle().clone(),
			});
			continue;
		}

		match ctx.config.dependencies().missing {
			DependencyPolicy::Load => {
				tracing::warn!(
					script = %spec.id,
					dependency = %id,
					"Script depends on a script that has not been declared; ignoring the dependency \
					 (set dependencies.missing = \"skip\" to skip the script instead)"
				);
			}
			DependencyPolicy::Skip => {
				tracing::warn!(
					script = %spec.id,
					dependency = %id,
					"Script depends on a script that has not been declared; the script will not be loaded \
					 (set dependencies.missing = \"load\" to ignore the dependency instead)"
				);
				request.fail(LoadError::UnresolvedDependency {
					script: spec.id.clone(),
					dependency: id.clone(),
				});
				return None;
			}
		}
	}
	Some(resolved)
}

/// Waits on `dependencies`, then fetches and mounts the script.
pub(crate) async fn run(ctx: Arc<Context>, request: Arc<LoadRequest>, dependencies: Vec<Dependency>) {
	let bia_request::RequestSpec::Script(spec) = request.spec() else {
		return;
	};

	if !dependencies.is_empty() {
		tracing::debug!(script = %spec.id, waiting = dependencies.len(), "loader.script.waiting");
		let handles: Vec<Completion> = dependencies.iter().map(|d| d.completion.clone()).collect();
		let settlements = settle_all(handles).await;
		let failed: Vec<String> = dependencies
			.iter()
			.zip(settlements)
			.filter(|(_, s)| *s == Settlement::Rejected)
			.map(|(d, _)| d.id.clone())
			.collect();

		if !failed.is_empty() {
			match ctx.config.dependencies().failed {
				DependencyPolicy::Load => {
					tracing::warn!(
						script = %spec.id,
						failed = %failed.join(", "),
						"Script dependency failed to load; loading the script anyway \
						 (set dependencies.failed = \"skip\" to skip it instead)"
					);
				}
				DependencyPolicy::Skip => {
					tracing::warn!(
						script = %spec.id,
						failed = %failed.join(", "),
						"Script dependency failed to load; the script will not be loaded \
						 (set dependencies.failed = \"load\" to load it anyway)"
					);
					request.fail(LoadError::DependencyFailed {
						script: spec.id.clone(),
						dependencies: failed,
					});
					return;
				}
			}
		}
	}

	let text = match ctx.fetcher.fetch_text(&spec.source).await {
		Ok(text) => text,
		Err(e) => {
			tracing::debug!(script = %spec.id, error = %e, "loader.script.fetch_failed");
			request.fail(LoadError::from(e));
			return;
		}
	};

	let wrapped = wrap_script(spec, &text);
	let location = ctx.config.current().insertion.script.clone();
	match ctx.renderer.mount(LoadKind::Script, &wrapped, &location) {
		Ok(()) => {
			request.mark_mounted();
		}
		Err(e) => {
			request.fail(LoadError::from(e));
		}
	}
}

/// Wraps script text in a closure that receives an accessor scoped to the
/// script's target, so top-level declarations stay local to the script.
/// Globals remain reachable through `window`.
pub fn wrap_script(spec: &ScriptSpec, body: &str) -> String {
	let file = spec.source.rsplit('/').next().unwrap_or(&spec.source);
	format!(
		"(function($){{\n{body}\n}})(bia.scoped('{target}'));\n//# sourceURL={file}",
		target = escape_js_string(&spec.target),
	)
}

fn escape_js_string(value: &str) -> String {
	let mut escaped = String::with_capacity(value.len());
	for c in value.chars() {
		match c {
			'\\' => escaped.push_str("\\\\"),
			'\'' => escaped.push_str("\\'"),
			'\n' => escaped.push_str("\\n"),
			'\r' => escaped.push_str("\\r"),
			'<' => escaped.push_str("\\x3c"),
			c => escaped.push(c),
		}
	}
	escaped
}
