//! Dependency cycle detection for scripts.
//!
//! Scripts wait on each other's completion handles, so a cycle would leave
//! every member waiting forever. Before a batch is dispatched the registered
//! scripts are checked and every script found on a cycle is failed up front.

use std::sync::Arc;

use bia_primitives::LoadState;
use bia_request::{LoadRequest, RequestSpec};

use crate::error::LoadError;
use crate::registry::Registry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
	White,
	Gray,
	Black,
}

/// Script dependency graph with first-match-by-id edges.
///
/// Only `Ready` scripts contribute edges: dispatched scripts already
/// resolved their dependencies against what was registered at the time.
#[derive(Debug)]
pub(crate) struct DependencyGraph {
	ids: Vec<String>,
	edges: Vec<Vec<usize>>,
}

impl DependencyGraph {
	pub(crate) fn build(scripts: &[Arc<LoadRequest>]) -> Self {
		let ids: Vec<String> = scripts
			.iter()
			.map(|s| s.spec().script_id().unwrap_or_default().to_string())
			.collect();
		let edges = scripts
			.iter()
			.map(|s| match s.spec() {
				RequestSpec::Script(spec) if s.state() == LoadState::Ready => spec
					.dependencies
					.iter()
					.filter_map(|dep| ids.iter().position(|id| id == dep))
					.collect(),
				_ => Vec::new(),
			})
			.collect();
		Self { ids, edges }
	}

	/// Cycles closed by back edges of a color-marking DFS. Each cycle lists
	/// node positions starting at the re-entered node.
	///
	/// Every cycle in the graph contains at least one back edge, so failing
	/// every reported node breaks every cycle.
	pub(crate) fn cycles(&self) -> Vec<Vec<usize>> {
		let mut marks = vec![Mark::White; self.ids.len()];
		let mut stack = Vec::new();
		let mut cycles = Vec::new();
		for node in 0..self.ids.len() {
			if marks[node] == Mark::White {
				self.visit(node, &mut marks, &mut stack, &mut cycles);
			}
		}
		cycles
	}

	fn visit(&self, node: usize, marks: &mut [Mark], stack: &mut Vec<usize>, cycles: &mut Vec<Vec<usize>>) {
		marks[node] = Mark::Gray;
		stack.push(node);
		for &next in &self.edges[node] {
			match marks[next] {
				Mark::White => self.visit(next, marks, stack, cycles),
				Mark::Gray => {
					if let Some(start) = stack.iter().position(|&n| n == next) {
						cycles.push(stack[start..].to_vec());
					}
				}
				Mark::Black => {}
			}
		}
		stack.pop();
		marks[node] = Mark::Black;
	}

	/// Ids along `cycle`, closed by repeating the first id.
	pub(crate) fn describe(&self, cycle: &[usize]) -> Vec<String> {
		let mut names: Vec<String> = cycle.iter().map(|&n| self.ids[n].clone()).collect();
		if let Some(first) = names.first().cloned() {
			names.push(first);
		}
		names
	}
}

/// Fails every not-yet-dispatched script that sits on a dependency cycle.
/// Returns how many requests were failed.
pub(crate) fn fail_cycles(registry: &Registry) -> usize {
	let scripts = registry.scripts();
	let graph = DependencyGraph::build(&scripts);
	let mut failed = 0;
	for cycle in graph.cycles() {
		let names = graph.describe(&cycle);
		tracing::warn!(cycle = %names.join(" -> "), "Script dependency cycle detected; its members will not be loaded");
		for &node in &cycle {
			let request = &scripts[node];
			if request.begin() && request.fail(LoadError::DependencyCycle { cycle: names.clone() }) {
				failed += 1;
			}
		}
	}
	failed
}
