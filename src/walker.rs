//! Unbiased random walk from `u` to `v`, the primitive every genetic
//! operator bridges through.

use rand::Rng;

use crate::graph::{GraphService, NodeId};
use crate::path_solution::PathSolution;

/// Attempts a random simple walk from `u` toward `v`, discouraging immediate
/// backtracking. Fails (returns `None`) on a dead end or after `2 * |V|`
/// steps without reaching `v`.
pub fn create_random_path(u: NodeId, v: NodeId, graph: &GraphService, rng: &mut impl Rng) -> Option<PathSolution> {
	let max_steps = graph.node_count() * 2;
	let mut path = vec![u];
	let mut current = u;
	let mut reached = current == v;
	let mut steps = 0;
	while !reached && steps < max_steps {
		let neighbors = graph.neighbors(current);
		if neighbors.is_empty() {
			break;
		}
		let mut candidates: Vec<NodeId> = neighbors.to_vec();
		if path.len() >= 2 && candidates.len() > 1 {
			let prev = path[path.len() - 2];
			if let Some(pos) = candidates.iter().position(|&n| n == prev) {
				candidates.remove(pos);
			}
		}
		current = candidates[rng.gen_range(0..candidates.len())];
		path.push(current);
		steps += 1;
		if current == v {
			reached = true;
		}
	}
	if !reached {
		return None;
	}
	let mut sol = PathSolution::new(path);
	sol.mend_path();
	Some(sol)
}
