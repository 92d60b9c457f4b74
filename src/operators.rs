//! Loop-Free Path-Composer (LFPC) crossover and mutation.
//!
//! Neither operator assumes parents A and B share a node: they splice a
//! random-walk bridge between a point in A and a point in B, then mend
//! whatever loops that stitching introduces.

use rand::Rng;

use crate::graph::GraphService;
use crate::path_solution::PathSolution;
use crate::walker::create_random_path;

/// Splice a bridge from `A[idx_a]` to `B[idx_b]` (and the reverse for the
/// second child). Falls back to returning the parents unchanged when a
/// bridge can't be found.
pub fn lfpc_crossover(a: &PathSolution, b: &PathSolution, graph: &GraphService, rng: &mut impl Rng) -> (PathSolution, PathSolution) {
	if a.nodes.len() < 2 || b.nodes.len() < 2 {
		return (a.clone(), b.clone());
	}
	let idx_a = rng.gen_range(0..a.nodes.len() - 1);
	let idx_b = rng.gen_range(1..b.nodes.len());
	let node_a = a.nodes[idx_a];
	let node_b = b.nodes[idx_b];

	let bridge = match create_random_path(node_a, node_b, graph, rng) {
		Some(bridge) => bridge,
		None => return (a.clone(), b.clone()),
	};
	let mut child_1 = PathSolution::new([&a.nodes[..idx_a], &bridge.nodes[..], &b.nodes[idx_b + 1..]].concat());
	child_1.mend_path();

	let child_2 = match create_random_path(node_b, node_a, graph, rng) {
		Some(bridge_back) => {
			let mut c = PathSolution::new([&b.nodes[..idx_b], &bridge_back.nodes[..], &a.nodes[idx_a + 1..]].concat());
			c.mend_path();
			c
		}
		None => b.clone(),
	};
	(child_1, child_2)
}

/// Mutate `A` by replacing the node preceding `R(A)` with a random neighbor
/// before bridging to `B`; falls back to plain crossover whenever the
/// mutation can't proceed (path too short, dead-end predecessor, failed
/// bridge).
pub fn lfpc_mutation(a: &PathSolution, b: &PathSolution, graph: &GraphService, rng: &mut impl Rng) -> (PathSolution, PathSolution) {
	if a.nodes.len() < 3 {
		return lfpc_crossover(a, b, graph, rng);
	}
	let idx_a = rng.gen_range(1..a.nodes.len() - 1);
	let idx_b = if b.nodes.len() < 2 { 0 } else { rng.gen_range(1..b.nodes.len()) };

	let preceding = a.nodes[idx_a - 1];
	let neighbors = graph.neighbors(preceding);
	if neighbors.is_empty() {
		return lfpc_crossover(a, b, graph, rng);
	}
	let node_c = neighbors[rng.gen_range(0..neighbors.len())];
	let node_b = b.nodes[idx_b];

	let bridge = match create_random_path(node_c, node_b, graph, rng) {
		Some(bridge) => bridge,
		None => return lfpc_crossover(a, b, graph, rng),
	};
	let mut child_1 = PathSolution::new([&a.nodes[..idx_a], &bridge.nodes[..], &b.nodes[idx_b + 1..]].concat());
	child_1.mend_path();

	let (child_2, _) = lfpc_crossover(b, a, graph, rng);
	(child_1, child_2)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn grid_graph() -> GraphService {
		// 0-1-2
		// | | |
		// 3-4-5
		GraphService::load("0 1 1\n1 2 1\n3 4 1\n4 5 1\n0 3 1\n1 4 1\n2 5 1\n".as_bytes()).unwrap()
	}

	#[test]
	fn crossover_produces_valid_children() {
		let g = grid_graph();
		let mut rng = StdRng::seed_from_u64(3);
		let a = PathSolution::new(vec![0, 1, 2]);
		let b = PathSolution::new(vec![0, 3, 4, 5, 2]);
		let (mut c1, mut c2) = lfpc_crossover(&a, &b, &g, &mut rng);
		c1.calculate_length(&g);
		c2.calculate_length(&g);
		// every consecutive pair in a mended child must be a real edge
		for child in [&c1, &c2] {
			for w in child.nodes.windows(2) {
				assert!(g.edge_weight(w[0], w[1]).is_finite());
			}
		}
	}

	#[test]
	fn crossover_falls_back_when_bridging_is_impossible() {
		// node 9 is isolated - any bridge touching it must fail
		let g = GraphService::load("0 1 1\n".as_bytes()).unwrap();
		let mut rng = StdRng::seed_from_u64(5);
		let a = PathSolution::new(vec![0, 1]);
		let mut b = PathSolution::new(vec![9]);
		b.nodes = vec![9, 9]; // force an index >= 1 to exist without a real edge
		let (c1, c2) = lfpc_crossover(&a, &b, &g, &mut rng);
		assert_eq!(c1.nodes, a.nodes);
		assert_eq!(c2.nodes, b.nodes);
	}

	#[test]
	fn mutation_falls_back_to_crossover_for_short_parent() {
		let g = grid_graph();
		let mut rng = StdRng::seed_from_u64(11);
		let a = PathSolution::new(vec![0, 1]);
		let b = PathSolution::new(vec![0, 3, 4]);
		let (c1, _c2) = lfpc_mutation(&a, &b, &g, &mut rng);
		assert!(!c1.nodes.is_empty());
	}
}
