//! `PathSolution`: an ordered node sequence plus its derived length/fitness,
//! the loop-mending repair operator, and a canonical hash for deduplication.

use std::collections::HashMap;

use crate::graph::{GraphService, NodeId, N64, n64, Float};

#[derive(Clone, Debug, PartialEq)]
pub struct PathSolution {
	pub nodes: Vec<NodeId>,
	pub length: N64,
	pub fitness: f64,
}

impl PathSolution {
	/// A fresh, unevaluated solution over `nodes` - caller must follow up with
	/// `mend_path`/`calculate_length`/`calculate_fitness` before trusting it.
	pub fn new(nodes: Vec<NodeId>) -> Self {
		Self { nodes, length: N64::infinity(), fitness: 0.0 }
	}

	/// Remove interior loops by keeping only the first occurrence of any
	/// repeated node and discarding everything between the two occurrences.
	/// Idempotent.
	pub fn mend_path(&mut self) {
		if self.nodes.is_empty() {
			return;
		}
		let mut new_path: Vec<NodeId> = Vec::with_capacity(self.nodes.len());
		let mut first_index: HashMap<NodeId, usize> = HashMap::new();
		for &node in &self.nodes {
			if let Some(&cut) = first_index.get(&node) {
				new_path.truncate(cut + 1);
				first_index = new_path.iter().enumerate().map(|(i, &n)| (n, i)).collect();
			} else {
				first_index.insert(node, new_path.len());
				new_path.push(node);
			}
		}
		self.nodes = new_path;
	}

	/// Sum of consecutive edge weights; `0` for a single-node path, `+inf` if
	/// any consecutive pair is not an edge (or the path is empty).
	pub fn calculate_length(&mut self, graph: &GraphService) {
		if self.nodes.is_empty() {
			self.length = N64::infinity();
			return;
		}
		if self.nodes.len() == 1 {
			self.length = n64(0.0);
			return;
		}
		let mut total = n64(0.0);
		for w in self.nodes.windows(2) {
			let d = graph.edge_weight(w[0], w[1]);
			if d.is_infinite() {
				self.length = N64::infinity();
				return;
			}
			total = total + d;
		}
		self.length = total;
	}

	/// `1/length` for finite, positive lengths; `0` otherwise.
	pub fn calculate_fitness(&mut self) {
		self.fitness = if self.length.is_finite() && self.length > n64(0.0) {
			1.0 / self.length.raw()
		} else {
			0.0
		};
	}

	/// Deterministic encoding of the node sequence, suitable as a map key.
	pub fn hash(&self) -> String {
		self.nodes.iter().map(NodeId::to_string).collect::<Vec<_>>().join("-")
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn chain_graph() -> GraphService {
		GraphService::load("0 1 1\n1 2 1\n2 3 1\n3 1 1\n1 4 1\n4 5 1\n".as_bytes()).unwrap()
	}

	#[test]
	fn mending_cuts_interior_loop() {
		let mut p = PathSolution::new(vec![0, 1, 2, 3, 1, 4, 5]);
		p.mend_path();
		assert_eq!(p.nodes, vec![0, 1, 4, 5]);
	}

	#[test]
	fn mending_is_idempotent() {
		let mut p = PathSolution::new(vec![0, 1, 2, 3, 1, 4, 5]);
		p.mend_path();
		let once = p.nodes.clone();
		p.mend_path();
		assert_eq!(p.nodes, once);
	}

	#[test]
	fn mending_preserves_endpoints_without_repetition() {
		let mut p = PathSolution::new(vec![0, 1, 2, 3]);
		p.mend_path();
		assert_eq!(p.nodes.first(), Some(&0));
		assert_eq!(p.nodes.last(), Some(&3));
	}

	#[test]
	fn no_node_repeats_after_mending() {
		let mut p = PathSolution::new(vec![5, 1, 2, 1, 3, 2, 4]);
		p.mend_path();
		let mut seen = std::collections::HashSet::new();
		assert!(p.nodes.iter().all(|n| seen.insert(*n)));
	}

	#[test]
	fn length_sums_edge_weights() {
		let g = chain_graph();
		let mut p = PathSolution::new(vec![0, 1, 4, 5]);
		p.calculate_length(&g);
		assert_eq!(p.length, n64(3.0));
	}

	#[test]
	fn length_is_zero_for_a_single_node_path() {
		let g = chain_graph();
		let mut p = PathSolution::new(vec![2]);
		p.calculate_length(&g);
		assert_eq!(p.length, n64(0.0));
	}

	#[test]
	fn length_is_infinite_for_missing_edge() {
		let g = chain_graph();
		let mut p = PathSolution::new(vec![0, 5]);
		p.calculate_length(&g);
		assert!(p.length.is_infinite());
	}

	#[test]
	fn fitness_is_inverse_length() {
		let g = chain_graph();
		let mut p = PathSolution::new(vec![0, 1, 4, 5]);
		p.calculate_length(&g);
		p.calculate_fitness();
		assert!((p.fitness - 1.0 / 3.0).abs() < 1e-9);
	}

	#[test]
	fn fitness_monotonicity() {
		let g = chain_graph();
		let mut short = PathSolution::new(vec![0, 1, 4, 5]);
		short.calculate_length(&g);
		short.calculate_fitness();
		let mut long = PathSolution::new(vec![0, 1, 2, 3, 1, 4, 5]);
		long.mend_path();
		long.calculate_length(&g);
		long.calculate_fitness();
		assert!(short.length < long.length || long.nodes == short.nodes);
		assert!(short.fitness >= long.fitness);
	}

	#[test]
	fn fitness_zero_for_invalid_path() {
		let g = chain_graph();
		let mut p = PathSolution::new(vec![0, 99]);
		p.calculate_length(&g);
		p.calculate_fitness();
		assert_eq!(p.fitness, 0.0);
	}

	#[test]
	fn hash_equality_matches_node_sequence_equality() {
		let a = PathSolution::new(vec![0, 1, 2]);
		let b = PathSolution::new(vec![0, 1, 2]);
		let c = PathSolution::new(vec![0, 2, 1]);
		assert_eq!(a.hash(), b.hash());
		assert_ne!(a.hash(), c.hash());
	}
}
