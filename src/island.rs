//! Islands: a superior pool and a central pool of shared, immutable
//! `PathSolution`s, mated each generation into a fresh offspring list.

use std::rc::Rc;

use rand::Rng;

use crate::graph::GraphService;
use crate::operators::{lfpc_crossover, lfpc_mutation};
use crate::path_solution::PathSolution;

#[derive(Clone, Debug, Default)]
pub struct Island {
	pub p_sp: Vec<Rc<PathSolution>>,
	pub p_cp: Vec<Rc<PathSolution>>,
}

impl Island {
	pub fn new(p_sp: Vec<Rc<PathSolution>>, p_cp: Vec<Rc<PathSolution>>) -> Self {
		Self { p_sp, p_cp }
	}

	/// Weighted sampling over `p_sp` mated against every member of `p_cp`,
	/// mutated with probability `mutation_prob`. Yields `2 * |p_cp|`
	/// offspring.
	pub fn generate_offspring(&self, graph: &GraphService, mutation_prob: f64, rng: &mut impl Rng) -> Vec<PathSolution> {
		if self.p_sp.is_empty() || self.p_cp.is_empty() {
			return Vec::new();
		}
		let total_fitness: f64 = self.p_sp.iter().map(|p| p.fitness).sum();
		let weights: Vec<f64> = if total_fitness > 0.0 {
			self.p_sp.iter().map(|p| p.fitness / total_fitness).collect()
		} else {
			vec![1.0 / self.p_sp.len() as f64; self.p_sp.len()]
		};

		let mut offspring = Vec::with_capacity(self.p_cp.len() * 2);
		for parent_b in &self.p_cp {
			let parent_a = &self.p_sp[weighted_index(&weights, rng)];
			let (c1, c2) = if rng.gen_range(0.0..1.0) < mutation_prob {
				lfpc_mutation(parent_a, parent_b, graph, rng)
			} else {
				lfpc_crossover(parent_a, parent_b, graph, rng)
			};
			offspring.push(c1);
			offspring.push(c2);
		}
		offspring
	}
}

/// Cumulative-weight draw; pop sizes here are a handful of dozens, so a
/// linear scan is plenty.
fn weighted_index(weights: &[f64], rng: &mut impl Rng) -> usize {
	let total: f64 = weights.iter().sum();
	let mut target = rng.gen_range(0.0..total.max(f64::MIN_POSITIVE));
	for (i, w) in weights.iter().enumerate() {
		if target < *w {
			return i;
		}
		target -= w;
	}
	weights.len() - 1
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn grid_graph() -> GraphService {
		GraphService::load("0 1 1\n1 2 1\n3 4 1\n4 5 1\n0 3 1\n1 4 1\n2 5 1\n".as_bytes()).unwrap()
	}

	fn solved(nodes: Vec<u64>, g: &GraphService) -> Rc<PathSolution> {
		let mut p = PathSolution::new(nodes);
		p.calculate_length(g);
		p.calculate_fitness();
		Rc::new(p)
	}

	#[test]
	fn empty_pools_yield_no_offspring() {
		let g = grid_graph();
		let island = Island::new(vec![], vec![solved(vec![0, 1, 2], &g)]);
		let mut rng = StdRng::seed_from_u64(1);
		assert!(island.generate_offspring(&g, 0.05, &mut rng).is_empty());
	}

	#[test]
	fn offspring_count_is_twice_central_pool() {
		let g = grid_graph();
		let sp = vec![solved(vec![0, 1, 2], &g)];
		let cp = vec![solved(vec![0, 3, 4, 5, 2], &g), solved(vec![0, 1, 4, 5, 2], &g)];
		let island = Island::new(sp, cp);
		let mut rng = StdRng::seed_from_u64(2);
		let offspring = island.generate_offspring(&g, 0.05, &mut rng);
		assert_eq!(offspring.len(), 4);
	}

	#[test]
	fn weighted_index_handles_zero_total_fitness() {
		let weights = vec![0.5, 0.5];
		let mut rng = StdRng::seed_from_u64(9);
		let idx = weighted_index(&weights, &mut rng);
		assert!(idx < 2);
	}
}
