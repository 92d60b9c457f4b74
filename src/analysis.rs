//! DiversityAnalyzer: edge-weighted Jaccard dissimilarity and the final
//! K-Most-Diverse-Near-Shortest-Paths subset search.

use std::collections::{HashMap, HashSet};

use itertools::Itertools;

use crate::graph::{GraphService, N64, n64, Float};
use crate::path_solution::PathSolution;

/// Cap on the combinatorial search space for `find_kmdnsp`: above this many
/// candidates we only search among the fittest `SEARCH_SPACE_CAP`.
const SEARCH_SPACE_CAP: usize = 20;

fn edge_set(p: &PathSolution) -> HashSet<(u64, u64)> {
	p.nodes.windows(2).map(|w| (w[0], w[1])).collect()
}

/// `1 - W(P∩Q)/W(P∪Q)` over directed consecutive-pair edge sets; `0` when
/// the union carries no weight.
pub fn dissimilarity(p: &PathSolution, q: &PathSolution, graph: &GraphService) -> f64 {
	let edges_p = edge_set(p);
	let edges_q = edge_set(q);

	let weight_of = |edges: &HashSet<(u64, u64)>| -> N64 {
		edges.iter().fold(n64(0.0), |acc, &(u, v)| acc + graph.edge_weight(u, v))
	};

	let len_intersect = weight_of(&edges_p.intersection(&edges_q).copied().collect());
	let len_union = weight_of(&edges_p.union(&edges_q).copied().collect());

	if len_union == n64(0.0) {
		return 0.0;
	}
	1.0 - (len_intersect.raw() / len_union.raw())
}

/// Minimum pairwise dissimilarity across a set; `1.0` for sets smaller than 2.
pub fn set_diversity(paths: &[&PathSolution], graph: &GraphService) -> f64 {
	if paths.len() < 2 {
		return 1.0;
	}
	paths.iter()
		.copied()
		.combinations(2)
		.map(|pair| dissimilarity(pair[0], pair[1], graph))
		.fold(f64::INFINITY, f64::min)
}

/// Filter to near-shortest, dedup by hash, then brute-force the K-subset
/// that maximizes `set_diversity`, capping the search space at the fittest
/// `SEARCH_SPACE_CAP` candidates when there are more than that many.
pub fn find_kmdnsp(paths: &[PathSolution], k: usize, shortest_path_len: N64, epsilon: f64, graph: &GraphService) -> Vec<PathSolution> {
	let max_allowed = shortest_path_len * n64(1.0 + epsilon);
	let valid: Vec<&PathSolution> = paths.iter()
		.filter(|p| p.length.is_finite() && p.length <= max_allowed)
		.collect();

	let mut unique_map: HashMap<String, &PathSolution> = HashMap::new();
	for p in valid {
		unique_map.entry(p.hash()).or_insert(p);
	}
	let mut unique: Vec<&PathSolution> = unique_map.into_values().collect();

	if unique.len() <= k {
		return unique.into_iter().cloned().collect();
	}

	if unique.len() > SEARCH_SPACE_CAP {
		unique.sort_unstable_by(|a, b| b.fitness.partial_cmp(&a.fitness).unwrap());
		unique.truncate(SEARCH_SPACE_CAP);
	}

	let mut best: Vec<&PathSolution> = Vec::new();
	let mut best_diversity = -1.0;
	if k > 0 {
		for combo in unique.into_iter().combinations(k) {
			let diversity = set_diversity(&combo, graph);
			if diversity > best_diversity {
				best_diversity = diversity;
				best = combo;
			}
		}
	}
	best.into_iter().cloned().collect()
}
