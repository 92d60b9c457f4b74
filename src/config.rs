//! MIBGA parameters. Mirrors the teacher's `meta::Parameters` - a small,
//! `serde`-derived struct loadable from YAML, with a `Default` impl that
//! reproduces the paper's literal values.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
pub struct Parameters {
	pub pop_size: usize,
	/// "E" - the fraction of a pool marked "superior".
	pub selection_threshold: f64,
	pub min_island_size: usize,
	pub max_island_size: usize,
	pub mutation_prob: f64,
	pub timeout_secs: u64,
}

impl Default for Parameters {
	fn default() -> Self {
		Self {
			pop_size: 250,
			selection_threshold: 0.10,
			min_island_size: 5,
			max_island_size: 15,
			mutation_prob: 0.05,
			timeout_secs: 120,
		}
	}
}
