//! The MIBGA engine: population init, island formation, migration,
//! AvgIslandFit selection and the generation loop that ties them together.

use std::collections::HashMap;
use std::rc::Rc;
use std::time::{Duration, Instant};

use rand::Rng;

use crate::analysis::find_kmdnsp;
use crate::config::Parameters;
use crate::graph::{GraphService, NodeId};
use crate::island::Island;
use crate::path_solution::PathSolution;

pub struct Mibga<'g, R: Rng> {
	graph: &'g GraphService,
	s: NodeId,
	t: NodeId,
	k: usize,
	epsilon: f64,
	params: Parameters,
	rng: R,
}

impl<'g, R: Rng> Mibga<'g, R> {
	pub fn new(graph: &'g GraphService, s: NodeId, t: NodeId, k: usize, epsilon: f64, params: Parameters, rng: R) -> Self {
		Self { graph, s, t, k, epsilon, params, rng }
	}

	fn initialize_population(&mut self, registry: &mut HashMap<String, Rc<PathSolution>>) -> Vec<Rc<PathSolution>> {
		log::info!("Initializing population ({})...", self.params.pop_size);
		let mut population = Vec::new();
		let mut attempts = 0usize;
		let attempt_budget = self.params.pop_size * 50;
		while population.len() < self.params.pop_size && attempts < attempt_budget {
			attempts += 1;
			let walk = match crate::walker::create_random_path(self.s, self.t, self.graph, &mut self.rng) {
				Some(w) => w,
				None => continue,
			};
			let mut p = walk;
			p.calculate_length(self.graph);
			p.calculate_fitness();
			if !p.length.is_finite() {
				continue;
			}
			let hash = p.hash();
			if registry.contains_key(&hash) {
				continue;
			}
			let p = Rc::new(p);
			registry.insert(hash, p.clone());
			population.push(p);
		}
		if population.is_empty() {
			log::warn!("Could not create any valid path. Start/target might be disconnected or too far for a random walk.");
		}
		population
	}

	/// Algorithm 1: dynamically chunk the initial population into islands.
	fn island_formation(&mut self, initial_population: Vec<Rc<PathSolution>>) -> Vec<Island> {
		let mut sorted = initial_population;
		sorted.sort_unstable_by(|a, b| b.fitness.partial_cmp(&a.fitness).unwrap());

		let cutoff = (sorted.len() as f64 * self.params.selection_threshold) as usize;
		let mut superior_pool: Vec<Rc<PathSolution>> = sorted[..cutoff.min(sorted.len())].to_vec();
		let mut central_pool: Vec<Rc<PathSolution>> = sorted;

		let mut islands: Vec<Island> = Vec::new();
		while !central_pool.is_empty() {
			let size = self.rng.gen_range(self.params.min_island_size..=self.params.max_island_size);
			let sp_count = ((size as f64 * self.params.selection_threshold) as usize).max(1);
			let cp_count = size - sp_count;

			if central_pool.len() < size {
				if let Some(last) = islands.last_mut() {
					last.p_cp.extend(central_pool.drain(..));
					last.p_sp.extend(superior_pool.drain(..));
				}
				break;
			}

			let mut island_sp = Vec::with_capacity(sp_count);
			for _ in 0..sp_count {
				if !superior_pool.is_empty() {
					let idx = self.rng.gen_range(0..superior_pool.len());
					island_sp.push(superior_pool.remove(idx));
				} else if let Some(first) = central_pool.first() {
					island_sp.push(first.clone());
				}
			}

			let mut island_cp = Vec::with_capacity(cp_count);
			for _ in 0..cp_count {
				if !central_pool.is_empty() {
					let idx = self.rng.gen_range(0..central_pool.len());
					island_cp.push(central_pool.remove(idx));
				}
			}

			islands.push(Island::new(island_sp, island_cp));
		}
		log::info!("Formed {} islands.", islands.len());
		islands
	}

	/// Algorithm 2: swap `p_sp` across islands according to a random permutation.
	fn migrate(&mut self, islands: &mut [Island]) {
		if islands.len() < 2 {
			return;
		}
		let mut indices: Vec<usize> = (0..islands.len()).collect();
		shuffle(&mut indices, &mut self.rng);

		let original_sps: Vec<Vec<Rc<PathSolution>>> = islands.iter().map(|i| i.p_sp.clone()).collect();
		for (i, island) in islands.iter_mut().enumerate() {
			island.p_sp = original_sps[indices[i]].clone();
		}
	}

	/// AvgIslandFit: filter offspring and pools against their running mean fitness.
	fn select_avgislandfit(&mut self, islands: &mut Vec<Island>, offspring_by_island: Vec<Vec<PathSolution>>) {
		for (island, offspring) in islands.iter_mut().zip(offspring_by_island.into_iter()) {
			let parent_count = island.p_sp.len() + island.p_cp.len();
			let avg_parent_fit = if parent_count == 0 {
				0.0
			} else {
				(island.p_sp.iter().chain(island.p_cp.iter()).map(|p| p.fitness).sum::<f64>()) / parent_count as f64
			};

			let valid_offspring: Vec<Rc<PathSolution>> = offspring.into_iter()
				.filter(|o| o.fitness >= avg_parent_fit)
				.map(Rc::new)
				.collect();

			let mut unique_map: HashMap<String, Rc<PathSolution>> = HashMap::new();
			for p in island.p_sp.iter().chain(island.p_cp.iter()).cloned().chain(valid_offspring.into_iter()) {
				unique_map.entry(p.hash()).or_insert(p);
			}
			let mut pool: Vec<Rc<PathSolution>> = unique_map.into_values().collect();
			pool.sort_unstable_by(|a, b| b.fitness.partial_cmp(&a.fitness).unwrap());

			let limit = self.params.max_island_size * 2;
			if pool.len() > limit {
				pool.truncate(limit);
			}

			if pool.is_empty() {
				continue;
			}

			let sp_cut = ((pool.len() as f64 * self.params.selection_threshold) as usize).max(1);
			let mut new_sp: Vec<Rc<PathSolution>> = pool[..sp_cut.min(pool.len())].to_vec();
			let mut new_cp: Vec<Rc<PathSolution>> = pool[sp_cut.min(pool.len())..].to_vec();

			new_sp = filter_above_mean(new_sp);
			new_cp = filter_above_mean(new_cp);

			if new_sp.is_empty() {
				new_sp = vec![pool[0].clone()];
			}

			if new_cp.len() > 5 {
				let max_remove = (new_cp.len() / 5).max(1);
				let remove = self.rng.gen_range(1..=max_remove);
				new_cp.truncate(new_cp.len() - remove);
			}

			island.p_sp = new_sp;
			island.p_cp = new_cp;
		}
	}

	/// Runs the full MIBGA loop and hands the discovered candidates to the
	/// diversity analyzer. Returns an empty vec if `t` is unreachable from
	/// `s`, or if no valid path could be discovered at all.
	pub fn run(&mut self) -> Vec<PathSolution> {
		let start = Instant::now();
		let timeout = Duration::from_secs(self.params.timeout_secs);

		let shortest_path_len = self.graph.shortest_path_length(self.s, self.t);
		log::info!("Shortest path length: {}", shortest_path_len);
		if shortest_path_len.is_infinite() {
			log::warn!("Target unreachable.");
			return Vec::new();
		}

		let mut registry: HashMap<String, Rc<PathSolution>> = HashMap::new();
		let initial_population = self.initialize_population(&mut registry);
		if initial_population.is_empty() {
			return Vec::new();
		}
		let mut islands = self.island_formation(initial_population);

		let mut generation = 0u64;
		while start.elapsed() <= timeout {
			self.migrate(&mut islands);

			let mut offspring_by_island = Vec::with_capacity(islands.len());
			for island in &islands {
				let offspring = island.generate_offspring(self.graph, self.params.mutation_prob, &mut self.rng);
				let mut valid_offspring = Vec::with_capacity(offspring.len());
				for mut child in offspring {
					child.calculate_length(self.graph);
					child.calculate_fitness();
					if child.length.is_finite() {
						let rc = Rc::new(child);
						registry.entry(rc.hash()).or_insert_with(|| rc.clone());
						valid_offspring.push((*rc).clone());
					}
				}
				offspring_by_island.push(valid_offspring);
			}

			self.select_avgislandfit(&mut islands, offspring_by_island);

			generation += 1;
			if generation % 10 == 0 {
				log::info!("Gen {} | Unique Paths: {} | Islands: {}", generation, registry.len(), islands.len());
			}
		}

		log::info!("Analyzing K-Most Diverse...");
		let candidates: Vec<PathSolution> = registry.values().map(|p| (**p).clone()).collect();
		find_kmdnsp(&candidates, self.k, shortest_path_len, self.epsilon, self.graph)
	}
}

fn filter_above_mean(pool: Vec<Rc<PathSolution>>) -> Vec<Rc<PathSolution>> {
	if pool.is_empty() {
		return pool;
	}
	let mean = pool.iter().map(|p| p.fitness).sum::<f64>() / pool.len() as f64;
	pool.into_iter().filter(|p| p.fitness >= mean).collect()
}

fn shuffle(indices: &mut [usize], rng: &mut impl Rng) {
	for i in (1..indices.len()).rev() {
		let j = rng.gen_range(0..=i);
		indices.swap(i, j);
	}
}
