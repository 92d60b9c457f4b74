//! CLI for computing the K Most Diverse Near-Shortest Paths between two
//! nodes via a migration-inspired island genetic algorithm.

use std::fs::File;

use clap::{App, Arg, SubCommand, crate_version};

mod error;
mod graph;
mod config;
mod path_solution;
mod walker;
mod operators;
mod island;
mod analysis;
mod engine;

use config::Parameters;
use engine::Mibga;
use graph::GraphService;
use path_solution::PathSolution;

#[derive(serde::Serialize)]
struct PathOutput {
	nodes: Vec<u64>,
	length: f64,
}

impl From<&PathSolution> for PathOutput {
	fn from(p: &PathSolution) -> Self {
		Self { nodes: p.nodes.clone(), length: p.length.raw() }
	}
}

fn main() -> std::io::Result<()> {
	env_logger::init_from_env(env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"));
	let matches = App::new("K Most Diverse Near-Shortest Paths")
							.version(crate_version!())
							.about("Find K diverse, near-shortest S-T paths with a migration-inspired genetic algorithm")
							.subcommand(SubCommand::with_name("solve")
								.about("Run MIBGA and report the K most diverse near-shortest paths")
								.arg(Arg::with_name("graph")
										.takes_value(true)
										.required(true)
										.index(1)
										.help("Edgelist graph file (\"u v [weight]\" per line)"))
								.arg(Arg::with_name("start")
										.short("S")
										.long("start")
										.takes_value(true)
										.required(true)
										.help("Source node id"))
								.arg(Arg::with_name("target")
										.short("T")
										.long("target")
										.takes_value(true)
										.required(true)
										.help("Target node id"))
								.arg(Arg::with_name("k")
										.short("K")
										.long("k-paths")
										.takes_value(true)
										.default_value("3")
										.validator(|s| s.parse::<usize>().map(|_| ()).map_err(|e| e.to_string()))
										.help("Number of diverse paths to return"))
								.arg(Arg::with_name("epsilon")
										.short("e")
										.long("epsilon")
										.takes_value(true)
										.default_value("0.2")
										.validator(|s| s.parse::<f64>().map(|_| ()).map_err(|e| e.to_string()))
										.help("Near-shortest tolerance"))
								.arg(Arg::with_name("config")
										.short("c")
										.long("config")
										.takes_value(true)
										.help("YAML file overriding the MIBGA parameters"))
								.arg(Arg::with_name("out")
										.short("o")
										.long("out")
										.takes_value(true)
										.help("Write result JSON here instead of stdout")))
							.subcommand(SubCommand::with_name("inspect")
								.about("Print node/edge counts and a sample of node ids")
								.arg(Arg::with_name("graph")
										.takes_value(true)
										.required(true)
										.index(1)
										.help("Edgelist graph file")))
							.get_matches();

	if let Some(matches) = matches.subcommand_matches("solve") {
		log::info!("Loading...");
		let graph = load_graph(matches.value_of("graph").unwrap())?;
		let s: u64 = matches.value_of("start").unwrap().parse().expect("start node is not an unsigned integer");
		let t: u64 = matches.value_of("target").unwrap().parse().expect("target node is not an unsigned integer");
		let k: usize = matches.value_of("k").unwrap().parse().unwrap();
		let epsilon: f64 = matches.value_of("epsilon").unwrap().parse().unwrap();

		if !graph.contains_node(s) {
			log::error!("Start node {} is not in the graph.", s);
			return Ok(());
		}
		if !graph.contains_node(t) {
			log::error!("Target node {} is not in the graph.", t);
			return Ok(());
		}

		let params: Parameters = match matches.value_of("config") {
			Some(path) => serde_yaml::from_reader(File::open(path)?).expect("Config file invalid YAML"),
			None => Parameters::default(),
		};
		log::info!("Loaded configuration");

		let rng = rand::thread_rng();
		let mut mibga = Mibga::new(&graph, s, t, k, epsilon, params, rng);
		let result = mibga.run();
		log::info!("Found {} diverse near-shortest paths", result.len());

		let output: Vec<PathOutput> = result.iter().map(PathOutput::from).collect();
		match matches.value_of("out") {
			Some(path) => serde_json::to_writer(&File::create(path)?, &output).unwrap(),
			None => {
				serde_json::to_writer_pretty(std::io::stdout(), &output).unwrap();
				println!();
			}
		}
	} else if let Some(matches) = matches.subcommand_matches("inspect") {
		let graph = load_graph(matches.value_of("graph").unwrap())?;
		let mut sample: Vec<u64> = graph.nodes().collect();
		sample.sort_unstable();
		sample.truncate(10);
		println!("Nodes: {}", graph.node_count());
		println!("Sample node ids: {:?}", sample);
		if sample.len() >= 2 {
			println!("Example: solve {} -S {} -T {}", matches.value_of("graph").unwrap(), sample[0], sample[1]);
		}
	}
	Ok(())
}

fn load_graph(path: &str) -> std::io::Result<GraphService> {
	let f = File::open(path)?;
	GraphService::load(f).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
}
