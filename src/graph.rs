//! Graph ingestion and queries.
//!
//! `GraphService` is the only upward dependency the rest of the crate
//! consumes: a read-only, non-owning collaborator passed around by
//! reference. It understands a single plain-text edgelist format -
//! coordinate interning, Excel/CSV ingestion and the like are explicitly
//! out of scope (see SPEC_FULL.md §4.1).

use std::io::BufRead;

use indexmap::IndexMap;
use priority_queue::PriorityQueue;
pub use noisy_float::prelude::{N64, n64, Float};

use crate::error::GraphParseError;

pub type NodeId = u64;

/// Undirected, weighted graph loaded from an edgelist.
///
/// Each line is `u v [weight]`, whitespace-separated; `weight` defaults to
/// `1.0` when omitted. Blank lines and `#`-prefixed comments are skipped.
#[derive(Clone, Debug, Default)]
pub struct GraphService {
	neighbors: IndexMap<NodeId, Vec<NodeId>>,
	weights: IndexMap<(NodeId, NodeId), N64>,
}

fn edge_key(u: NodeId, v: NodeId) -> (NodeId, NodeId) {
	if u <= v { (u, v) } else { (v, u) }
}

impl GraphService {
	/// Parse an edgelist from any `Read`.
	pub fn load(r: impl std::io::Read) -> Result<Self, GraphParseError> {
		let mut g = GraphService::default();
		for (i, line) in std::io::BufReader::new(r).lines().enumerate() {
			let line_no = i + 1;
			let line = line.map_err(|e| GraphParseError { line_no, line: String::new(), reason: e.to_string() })?;
			let trimmed = line.trim();
			if trimmed.is_empty() || trimmed.starts_with('#') {
				continue;
			}
			let mut it = trimmed.split_whitespace();
			let u: NodeId = it.next()
				.ok_or_else(|| GraphParseError { line_no, line: line.clone(), reason: "missing source node".into() })?
				.parse()
				.map_err(|_| GraphParseError { line_no, line: line.clone(), reason: "source node is not an unsigned integer".into() })?;
			let v: NodeId = it.next()
				.ok_or_else(|| GraphParseError { line_no, line: line.clone(), reason: "missing target node".into() })?
				.parse()
				.map_err(|_| GraphParseError { line_no, line: line.clone(), reason: "target node is not an unsigned integer".into() })?;
			let w: f64 = match it.next() {
				Some(s) => s.parse().map_err(|_| GraphParseError { line_no, line: line.clone(), reason: "weight is not a number".into() })?,
				None => 1.0,
			};
			g.add_edge(u, v, n64(w));
		}
		Ok(g)
	}

	fn ensure_node(&mut self, n: NodeId) {
		self.neighbors.entry(n).or_insert_with(Vec::new);
	}

	fn add_edge(&mut self, u: NodeId, v: NodeId, w: N64) {
		self.ensure_node(u);
		self.ensure_node(v);
		if !self.neighbors[&u].contains(&v) {
			self.neighbors.get_mut(&u).unwrap().push(v);
		}
		if u != v && !self.neighbors[&v].contains(&u) {
			self.neighbors.get_mut(&v).unwrap().push(u);
		}
		self.weights.insert(edge_key(u, v), w);
	}

	/// The undirected weight of `(u, v)`, or `+inf` if no such edge exists.
	pub fn edge_weight(&self, u: NodeId, v: NodeId) -> N64 {
		self.weights.get(&edge_key(u, v)).copied().unwrap_or_else(N64::infinity)
	}

	/// Neighbors of `u`; empty for unknown nodes.
	pub fn neighbors(&self, u: NodeId) -> &[NodeId] {
		self.neighbors.get(&u).map(Vec::as_slice).unwrap_or(&[])
	}

	pub fn node_count(&self) -> usize {
		self.neighbors.len()
	}

	pub fn contains_node(&self, u: NodeId) -> bool {
		self.neighbors.contains_key(&u)
	}

	pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
		self.neighbors.keys().copied()
	}

	/// Dijkstra's algorithm over `edge_weight`; `+inf` if `t` is unreachable from `s`.
	pub fn shortest_path_length(&self, s: NodeId, t: NodeId) -> N64 {
		if s == t {
			return n64(0.0);
		}
		let mut dist: IndexMap<NodeId, N64> = IndexMap::new();
		dist.insert(s, n64(0.0));
		let mut pq: PriorityQueue<NodeId, N64> = PriorityQueue::new();
		pq.push(s, n64(0.0));
		while let Some((u, _)) = pq.pop() {
			if u == t {
				return dist[&u];
			}
			let d = dist[&u];
			for &v in self.neighbors(u) {
				let nd = d + self.edge_weight(u, v);
				if dist.get(&v).map_or(true, |&cur| nd < cur) {
					dist.insert(v, nd);
					pq.push(v, -nd);
				}
			}
		}
		dist.get(&t).copied().unwrap_or_else(N64::infinity)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn triangle() -> GraphService {
		GraphService::load("0 1 1\n1 2 1\n0 2 3\n".as_bytes()).unwrap()
	}

	#[test]
	fn parses_weighted_edgelist() {
		let g = triangle();
		assert_eq!(g.node_count(), 3);
		assert_eq!(g.edge_weight(0, 1), n64(1.0));
		assert_eq!(g.edge_weight(1, 0), n64(1.0));
		assert_eq!(g.edge_weight(0, 2), n64(3.0));
		assert!(g.edge_weight(0, 99).is_infinite());
	}

	#[test]
	fn defaults_missing_weight_to_one() {
		let g = GraphService::load("5 6\n".as_bytes()).unwrap();
		assert_eq!(g.edge_weight(5, 6), n64(1.0));
	}

	#[test]
	fn skips_comments_and_blank_lines() {
		let g = GraphService::load("# comment\n\n0 1 2\n".as_bytes()).unwrap();
		assert_eq!(g.node_count(), 2);
	}

	#[test]
	fn rejects_malformed_lines() {
		let err = GraphService::load("a b\n".as_bytes()).unwrap_err();
		assert_eq!(err.line_no, 1);
	}

	#[test]
	fn shortest_path_picks_cheaper_route() {
		let g = triangle();
		assert_eq!(g.shortest_path_length(0, 2), n64(2.0));
	}

	#[test]
	fn shortest_path_is_infinite_when_disconnected() {
		let g = GraphService::load("0 1 1\n2 3 1\n".as_bytes()).unwrap();
		assert!(g.shortest_path_length(0, 3).is_infinite());
	}

	#[test]
	fn neighbors_are_empty_for_unknown_node() {
		let g = triangle();
		assert!(g.neighbors(42).is_empty());
		assert!(!g.contains_node(42));
		assert!(g.contains_node(0));
	}
}
