//! The graph container: node/edge storage, adjacency indices, subgraph
//! extraction, and connected-component clustering.
//!
//! Nodes are identified by a semantic string id (`kind:path[:name]`) rather
//! than an opaque handle, and `add_node` never overwrites an existing
//! definition. That first-wins, string-keyed contract doesn't map onto an
//! index-based graph representation (a node's "identity" has to survive
//! across files extracted in any order), so storage here is a plain
//! `HashMap<String, Node>` plus an edge list, with adjacency maintained as
//! parallel indices into the edge list to keep insertion order without
//! duplicating edge data.

use super::bridge::Bridge;
use super::edge::Edge;
use super::node::Node;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

/// Direction to traverse when listing neighbors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
    Both,
}

#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: HashMap<String, Node>,
    edges: Vec<Edge>,
    bridges: Vec<Bridge>,
    forward: HashMap<String, Vec<usize>>,
    reverse: HashMap<String, Vec<usize>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `node` if its id is not already present. Returns `true` if inserted.
    pub fn add_node(&mut self, node: Node) -> bool {
        if self.nodes.contains_key(&node.id) {
            return false;
        }
        self.nodes.insert(node.id.clone(), node);
        true
    }

    /// Append `edge` unconditionally and index it into both adjacency maps.
    /// Returns the edge's index in insertion order.
    pub fn add_edge(&mut self, edge: Edge) -> usize {
        let idx = self.edges.len();
        self.forward.entry(edge.source.clone()).or_default().push(idx);
        self.reverse.entry(edge.target.clone()).or_default().push(idx);
        self.edges.push(edge);
        idx
    }

    pub fn add_bridge(&mut self, bridge: Bridge) {
        self.bridges.push(bridge);
    }

    pub fn get_node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn bridges(&self) -> &[Bridge] {
        &self.bridges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Neighbor node IDs of `id` in the requested direction, in first-seen
    /// edge order (not deduplicated beyond first occurrence).
    pub fn neighbors(&self, id: &str, direction: Direction) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        if matches!(direction, Direction::Forward | Direction::Both) {
            if let Some(idxs) = self.forward.get(id) {
                for &i in idxs {
                    let t = &self.edges[i].target;
                    if seen.insert(t.clone()) {
                        out.push(t.clone());
                    }
                }
            }
        }
        if matches!(direction, Direction::Backward | Direction::Both) {
            if let Some(idxs) = self.reverse.get(id) {
                for &i in idxs {
                    let s = &self.edges[i].source;
                    if seen.insert(s.clone()) {
                        out.push(s.clone());
                    }
                }
            }
        }
        out
    }

    /// Resolve a possibly-partial start id against the graph's node ids,
    /// per the disambiguation rules in §4.A. Returns `None` if nothing matches.
    fn resolve_start(&self, start: &str) -> Option<String> {
        if self.nodes.contains_key(start) {
            return Some(start.to_string());
        }
        let mut matches: Vec<&str> = self
            .nodes
            .keys()
            .map(String::as_str)
            .filter(|id| id.contains(start))
            .collect();
        if matches.is_empty() {
            return None;
        }
        if matches.len() == 1 {
            return Some(matches[0].to_string());
        }
        matches.sort_unstable();
        let preferred: Vec<&str> = matches
            .iter()
            .copied()
            .filter(|id| id.ends_with(start) || id.rsplit(':').next() == Some(start))
            .collect();
        if let Some(first) = preferred.first() {
            Some(first.to_string())
        } else {
            Some(matches[0].to_string())
        }
    }

    /// BFS-bounded projection around `start_id`, including edges traversed
    /// while expanding nodes at depth `< max_depth`, plus any bridge whose
    /// producer/consumer files intersect the resulting file set.
    ///
    /// A node only has its outgoing/incoming edges expanded while its own
    /// BFS depth is strictly less than `max_depth`; this is what keeps a
    /// `max_depth = 1` subgraph to exactly the start node and its direct
    /// neighbors (see the worked example in §8).
    pub fn subgraph(&self, start_id: &str, max_depth: usize) -> Graph {
        let mut sub = Graph::new();
        let Some(resolved) = self.resolve_start(start_id) else {
            return sub;
        };

        if let Some(n) = self.nodes.get(&resolved) {
            sub.add_node(n.clone());
        }

        let mut depth_of: HashMap<String, usize> = HashMap::new();
        depth_of.insert(resolved.clone(), 0);
        let mut queue: VecDeque<(String, usize)> = VecDeque::new();
        queue.push_back((resolved, 0));
        let mut added_edges: HashSet<usize> = HashSet::new();

        while let Some((cur, depth)) = queue.pop_front() {
            if depth >= max_depth {
                continue;
            }
            let mut touched: Vec<(usize, String)> = Vec::new();
            if let Some(idxs) = self.forward.get(&cur) {
                for &i in idxs {
                    touched.push((i, self.edges[i].target.clone()));
                }
            }
            if let Some(idxs) = self.reverse.get(&cur) {
                for &i in idxs {
                    touched.push((i, self.edges[i].source.clone()));
                }
            }
            for (idx, neighbor) in touched {
                if added_edges.insert(idx) {
                    sub.add_edge(self.edges[idx].clone());
                }
                if !depth_of.contains_key(&neighbor) {
                    depth_of.insert(neighbor.clone(), depth + 1);
                    if let Some(n) = self.nodes.get(&neighbor) {
                        sub.add_node(n.clone());
                    }
                    queue.push_back((neighbor, depth + 1));
                }
            }
        }

        let sub_files: BTreeSet<&str> = sub
            .nodes
            .values()
            .map(|n| n.file.as_str())
            .filter(|f| !f.is_empty())
            .collect();
        for bridge in &self.bridges {
            if bridge.files().iter().any(|f| sub_files.contains(f.as_str())) {
                sub.add_bridge(bridge.clone());
            }
        }

        sub
    }

    /// Undirected connected components over all node ids, sorted by size
    /// descending (ties broken by the lexicographically smallest member id,
    /// for determinism).
    fn connected_components(&self) -> Vec<Vec<String>> {
        let mut all_ids: Vec<&str> = self.nodes.keys().map(String::as_str).collect();
        all_ids.sort_unstable();

        let mut visited: HashSet<String> = HashSet::new();
        let mut components: Vec<Vec<String>> = Vec::new();

        for &seed in &all_ids {
            if visited.contains(seed) {
                continue;
            }
            let mut component = Vec::new();
            let mut queue = VecDeque::new();
            queue.push_back(seed.to_string());
            visited.insert(seed.to_string());
            while let Some(id) = queue.pop_front() {
                component.push(id.clone());
                for n in self.neighbors(&id, Direction::Both) {
                    if visited.insert(n.clone()) {
                        queue.push_back(n);
                    }
                }
            }
            component.sort();
            components.push(component);
        }

        components.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.first().cmp(&b.first())));
        components
    }

    /// File-level connected components: for each node-id component, collect
    /// its distinct non-empty `file` values, drop components with fewer than
    /// `min_size` files, then deduplicate files against larger clusters
    /// already emitted (iterating size-descending), keeping a cluster only
    /// if at least `min_size` files remain after dedup.
    pub fn file_clusters(&self, min_size: usize) -> Vec<Vec<String>> {
        let mut file_sets: Vec<BTreeSet<String>> = self
            .connected_components()
            .into_iter()
            .map(|component| {
                component
                    .into_iter()
                    .filter_map(|id| self.nodes.get(&id))
                    .map(|n| n.file.clone())
                    .filter(|f| !f.is_empty())
                    .collect::<BTreeSet<String>>()
            })
            .filter(|files| files.len() >= min_size)
            .collect();

        file_sets.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.iter().next().cmp(&b.iter().next())));

        let mut seen: HashSet<String> = HashSet::new();
        let mut result = Vec::new();
        for files in file_sets {
            let remaining: BTreeSet<String> = files.into_iter().filter(|f| !seen.contains(f)).collect();
            if remaining.len() >= min_size {
                seen.extend(remaining.iter().cloned());
                result.push(remaining.into_iter().collect());
            }
        }
        result
    }

    /// File-typed nodes that did not land in any reported cluster.
    pub fn orphan_files(&self, clusters: &[Vec<String>]) -> Vec<String> {
        let clustered: HashSet<&str> = clusters.iter().flatten().map(String::as_str).collect();
        let mut orphans: Vec<String> = self
            .nodes
            .values()
            .filter(|n| n.node_type == super::node::NodeType::File)
            .map(|n| n.file.clone())
            .filter(|f| !f.is_empty() && !clustered.contains(f.as_str()))
            .collect();
        orphans.sort();
        orphans.dedup();
        orphans
    }

    pub fn stats(&self) -> super::stats::Stats {
        super::stats::Stats::compute(self)
    }
}
