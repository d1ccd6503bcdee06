//! Graph-level statistics: counts, distinct files/languages, and
//! per-edge-type / per-bridge-type counts sorted descending.

use super::graph::Graph;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// A count map serialized in descending-count order (ties broken
/// alphabetically by key), matching §4.F's "sorted by descending count"
/// requirement. `serde_json`'s `Map` preserves insertion order (the
/// `preserve_order` feature is enabled), so building this as an ordered
/// `Vec` of pairs and serializing it as a map keeps the output stable.
#[derive(Debug, Clone)]
pub struct RankedCounts(Vec<(String, usize)>);

impl RankedCounts {
    fn from_map(map: HashMap<String, usize>) -> Self {
        let mut pairs: Vec<(String, usize)> = map.into_iter().collect();
        pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Self(pairs)
    }
}

impl Serialize for RankedCounts {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    pub node_count: usize,
    pub edge_count: usize,
    pub bridge_count: usize,
    pub file_count: usize,
    pub languages: Vec<String>,
    pub edge_type_counts: RankedCounts,
    pub bridge_type_counts: RankedCounts,
}

impl Stats {
    pub fn compute(graph: &Graph) -> Self {
        let mut files: BTreeSet<String> = BTreeSet::new();
        let mut languages: BTreeSet<String> = BTreeSet::new();
        for n in graph.nodes() {
            if !n.file.is_empty() {
                files.insert(n.file.clone());
            }
            languages.insert(n.language.to_string());
        }

        let mut edge_type_counts: HashMap<String, usize> = HashMap::new();
        for e in graph.edges() {
            *edge_type_counts.entry(e.edge_type.to_string()).or_insert(0) += 1;
        }

        let mut bridge_type_counts: HashMap<String, usize> = HashMap::new();
        for b in graph.bridges() {
            *bridge_type_counts.entry(b.bridge_type.to_string()).or_insert(0) += 1;
        }

        Self {
            node_count: graph.node_count(),
            edge_count: graph.edge_count(),
            bridge_count: graph.bridges().len(),
            file_count: files.len(),
            languages: languages.into_iter().collect(),
            edge_type_counts: RankedCounts::from_map(edge_type_counts),
            bridge_type_counts: RankedCounts::from_map(bridge_type_counts),
        }
    }
}
