//! Deterministic multi-language dependency graph builder.
//!
//! [`build_graph`] is the single pipeline entry point (§2's "leaves first"
//! data flow): it takes `(relpath, bytes)` pairs — filesystem walking is a
//! thin collaborator the caller supplies, see [`discovery`] — decodes and
//! classifies each one, runs the matching [`languages`] extractor in input
//! order, then runs the [`bridges`] detector once over the finished graph.
//! Everything downstream ([`serialize`], [`review_cluster`], [`render`])
//! only reads the resulting [`Graph`].

pub mod bridges;
pub mod config;
pub mod discovery;
pub mod error;
pub mod languages;
pub mod model;
pub mod render;
pub mod resolve;
pub mod review_cluster;
pub mod serialize;
mod util;

pub use config::GraphConfig;
pub use error::CoreError;
pub use model::{Actor, Bridge, BridgeType, Direction, Edge, EdgeType, Graph, Language, Node, NodeType, Stats};

use tracing::info;

/// Build a populated, bridge-enriched [`Graph`] from `(relpath, bytes)`
/// pairs. `files` need not be pre-sorted or pre-filtered — this function
/// applies the same size limit, language classification, and
/// lexicographic-by-path ordering that [`discovery::discover_files`] applies
/// to a real filesystem walk, so the two entry points are interchangeable
/// for determinism purposes (§5).
pub fn build_graph(files: &[(String, Vec<u8>)], cfg: &GraphConfig) -> Graph {
    let within_limit: Vec<(String, Vec<u8>)> = files
        .iter()
        .filter(|(_, bytes)| bytes.len() <= cfg.limits.max_file_bytes)
        .cloned()
        .collect();
    let discovered = discovery::discovered_from_pairs(&within_limit);

    let mut graph = Graph::new();
    for (file, content) in &discovered {
        languages::extract(&file.relpath, content, file.language, &mut graph);
    }
    bridges::detect(&mut graph);

    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        bridges = graph.bridges().len(),
        "build_graph: done"
    );
    graph
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_graph_is_deterministic_across_runs() {
        let files = vec![
            ("b.py".to_string(), b"import a\n".to_vec()),
            ("a.py".to_string(), b"def f():\n    pass\n".to_vec()),
        ];
        let cfg = GraphConfig::default();
        let g1 = build_graph(&files, &cfg);
        let g2 = build_graph(&files, &cfg);
        assert_eq!(serialize::to_json(&g1), serialize::to_json(&g2));
    }

    #[test]
    fn oversized_file_is_skipped() {
        let mut cfg = GraphConfig::default();
        cfg.limits.max_file_bytes = 4;
        let files = vec![("big.py".to_string(), b"def f():\n    pass\n".to_vec())];
        let g = build_graph(&files, &cfg);
        assert_eq!(g.node_count(), 0);
    }
}
