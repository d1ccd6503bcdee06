//! `.env` extractor (§4.C): `NAME = VALUE` lines become `env_defines` edges.

use crate::model::{Edge, EdgeType, Graph, Language, Node, NodeType, node::file_node};
use regex::Regex;
use std::sync::LazyLock;

static ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*)\s*=").unwrap());

pub fn extract(relpath: &str, content: &str, graph: &mut Graph) {
    let file_id = format!("file:{relpath}");
    graph.add_node(file_node(relpath, Language::Config));

    for (idx, raw_line) in content.lines().enumerate() {
        let trimmed = raw_line.trim_start();
        if trimmed.starts_with('#') || trimmed.is_empty() {
            continue;
        }
        let line_no = (idx + 1) as u32;
        if let Some(cap) = ASSIGNMENT.captures(raw_line) {
            let name = &cap[1];
            let node_id = format!("env:{name}");
            graph.add_node(Node::new(&node_id, name, NodeType::Variable, Language::Config));
            graph.add_edge(
                Edge::new(file_id.clone(), node_id, EdgeType::EnvDefines)
                    .with_file(relpath)
                    .with_line(line_no),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_defined_variables() {
        let mut g = Graph::new();
        extract(".env", "# comment\nDATABASE_URL=postgres://localhost\nPORT = 8080\n", &mut g);
        assert!(g.get_node("env:DATABASE_URL").is_some());
        assert!(g.get_node("env:PORT").is_some());
        assert_eq!(g.edges().iter().filter(|e| e.edge_type == EdgeType::EnvDefines).count(), 2);
    }
}
