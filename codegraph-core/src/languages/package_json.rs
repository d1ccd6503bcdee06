//! `package.json` extractor (§4.C). Tolerant of parse failure: the file
//! node is always recorded even when the JSON body can't be parsed.

use crate::model::{Edge, EdgeType, Graph, Language, Node, NodeType, node::file_node, node::metadata_of};
use serde_json::Value;
use tracing::warn;

const DEP_SECTIONS: [&str; 2] = ["dependencies", "devDependencies"];

pub fn extract(relpath: &str, content: &str, graph: &mut Graph) {
    let file_id = format!("file:{relpath}");
    graph.add_node(file_node(relpath, Language::Config));

    let parsed: Value = match serde_json::from_str(content) {
        Ok(v) => v,
        Err(err) => {
            warn!(path = relpath, error = %err, "package.json: parse failed, skipping metadata");
            return;
        }
    };

    for section in DEP_SECTIONS {
        let Some(deps) = parsed.get(section).and_then(Value::as_object) else {
            continue;
        };
        for name in deps.keys() {
            let node_id = format!("pkg:{name}");
            graph.add_node(Node::new(&node_id, name.as_str(), NodeType::File, Language::Config));
            graph.add_edge(
                Edge::new(file_id.clone(), node_id, EdgeType::Imports)
                    .with_file(relpath)
                    .with_metadata(metadata_of([("type", Value::String(section.to_string()))])),
            );
        }
    }

    if let Some(scripts) = parsed.get("scripts").and_then(Value::as_object) {
        for (name, cmd) in scripts.iter() {
            let node_id = format!("script:{relpath}:{name}");
            let cmd = cmd.as_str().unwrap_or_default();
            graph.add_node(
                Node::new(&node_id, name.as_str(), NodeType::Function, Language::Config)
                    .with_file(relpath)
                    .with_metadata(metadata_of([("command", Value::String(cmd.to_string()))])),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_deps_and_scripts() {
        let mut g = Graph::new();
        let src = r#"{"dependencies":{"lodash":"^4.0.0"},"devDependencies":{"jest":"^29.0.0"},"scripts":{"test":"jest"}}"#;
        extract("package.json", src, &mut g);

        assert!(g.get_node("pkg:lodash").is_some());
        assert!(g.get_node("pkg:jest").is_some());
        let script = g.get_node("script:package.json:test").expect("script node");
        assert_eq!(script.metadata.get("command").and_then(Value::as_str), Some("jest"));
        assert!(!g.edges().iter().any(|e| e.edge_type == EdgeType::Defines));

        let dep_edge = g.edges().iter().find(|e| e.target == "pkg:jest").expect("dep edge");
        assert_eq!(dep_edge.metadata.get("type").and_then(Value::as_str), Some("devDependencies"));
    }

    #[test]
    fn malformed_json_still_records_file_node() {
        let mut g = Graph::new();
        extract("package.json", "{not valid json", &mut g);
        assert!(g.get_node("file:package.json").is_some());
        assert_eq!(g.node_count(), 1);
    }
}
