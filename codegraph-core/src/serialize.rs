//! JSON serialization (§4.F): the graph's normative, bit-identical output
//! form. Node/edge/bridge field omission (empty `line`/`file`/`metadata`)
//! is already encoded on the model types via `skip_serializing_if`; what
//! this module adds is the map-shaped `nodes` object (keyed by id, id
//! itself dropped from the value since it's redundant with the key) and a
//! deterministic, sorted-by-id iteration order — `Graph` stores nodes in a
//! `HashMap`, so without sorting here the object's key order (and thus the
//! serialized bytes) would vary run to run even though the node set itself
//! is identical.

use crate::model::{Edge, Graph, Node};
use serde_json::{Map, Value, json};

/// The full graph document: `{ stats, nodes, edges, bridges }`.
pub fn to_json(graph: &Graph) -> Value {
    json!({
        "stats": graph.stats(),
        "nodes": nodes_map(graph),
        "edges": graph.edges().iter().map(edge_value).collect::<Vec<_>>(),
        "bridges": graph.bridges(),
    })
}

/// The bridges-only variant (§6): just the `bridges` array.
pub fn bridges_only_json(graph: &Graph) -> Value {
    json!(graph.bridges())
}

fn nodes_map(graph: &Graph) -> Value {
    let mut ids: Vec<&str> = graph.nodes().map(|n| n.id.as_str()).collect();
    ids.sort_unstable();

    let mut map = Map::new();
    for id in ids {
        let node = graph.get_node(id).expect("id collected from nodes() must resolve");
        map.insert(id.to_string(), node_value(node));
    }
    Value::Object(map)
}

fn node_value(node: &Node) -> Value {
    let mut m = Map::new();
    if !node.file.is_empty() {
        m.insert("file".to_string(), Value::String(node.file.clone()));
    }
    m.insert("name".to_string(), Value::String(node.name.clone()));
    m.insert("node_type".to_string(), Value::String(node.node_type.to_string()));
    m.insert("language".to_string(), Value::String(node.language.to_string()));
    if node.line != 0 {
        m.insert("line".to_string(), Value::Number(node.line.into()));
    }
    if !node.metadata.is_empty() {
        m.insert("metadata".to_string(), Value::Object(node.metadata.clone()));
    }
    Value::Object(m)
}

fn edge_value(edge: &Edge) -> Value {
    let mut m = Map::new();
    m.insert("source".to_string(), Value::String(edge.source.clone()));
    m.insert("target".to_string(), Value::String(edge.target.clone()));
    m.insert("edge_type".to_string(), Value::String(edge.edge_type.to_string()));
    if !edge.file.is_empty() {
        m.insert("file".to_string(), Value::String(edge.file.clone()));
    }
    if edge.line != 0 {
        m.insert("line".to_string(), Value::Number(edge.line.into()));
    }
    if !edge.metadata.is_empty() {
        m.insert("metadata".to_string(), Value::Object(edge.metadata.clone()));
    }
    Value::Object(m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::languages;
    use crate::model::Language;

    #[test]
    fn node_map_is_sorted_and_omits_id_and_empty_fields() {
        let mut g = Graph::new();
        languages::extract("b.py", "def f():\n    pass\n", Some(Language::Python), &mut g);
        languages::extract("a.py", "def g():\n    pass\n", Some(Language::Python), &mut g);

        let doc = to_json(&g);
        let nodes = doc["nodes"].as_object().unwrap();
        let keys: Vec<&String> = nodes.keys().collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);

        let file_a = &nodes["file:a.py"];
        assert!(file_a.get("id").is_none());
        assert!(file_a.get("line").is_none());
        assert!(file_a.get("metadata").is_none());
        assert_eq!(file_a["language"], "python");
    }

    #[test]
    fn serialization_is_byte_identical_across_runs() {
        let mut g1 = Graph::new();
        let mut g2 = Graph::new();
        let src = "from .util import helper\nclass Foo:\n    def bar(self):\n        pass\n";
        languages::extract("pkg/srv.py", src, Some(Language::Python), &mut g1);
        languages::extract("pkg/srv.py", src, Some(Language::Python), &mut g2);

        let s1 = serde_json::to_string(&to_json(&g1)).unwrap();
        let s2 = serde_json::to_string(&to_json(&g2)).unwrap();
        assert_eq!(s1, s2);
    }
}
