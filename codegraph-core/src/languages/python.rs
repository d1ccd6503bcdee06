//! Python extractor (§4.C).

use crate::model::{Edge, EdgeType, Graph, Language, Node, NodeType, node::file_node};
use crate::resolve::resolve_python_import;
use regex::Regex;
use std::sync::LazyLock;

static FROM_IMPORT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*from\s+([\w.]+)\s+import\b").unwrap());
static IMPORT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*import\s+([\w.]+)").unwrap());

static DEF: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*(?:async\s+)?def\s+([A-Za-z_]\w*)\s*\(").unwrap());
static CLASS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*class\s+([A-Za-z_]\w*)").unwrap());

static MQTT_PUBLISH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"\.publish\(\s*['"]([^'"]+)['"]"#).unwrap());
static MQTT_SUBSCRIBE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"\.subscribe\(\s*['"]([^'"]+)['"]"#).unwrap());
static MESSAGE_CALLBACK_ADD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"message_callback_add\(\s*['"]([^'"]+)['"]"#).unwrap());

static SER_READ: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bser\.(?:read|readline|read_until)\s*\(").unwrap());
static SER_WRITE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bser\.(?:write|writelines)\s*\(").unwrap());

static REQUESTS_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"requests\.(get|post|put|patch|delete|head|options)\(\s*['"]([^'"]+)['"]"#).unwrap()
});
static ROUTE_DEF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"@(?:app|router|blueprint)\.(?:route|get|post|put|patch|delete)\(\s*['"]([^'"]+)['"]"#).unwrap()
});

static ENV_BRACKET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"os\.environ\[\s*['"]([A-Za-z_][A-Za-z0-9_]*)['"]\s*\]"#).unwrap());
static ENV_GET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"os\.environ\.get\(\s*['"]([A-Za-z_][A-Za-z0-9_]*)['"]"#).unwrap());
static ENV_GETENV: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"os\.getenv\(\s*['"]([A-Za-z_][A-Za-z0-9_]*)['"]"#).unwrap());

pub fn extract(relpath: &str, content: &str, graph: &mut Graph) {
    let file_id = format!("file:{relpath}");
    graph.add_node(file_node(relpath, Language::Python));

    for (idx, raw_line) in content.lines().enumerate() {
        if raw_line.trim_start().starts_with('#') {
            continue;
        }
        let line_no = (idx + 1) as u32;

        if let Some(cap) = FROM_IMPORT.captures(raw_line) {
            emit_import(graph, &file_id, relpath, &cap[1], line_no);
        }
        if let Some(cap) = IMPORT.captures(raw_line) {
            emit_import(graph, &file_id, relpath, &cap[1], line_no);
        }

        if let Some(cap) = DEF.captures(raw_line) {
            let node_id = format!("func:{relpath}:{}", &cap[1]);
            graph.add_node(
                Node::new(&node_id, &cap[1], NodeType::Function, Language::Python)
                    .with_file(relpath)
                    .with_line(line_no),
            );
            graph.add_edge(Edge::new(file_id.clone(), node_id, EdgeType::Defines).with_file(relpath).with_line(line_no));
        }
        if let Some(cap) = CLASS.captures(raw_line) {
            let node_id = format!("class:{relpath}:{}", &cap[1]);
            graph.add_node(
                Node::new(&node_id, &cap[1], NodeType::Class, Language::Python)
                    .with_file(relpath)
                    .with_line(line_no),
            );
            graph.add_edge(Edge::new(file_id.clone(), node_id, EdgeType::Defines).with_file(relpath).with_line(line_no));
        }

        if let Some(cap) = MQTT_PUBLISH.captures(raw_line) {
            let node_id = format!("mqtt:{}", &cap[1]);
            graph.add_node(Node::new(&node_id, &cap[1], NodeType::Topic, Language::Python));
            graph.add_edge(Edge::new(file_id.clone(), node_id, EdgeType::Publishes).with_file(relpath).with_line(line_no));
        }
        for re in [&*MQTT_SUBSCRIBE, &*MESSAGE_CALLBACK_ADD] {
            if let Some(cap) = re.captures(raw_line) {
                let node_id = format!("mqtt:{}", &cap[1]);
                graph.add_node(Node::new(&node_id, &cap[1], NodeType::Topic, Language::Python));
                graph.add_edge(
                    Edge::new(node_id, file_id.clone(), EdgeType::Subscribes)
                        .with_file(relpath)
                        .with_line(line_no),
                );
            }
        }

        if SER_READ.is_match(raw_line) {
            emit_serial_node(graph);
            graph.add_edge(
                Edge::new("serial:connection", file_id.clone(), EdgeType::SerialRead)
                    .with_file(relpath)
                    .with_line(line_no),
            );
        }
        if SER_WRITE.is_match(raw_line) {
            emit_serial_node(graph);
            graph.add_edge(
                Edge::new(file_id.clone(), "serial:connection", EdgeType::SerialWrite)
                    .with_file(relpath)
                    .with_line(line_no),
            );
        }

        if let Some(cap) = REQUESTS_CALL.captures(raw_line) {
            let target = format!("http:{}:{}", cap[1].to_ascii_uppercase(), &cap[2]);
            graph.add_edge(Edge::new(file_id.clone(), target, EdgeType::Fetches).with_file(relpath).with_line(line_no));
        }
        if let Some(cap) = ROUTE_DEF.captures(raw_line) {
            let path = &cap[1];
            let node_id = format!("http:GET:{path}");
            graph.add_node(
                Node::new(&node_id, path, NodeType::Endpoint, Language::Python)
                    .with_file(relpath)
                    .with_line(line_no)
                    .with_metadata(crate::model::node::metadata_of([
                        ("method", serde_json::Value::String("GET".to_string())),
                        ("path", serde_json::Value::String(path.to_string())),
                    ])),
            );
            graph.add_edge(Edge::new(file_id.clone(), node_id, EdgeType::Defines).with_file(relpath).with_line(line_no));
        }

        for re in [&*ENV_BRACKET, &*ENV_GET, &*ENV_GETENV] {
            if let Some(cap) = re.captures(raw_line) {
                let node_id = format!("env:{}", &cap[1]);
                graph.add_node(Node::new(&node_id, &cap[1], NodeType::Variable, Language::Config));
                graph.add_edge(Edge::new(file_id.clone(), node_id, EdgeType::EnvUses).with_file(relpath).with_line(line_no));
            }
        }
    }
}

fn emit_import(graph: &mut Graph, file_id: &str, relpath: &str, raw: &str, line: u32) {
    let resolved = resolve_python_import(relpath, raw);
    let target = format!("file:{resolved}");
    let edge = Edge::new(file_id, target, EdgeType::Imports)
        .with_file(relpath)
        .with_line(line)
        .with_metadata(crate::model::node::metadata_of([("raw", serde_json::Value::String(raw.to_string()))]));
    graph.add_edge(edge);
}

fn emit_serial_node(graph: &mut Graph) {
    graph.add_node(Node::new("serial:connection", "serial", NodeType::Event, Language::Python));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_def_class_and_route() {
        let mut g = Graph::new();
        let src = "class Foo:\n    def bar(self):\n        pass\n\n@app.route('/users/<id>')\ndef users():\n    pass\n";
        extract("srv.py", src, &mut g);

        assert!(g.get_node("class:srv.py:Foo").is_some());
        assert!(g.get_node("func:srv.py:bar").is_some());
        assert!(g.get_node("http:GET:/users/<id>").is_some());
    }

    #[test]
    fn serial_write_then_read_share_singleton_node() {
        let mut g = Graph::new();
        extract("dev.py", "ser.write(b'x')\nser.read()\n", &mut g);
        assert_eq!(g.nodes().filter(|n| n.id == "serial:connection").count(), 1);
        assert!(g.edges().iter().any(|e| e.edge_type == EdgeType::SerialWrite));
        assert!(g.edges().iter().any(|e| e.edge_type == EdgeType::SerialRead));
    }
}
