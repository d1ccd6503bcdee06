//! JavaScript/TypeScript extractor (§4.C). `.ts`/`.tsx` files are treated
//! identically to `.js` — only the node/edge `language` tag differs (§9).

use crate::model::{Edge, EdgeType, Graph, Language, Node, NodeType, node::file_node, node::metadata_of};
use crate::resolve::resolve_js_import;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static IMPORT_FROM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"import\s+[^;'"]*\bfrom\s+['"]([^'"]+)['"]"#).unwrap());
static IMPORT_BARE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"^\s*import\s+['"]([^'"]+)['"]"#).unwrap());
static REQUIRE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"require\(\s*['"]([^'"]+)['"]\s*\)"#).unwrap());
static DYNAMIC_IMPORT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"\bimport\(\s*['"]([^'"]+)['"]\s*\)"#).unwrap());

static EXPORT_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"export\s+(?:default\s+)?(?:function|class|const|let|var)\s+([A-Za-z_$][\w$]*)"#).unwrap()
});
static EXPORT_LIST: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"export\s*\{\s*([^}]+)\s*\}"#).unwrap());

static ROUTE_DEF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:app|router|server)\.(get|post|put|patch|delete|all)\(\s*['"]([^'"]+)['"]"#).unwrap()
});
static FETCH_CALL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"\bfetch\(\s*['"]([^'"]+)['"]"#).unwrap());
static AXIOS_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:axios|api)\.(get|post|put|patch|delete|head|options)\(\s*['"]([^'"]+)['"]"#).unwrap()
});

static WS_EMIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"(?:socket|io)\.emit\(\s*['"]([^'"]+)['"]"#).unwrap());
static WS_ON: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"(?:socket|io)\.on\(\s*['"]([^'"]+)['"]"#).unwrap());

static MQTT_PUBLISH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"\.publish\(\s*['"]([^'"]+)['"]"#).unwrap());
static MQTT_SUBSCRIBE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"\.subscribe\(\s*['"]([^'"]+)['"]"#).unwrap());

static ENV_DOT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"process\.env\.([A-Za-z_][A-Za-z0-9_]*)"#).unwrap());
static ENV_BRACKET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"process\.env\[\s*['"]([A-Za-z_][A-Za-z0-9_]*)['"]\s*\]"#).unwrap());
static ENV_META: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"import\.meta\.env\.([A-Za-z_][A-Za-z0-9_]*)"#).unwrap());

pub fn extract(relpath: &str, content: &str, language: Language, graph: &mut Graph) {
    let file_id = format!("file:{relpath}");
    graph.add_node(file_node(relpath, language));

    for (idx, raw_line) in content.lines().enumerate() {
        if raw_line.trim_start().starts_with("//") {
            continue;
        }
        let line_no = (idx + 1) as u32;

        for re in [&*IMPORT_FROM, &*REQUIRE, &*DYNAMIC_IMPORT] {
            for cap in re.captures_iter(raw_line) {
                emit_import(graph, &file_id, relpath, &cap[1], line_no);
            }
        }
        if let Some(cap) = IMPORT_BARE.captures(raw_line) {
            emit_import(graph, &file_id, relpath, &cap[1], line_no);
        }

        if let Some(cap) = EXPORT_DECL.captures(raw_line) {
            emit_export(graph, &file_id, relpath, &cap[1], line_no);
        }
        if let Some(cap) = EXPORT_LIST.captures(raw_line) {
            for item in cap[1].split(',') {
                let name = item.split(" as ").last().unwrap_or(item).trim();
                if !name.is_empty() {
                    emit_export(graph, &file_id, relpath, name, line_no);
                }
            }
        }

        if let Some(cap) = ROUTE_DEF.captures(raw_line) {
            let method = cap[1].to_ascii_uppercase();
            let path = cap[2].to_string();
            emit_route(graph, &file_id, relpath, &method, &path, language, line_no);
        }
        if let Some(cap) = FETCH_CALL.captures(raw_line) {
            emit_fetch(graph, &file_id, relpath, "GET", &cap[1], line_no);
        }
        if let Some(cap) = AXIOS_CALL.captures(raw_line) {
            emit_fetch(graph, &file_id, relpath, &cap[1].to_ascii_uppercase(), &cap[2], line_no);
        }

        if let Some(cap) = WS_EMIT.captures(raw_line) {
            emit_ws_emit(graph, &file_id, relpath, &cap[1], line_no);
        }
        if let Some(cap) = WS_ON.captures(raw_line) {
            emit_ws_listen(graph, &file_id, relpath, &cap[1], line_no);
        }

        if let Some(cap) = MQTT_PUBLISH.captures(raw_line) {
            emit_mqtt_publish(graph, &file_id, relpath, &cap[1], line_no);
        }
        if let Some(cap) = MQTT_SUBSCRIBE.captures(raw_line) {
            emit_mqtt_subscribe(graph, &file_id, relpath, &cap[1], line_no);
        }

        for re in [&*ENV_DOT, &*ENV_BRACKET, &*ENV_META] {
            if let Some(cap) = re.captures(raw_line) {
                emit_env_use(graph, &file_id, relpath, &cap[1], line_no);
            }
        }
    }
}

fn emit_import(graph: &mut Graph, file_id: &str, relpath: &str, raw: &str, line: u32) {
    let resolved = resolve_js_import(relpath, raw);
    let target = format!("file:{resolved}");
    let edge = Edge::new(file_id, target, EdgeType::Imports)
        .with_file(relpath)
        .with_line(line)
        .with_metadata(metadata_of([("raw", Value::String(raw.to_string()))]));
    graph.add_edge(edge);
}

fn emit_export(graph: &mut Graph, file_id: &str, relpath: &str, name: &str, line: u32) {
    let node_id = format!("export:{relpath}:{name}");
    graph.add_node(
        Node::new(&node_id, name, NodeType::Function, Language::Js)
            .with_file(relpath)
            .with_line(line),
    );
    graph.add_edge(Edge::new(file_id, node_id, EdgeType::Exports).with_file(relpath).with_line(line));
}

fn emit_route(graph: &mut Graph, file_id: &str, relpath: &str, method: &str, path: &str, language: Language, line: u32) {
    let node_id = format!("http:{method}:{path}");
    graph.add_node(
        Node::new(&node_id, path, NodeType::Endpoint, language)
            .with_file(relpath)
            .with_line(line)
            .with_metadata(metadata_of([
                ("method", Value::String(method.to_string())),
                ("path", Value::String(path.to_string())),
            ])),
    );
    graph.add_edge(Edge::new(file_id, node_id, EdgeType::Defines).with_file(relpath).with_line(line));
}

fn emit_fetch(graph: &mut Graph, file_id: &str, relpath: &str, method: &str, url: &str, line: u32) {
    let target = format!("http:{method}:{url}");
    graph.add_edge(Edge::new(file_id, target, EdgeType::Fetches).with_file(relpath).with_line(line));
}

fn emit_ws_emit(graph: &mut Graph, file_id: &str, relpath: &str, event: &str, line: u32) {
    let node_id = format!("ws:{event}");
    graph.add_node(Node::new(&node_id, event, NodeType::Event, Language::Js));
    graph.add_edge(Edge::new(file_id, node_id, EdgeType::Emits).with_file(relpath).with_line(line));
}

fn emit_ws_listen(graph: &mut Graph, file_id: &str, relpath: &str, event: &str, line: u32) {
    let node_id = format!("ws:{event}");
    graph.add_node(Node::new(&node_id, event, NodeType::Event, Language::Js));
    graph.add_edge(
        Edge::new(node_id, file_id, EdgeType::Subscribes)
            .with_file(relpath)
            .with_line(line),
    );
}

fn emit_mqtt_publish(graph: &mut Graph, file_id: &str, relpath: &str, topic: &str, line: u32) {
    let node_id = format!("mqtt:{topic}");
    graph.add_node(Node::new(&node_id, topic, NodeType::Topic, Language::Js));
    graph.add_edge(Edge::new(file_id, node_id, EdgeType::Publishes).with_file(relpath).with_line(line));
}

fn emit_mqtt_subscribe(graph: &mut Graph, file_id: &str, relpath: &str, topic: &str, line: u32) {
    let node_id = format!("mqtt:{topic}");
    graph.add_node(Node::new(&node_id, topic, NodeType::Topic, Language::Js));
    graph.add_edge(
        Edge::new(node_id, file_id, EdgeType::Subscribes)
            .with_file(relpath)
            .with_line(line),
    );
}

fn emit_env_use(graph: &mut Graph, file_id: &str, relpath: &str, name: &str, line: u32) {
    let node_id = format!("env:{name}");
    graph.add_node(Node::new(&node_id, name, NodeType::Variable, Language::Config));
    graph.add_edge(Edge::new(file_id, node_id, EdgeType::EnvUses).with_file(relpath).with_line(line));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_relative_import_and_route_and_env() {
        let mut g = Graph::new();
        let src = "import x from './util';\napp.get('/users/:id', handler);\nconsole.log(process.env.API_KEY);\n";
        extract("src/app.js", src, Language::Js, &mut g);

        assert!(g.get_node("file:src/app.js").is_some());
        assert!(g.edges().iter().any(|e| e.edge_type == EdgeType::Imports && e.target == "file:src/util"));
        assert!(g.get_node("http:GET:/users/:id").is_some());
        assert!(g.get_node("env:API_KEY").is_some());
    }

    #[test]
    fn websocket_listen_edge_points_from_event_to_file() {
        let mut g = Graph::new();
        extract("src/app.js", "socket.on('chat message', cb);\n", Language::Js, &mut g);
        let e = g
            .edges()
            .iter()
            .find(|e| e.edge_type == EdgeType::Subscribes)
            .expect("subscribes edge");
        assert_eq!(e.source, "ws:chat message");
        assert_eq!(e.target, "file:src/app.js");
    }
}
