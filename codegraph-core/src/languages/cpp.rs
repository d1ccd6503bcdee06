//! C/C++/Arduino extractor (§4.C). `.ino` sources are tagged `arduino`;
//! everything else handled here (`.c .cpp .h .hpp`) is tagged `cpp`.

use crate::model::{Edge, EdgeType, Graph, Language, Node, NodeType, node::file_node};
use crate::resolve::resolve_cpp_include;
use regex::Regex;
use std::sync::LazyLock;

static LOCAL_INCLUDE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"^\s*#include\s*"([^"]+)""#).unwrap());
static SYSTEM_INCLUDE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*#include\s*<([^>]+)>").unwrap());

static FUNC_DEF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?:static\s+|inline\s+|virtual\s+)*(?:void|int|float|double|bool|String|char\s*\*?|unsigned(?:\s+\w+)?|long(?:\s+\w+)?|uint\d+_t|size_t)\s+([A-Za-z_]\w*)\s*\(",
    )
    .unwrap()
});

static MQTT_PUBLISH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"\.publish\(\s*['"]([^'"]+)['"]"#).unwrap());
static MQTT_SUBSCRIBE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"\.subscribe\(\s*['"]([^'"]+)['"]"#).unwrap());

static SERIAL_WRITE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bSerial\d*\.(?:print|println|write|printf)\s*\(").unwrap());
static SERIAL_READ: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bSerial\d*\.(?:read|readString|readLine|parseInt|parseFloat|available)\s*\(").unwrap()
});

static HTTP_BEGIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\.begin\(\s*['"](https?://[^'"]+)['"]"#).unwrap());

pub fn extract(relpath: &str, content: &str, language: Language, graph: &mut Graph) {
    let file_id = format!("file:{relpath}");
    graph.add_node(file_node(relpath, language));

    for (idx, raw_line) in content.lines().enumerate() {
        if raw_line.trim_start().starts_with("//") {
            continue;
        }
        let line_no = (idx + 1) as u32;

        if let Some(cap) = LOCAL_INCLUDE.captures(raw_line) {
            let resolved = resolve_cpp_include(relpath, &cap[1]);
            let target = format!("file:{resolved}");
            graph.add_edge(Edge::new(file_id.clone(), target, EdgeType::Includes).with_file(relpath).with_line(line_no));
        }
        if let Some(cap) = SYSTEM_INCLUDE.captures(raw_line) {
            let node_id = format!("lib:{}", &cap[1]);
            graph.add_node(Node::new(&node_id, &cap[1], NodeType::File, language));
            graph.add_edge(Edge::new(file_id.clone(), node_id, EdgeType::Includes).with_file(relpath).with_line(line_no));
        }

        if let Some(cap) = FUNC_DEF.captures(raw_line) {
            let name = &cap[1];
            let node_id = format!("func:{relpath}:{name}");
            graph.add_node(
                Node::new(&node_id, name, NodeType::Function, language)
                    .with_file(relpath)
                    .with_line(line_no),
            );
            graph.add_edge(Edge::new(file_id.clone(), node_id, EdgeType::Defines).with_file(relpath).with_line(line_no));
        }

        if let Some(cap) = MQTT_PUBLISH.captures(raw_line) {
            let node_id = format!("mqtt:{}", &cap[1]);
            graph.add_node(Node::new(&node_id, &cap[1], NodeType::Topic, language));
            graph.add_edge(Edge::new(file_id.clone(), node_id, EdgeType::Publishes).with_file(relpath).with_line(line_no));
        }
        if let Some(cap) = MQTT_SUBSCRIBE.captures(raw_line) {
            let node_id = format!("mqtt:{}", &cap[1]);
            graph.add_node(Node::new(&node_id, &cap[1], NodeType::Topic, language));
            graph.add_edge(
                Edge::new(node_id, file_id.clone(), EdgeType::Subscribes)
                    .with_file(relpath)
                    .with_line(line_no),
            );
        }

        if SERIAL_WRITE.is_match(raw_line) {
            graph.add_node(Node::new("serial:connection", "serial", NodeType::Event, language));
            graph.add_edge(
                Edge::new(file_id.clone(), "serial:connection", EdgeType::SerialWrite)
                    .with_file(relpath)
                    .with_line(line_no),
            );
        }
        if SERIAL_READ.is_match(raw_line) {
            graph.add_node(Node::new("serial:connection", "serial", NodeType::Event, language));
            graph.add_edge(
                Edge::new("serial:connection", file_id.clone(), EdgeType::SerialRead)
                    .with_file(relpath)
                    .with_line(line_no),
            );
        }

        if let Some(cap) = HTTP_BEGIN.captures(raw_line) {
            let url = &cap[1];
            let target = format!("http:GET:{url}");
            graph.add_edge(Edge::new(file_id.clone(), target, EdgeType::Fetches).with_file(relpath).with_line(line_no));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_includes_and_function_def() {
        let mut g = Graph::new();
        let src = "#include \"util.h\"\n#include <Wire.h>\n\nvoid setup() {\n}\n";
        extract("main.ino", src, Language::Arduino, &mut g);

        assert!(g.edges().iter().any(|e| e.edge_type == EdgeType::Includes && e.target == "file:util.h"));
        assert!(g.get_node("lib:Wire.h").is_some());
        assert!(g.get_node("func:main.ino:setup").is_some());
    }

    #[test]
    fn serial_and_mqtt_and_http_begin() {
        let mut g = Graph::new();
        let src = "mqtt.subscribe(\"sensors/+\");\nSerial.println(\"hi\");\nhttp.begin(\"http://example.com/api\");\n";
        extract("b.ino", src, Language::Arduino, &mut g);

        assert!(g.get_node("mqtt:sensors/+").is_some());
        assert!(g.edges().iter().any(|e| e.edge_type == EdgeType::SerialWrite));
        assert!(g.edges().iter().any(|e| e.edge_type == EdgeType::Fetches && e.target == "http:GET:http://example.com/api"));
    }
}
