//! Cross-language bridge detection (§4.E). Runs once, after every file has
//! been extracted, and only reads already-recorded edges — it never fails
//! and never touches the filesystem.

use crate::model::{Actor, Bridge, BridgeType, EdgeType, Graph, Language};
use std::collections::{BTreeSet, HashMap};

/// Populate `graph.bridges` from its current node/edge set. Idempotent only
/// in the sense that calling it twice doubles the bridge list — callers run
/// it exactly once per pipeline invocation, after extraction completes.
pub fn detect(graph: &mut Graph) {
    let mqtt = mqtt_bridges(graph);
    let http = http_bridges(graph);
    let websocket = websocket_bridges(graph);
    let serial = serial_bridge(graph);
    let env = env_bridges(graph);

    for b in mqtt.into_iter().chain(http).chain(websocket).chain(serial).chain(env) {
        graph.add_bridge(b);
    }
}

fn file_language(graph: &Graph, file: &str) -> Language {
    graph
        .get_node(&format!("file:{file}"))
        .map(|n| n.language)
        .unwrap_or(Language::Config)
}

fn distinct_files(producers: &[Actor], consumers: &[Actor]) -> BTreeSet<String> {
    producers
        .iter()
        .chain(consumers.iter())
        .map(|a| a.file.clone())
        .filter(|f| !f.is_empty())
        .collect()
}

fn distinct_languages(producers: &[Actor], consumers: &[Actor]) -> BTreeSet<Language> {
    producers.iter().chain(consumers.iter()).map(|a| a.language).collect()
}

// --- MQTT -------------------------------------------------------------

fn mqtt_matches(pattern: &str, topic: &str) -> bool {
    let pat: Vec<&str> = pattern.split('/').collect();
    let top: Vec<&str> = topic.split('/').collect();
    let mut pi = 0;
    let mut ti = 0;
    while pi < pat.len() {
        match pat[pi] {
            "#" => return true,
            "+" => {
                if ti >= top.len() {
                    return false;
                }
                pi += 1;
                ti += 1;
            }
            seg => {
                if ti >= top.len() || top[ti] != seg {
                    return false;
                }
                pi += 1;
                ti += 1;
            }
        }
    }
    ti == top.len()
}

fn mqtt_bridges(graph: &Graph) -> Vec<Bridge> {
    let mut producers: HashMap<String, Vec<Actor>> = HashMap::new();
    let mut consumers: HashMap<String, Vec<Actor>> = HashMap::new();

    for e in graph.edges() {
        if e.edge_type == EdgeType::Publishes {
            if let Some(topic) = e.target.strip_prefix("mqtt:") {
                let lang = file_language(graph, &e.file);
                producers
                    .entry(topic.to_string())
                    .or_default()
                    .push(Actor::new(&e.file, e.line, lang, "publish"));
            }
        }
        if e.edge_type == EdgeType::Subscribes {
            if let Some(topic) = e.source.strip_prefix("mqtt:") {
                let lang = file_language(graph, &e.file);
                consumers
                    .entry(topic.to_string())
                    .or_default()
                    .push(Actor::new(&e.file, e.line, lang, "subscribe"));
            }
        }
    }

    let mut topics: BTreeSet<String> = producers.keys().cloned().collect();
    topics.extend(consumers.keys().cloned());

    let mut sorted_wildcards: Vec<&String> = consumers.keys().filter(|k| k.contains('#') || k.contains('+')).collect();
    sorted_wildcards.sort();

    let mut out = Vec::new();
    for topic in topics {
        let bridge_producers = producers.get(&topic).cloned().unwrap_or_default();
        let mut bridge_consumers = consumers.get(&topic).cloned().unwrap_or_default();

        for pattern in &sorted_wildcards {
            if pattern.as_str() != topic && mqtt_matches(pattern.as_str(), &topic) {
                bridge_consumers.extend(consumers[pattern.as_str()].iter().cloned());
            }
        }

        let files = distinct_files(&bridge_producers, &bridge_consumers);
        let langs = distinct_languages(&bridge_producers, &bridge_consumers);
        if files.len() >= 2 || langs.len() >= 2 {
            out.push(Bridge::new(BridgeType::Mqtt, topic, bridge_producers, bridge_consumers));
        }
    }
    out
}

// --- HTTP ---------------------------------------------------------------

fn normalize_http_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let chars: Vec<char> = path.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == ':' && chars.get(i + 1).is_some_and(|c| c.is_ascii_alphabetic() || *c == '_') {
            out.push_str("{param}");
            i += 1;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
        } else if chars[i] == '$' && chars.get(i + 1) == Some(&'{') {
            out.push_str("{param}");
            i += 2;
            while i < chars.len() && chars[i] != '}' {
                i += 1;
            }
            i += 1;
        } else if chars[i] == '{' {
            out.push_str("{param}");
            i += 1;
            while i < chars.len() && chars[i] != '}' {
                i += 1;
            }
            i += 1;
        } else if chars[i] == '<' {
            // Flask-style `<id>` / `<int:id>` route parameters (§8 scenario 4
            // normalizes `/users/<id>` against `/users/42`; the marker list in
            // §4.E's prose omits this form even though its own worked example
            // requires it).
            out.push_str("{param}");
            i += 1;
            while i < chars.len() && chars[i] != '>' {
                i += 1;
            }
            i += 1;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    let out = out.trim_end_matches('/');
    out.to_ascii_lowercase()
}

fn endpoint_path(target: &str) -> Option<&str> {
    target.strip_prefix("http:").and_then(|rest| rest.split_once(':')).map(|(_, path)| path)
}

fn http_bridges(graph: &Graph) -> Vec<Bridge> {
    let mut producers: HashMap<String, Vec<Actor>> = HashMap::new();
    let mut consumers: HashMap<String, Vec<Actor>> = HashMap::new();

    for e in graph.edges() {
        if e.edge_type == EdgeType::Defines {
            if let Some(raw) = endpoint_path(&e.target) {
                let key = normalize_http_path(raw);
                let lang = file_language(graph, &e.file);
                producers
                    .entry(key)
                    .or_default()
                    .push(Actor::new(&e.file, e.line, lang, format!("defines {raw}")));
            }
        }
        if e.edge_type == EdgeType::Fetches {
            if let Some(raw) = endpoint_path(&e.target) {
                let key = normalize_http_path(raw);
                let lang = file_language(graph, &e.file);
                consumers
                    .entry(key)
                    .or_default()
                    .push(Actor::new(&e.file, e.line, lang, format!("calls {raw}")));
            }
        }
    }

    let mut keys: BTreeSet<String> = producers.keys().cloned().collect();
    keys.extend(consumers.keys().cloned());

    let mut out = Vec::new();
    for key in keys {
        let prod = producers.get(&key).cloned().unwrap_or_default();
        let cons = consumers.get(&key).cloned().unwrap_or_default();
        if cons.is_empty() {
            continue;
        }
        let bridge_key = if prod.is_empty() { format!("UNMATCHED:{key}") } else { key };
        out.push(Bridge::new(BridgeType::Http, bridge_key, prod, cons));
    }
    out
}

// --- WebSocket ------------------------------------------------------------

fn websocket_bridges(graph: &Graph) -> Vec<Bridge> {
    let mut producers: HashMap<String, Vec<Actor>> = HashMap::new();
    let mut consumers: HashMap<String, Vec<Actor>> = HashMap::new();

    for e in graph.edges() {
        if e.edge_type == EdgeType::Emits {
            if let Some(event) = e.target.strip_prefix("ws:") {
                let lang = file_language(graph, &e.file);
                producers
                    .entry(event.to_string())
                    .or_default()
                    .push(Actor::new(&e.file, e.line, lang, "emit"));
            }
        }
        if e.edge_type == EdgeType::Subscribes {
            if let Some(event) = e.source.strip_prefix("ws:") {
                let lang = file_language(graph, &e.file);
                consumers
                    .entry(event.to_string())
                    .or_default()
                    .push(Actor::new(&e.file, e.line, lang, "listen"));
            }
        }
    }

    let mut events: BTreeSet<String> = producers.keys().cloned().collect();
    events.extend(consumers.keys().cloned());

    let mut out = Vec::new();
    for event in events {
        let prod = producers.get(&event).cloned().unwrap_or_default();
        let cons = consumers.get(&event).cloned().unwrap_or_default();
        if distinct_files(&prod, &cons).len() >= 2 {
            out.push(Bridge::new(BridgeType::Websocket, event, prod, cons));
        }
    }
    out
}

// --- Serial ---------------------------------------------------------------

fn serial_bridge(graph: &Graph) -> Vec<Bridge> {
    let mut producers = Vec::new();
    let mut consumers = Vec::new();
    for e in graph.edges() {
        let lang = file_language(graph, &e.file);
        if e.edge_type == EdgeType::SerialWrite {
            producers.push(Actor::new(&e.file, e.line, lang, "write"));
        }
        if e.edge_type == EdgeType::SerialRead {
            consumers.push(Actor::new(&e.file, e.line, lang, "read"));
        }
    }
    if producers.is_empty() || consumers.is_empty() {
        return Vec::new();
    }
    vec![Bridge::new(BridgeType::Serial, "serial", producers, consumers)]
}

// --- Env --------------------------------------------------------------

fn env_bridges(graph: &Graph) -> Vec<Bridge> {
    let mut definers: HashMap<String, Vec<Actor>> = HashMap::new();
    let mut users: HashMap<String, Vec<Actor>> = HashMap::new();

    for e in graph.edges() {
        if e.edge_type == EdgeType::EnvDefines {
            if let Some(name) = e.target.strip_prefix("env:") {
                let lang = file_language(graph, &e.file);
                definers.entry(name.to_string()).or_default().push(Actor::new(&e.file, e.line, lang, "defines"));
            }
        }
        if e.edge_type == EdgeType::EnvUses {
            if let Some(name) = e.target.strip_prefix("env:") {
                let lang = file_language(graph, &e.file);
                users.entry(name.to_string()).or_default().push(Actor::new(&e.file, e.line, lang, "uses"));
            }
        }
    }

    let mut names: BTreeSet<String> = definers.keys().cloned().collect();
    names.extend(users.keys().cloned());

    let mut out = Vec::new();
    for name in names {
        let defs = definers.get(&name).cloned().unwrap_or_default();
        let use_list = users.get(&name).cloned().unwrap_or_default();
        if defs.is_empty() {
            if !use_list.is_empty() {
                out.push(Bridge::new(BridgeType::Env, format!("UNDEFINED:{name}"), Vec::new(), use_list));
            }
            continue;
        }
        if distinct_files(&defs, &use_list).len() >= 2 {
            out.push(Bridge::new(BridgeType::Env, name, defs, use_list));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::languages;

    #[test]
    fn mqtt_wildcard_bridge_spans_languages() {
        let mut g = Graph::new();
        languages::extract("a.py", "client.publish(\"sensors/temperature\", 22)\n", Some(Language::Python), &mut g);
        languages::extract("b.ino", "mqtt.subscribe(\"sensors/+\");\n", Some(Language::Arduino), &mut g);
        detect(&mut g);

        let bridge = g.bridges().iter().find(|b| b.key == "sensors/temperature").expect("bridge");
        assert_eq!(bridge.producers.len(), 1);
        assert_eq!(bridge.producers[0].file, "a.py");
        assert_eq!(bridge.consumers.len(), 1);
        assert_eq!(bridge.consumers[0].file, "b.ino");
    }

    #[test]
    fn unmatched_http_call_has_no_producer() {
        let mut g = Graph::new();
        languages::extract("web.ts", "axios.get('/api/missing');\n", Some(Language::Ts), &mut g);
        detect(&mut g);

        let bridge = g.bridges().iter().find(|b| b.key == "UNMATCHED:/api/missing").expect("bridge");
        assert!(bridge.producers.is_empty());
        assert_eq!(bridge.consumers.len(), 1);
        assert_eq!(bridge.consumers[0].action, "calls /api/missing");
    }

    #[test]
    fn undefined_env_var_bridge() {
        let mut g = Graph::new();
        languages::extract("srv.js", "const x = process.env.DATABASE_URL;\n", Some(Language::Js), &mut g);
        detect(&mut g);

        let bridge = g.bridges().iter().find(|b| b.key == "UNDEFINED:DATABASE_URL").expect("bridge");
        assert!(bridge.producers.is_empty());
        assert_eq!(bridge.consumers.len(), 1);
    }

    #[test]
    fn http_path_normalization_matches_param_styles() {
        let mut g = Graph::new();
        languages::extract("srv.py", "@app.route('/users/<id>')\ndef users():\n    pass\n", Some(Language::Python), &mut g);
        languages::extract("app.js", "fetch('/users/42');\n", Some(Language::Js), &mut g);
        detect(&mut g);

        assert_eq!(normalize_http_path("/users/<id>"), "/users/{param}");
        assert_eq!(normalize_http_path("/users/42"), "/users/42");
    }

    #[test]
    fn serial_bridge_requires_both_write_and_read() {
        let mut g = Graph::new();
        languages::extract("dev.py", "ser.write(b'x')\n", Some(Language::Python), &mut g);
        detect(&mut g);
        assert!(g.bridges().is_empty());
    }

    #[test]
    fn defined_but_never_called_endpoint_emits_no_bridge() {
        let mut g = Graph::new();
        languages::extract("srv.py", "@app.route('/health')\ndef health():\n    pass\n", Some(Language::Python), &mut g);
        detect(&mut g);
        assert!(!g.bridges().iter().any(|b| b.bridge_type == BridgeType::Http));
    }
}
