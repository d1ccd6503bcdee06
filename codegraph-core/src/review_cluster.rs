//! Review-cluster export (§4.G): an auxiliary, non-normative JSON object
//! built from the same `file_clusters`/`stats` data as the main pipeline —
//! it adds no new extraction logic, only a different view for human
//! review (which files cluster together, which bridges cross which
//! clusters, which files are orphaned).

use crate::model::{BridgeType, Graph, Language};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Debug, Clone, Serialize)]
pub struct ClusterSummary {
    pub id: usize,
    pub files: Vec<String>,
    pub dominant_language: String,
    pub bridges: Vec<String>,
    pub size: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewClusters {
    pub clusters: Vec<ClusterSummary>,
    pub bridge_groups: BTreeMap<String, Vec<String>>,
    pub orphans: Vec<String>,
}

/// Build the review-cluster export for `graph`, using `min_size` as the
/// same minimum-files-per-cluster threshold as [`Graph::file_clusters`].
pub fn build(graph: &Graph, min_size: usize) -> ReviewClusters {
    let cluster_files = graph.file_clusters(min_size);

    let mut lang_counts_by_file: HashMap<&str, HashMap<Language, usize>> = HashMap::new();
    for n in graph.nodes() {
        if n.file.is_empty() {
            continue;
        }
        *lang_counts_by_file.entry(n.file.as_str()).or_default().entry(n.language).or_insert(0) += 1;
    }

    let bridge_groups = bridge_groups(graph);

    let clusters: Vec<ClusterSummary> = cluster_files
        .iter()
        .enumerate()
        .map(|(idx, files)| {
            let dominant_language = dominant_language(files, &lang_counts_by_file);
            let touching_bridges: Vec<String> = bridge_groups
                .iter()
                .filter(|(_, bridge_files)| bridge_files.iter().any(|f| files.contains(f)))
                .map(|(kind, _)| kind.clone())
                .collect();
            ClusterSummary {
                id: idx,
                files: files.clone(),
                dominant_language,
                bridges: touching_bridges,
                size: files.len(),
            }
        })
        .collect();

    let orphans = graph.orphan_files(&cluster_files);

    ReviewClusters { clusters, bridge_groups, orphans }
}

fn dominant_language(files: &[String], lang_counts_by_file: &HashMap<&str, HashMap<Language, usize>>) -> String {
    let mut totals: HashMap<Language, usize> = HashMap::new();
    for f in files {
        if let Some(counts) = lang_counts_by_file.get(f.as_str()) {
            for (lang, n) in counts {
                *totals.entry(*lang).or_insert(0) += n;
            }
        }
    }
    totals
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.to_string().cmp(&a.0.to_string())))
        .map(|(lang, _)| lang.to_string())
        .unwrap_or_default()
}

fn bridge_groups(graph: &Graph) -> BTreeMap<String, Vec<String>> {
    let mut by_type: BTreeMap<BridgeType, BTreeSet<String>> = BTreeMap::new();
    for bridge in graph.bridges() {
        by_type.entry(bridge.bridge_type).or_default().extend(bridge.files());
    }
    by_type
        .into_iter()
        .map(|(kind, files)| (kind.to_string(), files.into_iter().collect()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::languages;
    use crate::model::Language;

    #[test]
    fn cluster_picks_up_dominant_language_and_bridge_membership() {
        let mut g = Graph::new();
        languages::extract("a.py", "client.publish(\"sensors/t\", 1)\n", Some(Language::Python), &mut g);
        languages::extract("b.ino", "mqtt.subscribe(\"sensors/t\");\n", Some(Language::Arduino), &mut g);
        languages::extract("a.py", "import b\n", Some(Language::Python), &mut g);
        crate::bridges::detect(&mut g);

        let review = build(&g, 2);
        assert!(!review.clusters.is_empty());
        let mqtt_files = review.bridge_groups.get("mqtt").cloned().unwrap_or_default();
        assert!(mqtt_files.contains(&"a.py".to_string()));
        assert!(mqtt_files.contains(&"b.ino".to_string()));
    }

    #[test]
    fn orphan_files_are_sorted_and_excluded_from_clusters() {
        let mut g = Graph::new();
        languages::extract("solo.py", "x = 1\n", Some(Language::Python), &mut g);
        let review = build(&g, 2);
        assert_eq!(review.orphans, vec!["solo.py".to_string()]);
        assert!(review.clusters.is_empty());
    }
}
