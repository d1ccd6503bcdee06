//! Optional Markdown rendering (AS.6), supplementing the JSON-only core with
//! a minimal clusters-and-orphans report drawn from the same
//! [`review_cluster`] data — no new extraction logic. Never called by
//! [`crate::build_graph`] itself; the driver only reaches for this when
//! [`crate::config::FeatureFlags::enable_markdown_report`] is set.

use crate::review_cluster::ReviewClusters;
use std::fmt::Write as _;

pub fn render_markdown(review: &ReviewClusters) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Review Clusters\n");

    for cluster in &review.clusters {
        let _ = writeln!(
            out,
            "## Cluster {} ({} files, dominant: {})\n",
            cluster.id, cluster.size, cluster.dominant_language
        );
        for file in &cluster.files {
            let _ = writeln!(out, "- {file}");
        }
        if !cluster.bridges.is_empty() {
            let _ = writeln!(out, "\nBridges: {}", cluster.bridges.join(", "));
        }
        let _ = writeln!(out);
    }

    if !review.bridge_groups.is_empty() {
        let _ = writeln!(out, "## Bridge groups\n");
        for (kind, files) in &review.bridge_groups {
            let _ = writeln!(out, "- **{kind}**: {}", files.join(", "));
        }
        let _ = writeln!(out);
    }

    if !review.orphans.is_empty() {
        let _ = writeln!(out, "## Orphans\n");
        for file in &review.orphans {
            let _ = writeln!(out, "- {file}");
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{bridges, languages, model::Language, model::Graph, review_cluster};

    #[test]
    fn renders_clusters_and_orphans() {
        let mut g = Graph::new();
        languages::extract("a.py", "import b\n", Some(Language::Python), &mut g);
        languages::extract("b.py", "x = 1\n", Some(Language::Python), &mut g);
        languages::extract("solo.py", "y = 2\n", Some(Language::Python), &mut g);
        bridges::detect(&mut g);

        let review = review_cluster::build(&g, 2);
        let md = render_markdown(&review);
        assert!(md.contains("# Review Clusters"));
        assert!(md.contains("## Orphans"));
        assert!(md.contains("solo.py"));
    }
}
