//! Thin CLI driver (§1/§6, AS.5): argument parsing, the filesystem walk,
//! and file writing live here — deliberately outside `codegraph-core`,
//! which only ever sees `(relpath, bytes)` pairs. Everything that actually
//! builds the graph is one call to [`codegraph_core::build_graph`].

use anyhow::{Context, Result, bail};
use codegraph_core::{GraphConfig, discovery, render, review_cluster, serialize};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

struct Args {
    root: PathBuf,
    trace: Option<String>,
    depth: usize,
    bridges_only: bool,
    clusters: bool,
    output: Option<PathBuf>,
    quiet: bool,
}

fn parse_args(cfg: &GraphConfig) -> Result<Args> {
    let mut root: Option<PathBuf> = None;
    let mut trace: Option<String> = None;
    let mut depth = cfg.limits.subgraph_max_depth;
    let mut bridges_only = false;
    let mut clusters = false;
    let mut output: Option<PathBuf> = None;
    let mut quiet = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--depth" => {
                let v = args.next().context("--depth requires a value")?;
                depth = v.parse().context("--depth must be a non-negative integer")?;
            }
            "--bridges-only" => bridges_only = true,
            "--clusters" => clusters = true,
            "--quiet" => quiet = true,
            "--output" => {
                let v = args.next().context("--output requires a path")?;
                output = Some(PathBuf::from(v));
            }
            other if root.is_none() => root = Some(PathBuf::from(other)),
            other if trace.is_none() => trace = Some(other.to_string()),
            other => bail!("unexpected argument: {other}"),
        }
    }

    let root = root.context("usage: codegraph <root> [trace-id] [--depth N] [--bridges-only] [--clusters] [--output FILE] [--quiet]")?;
    Ok(Args { root, trace, depth, bridges_only, clusters, output, quiet })
}

fn init_tracing(quiet: bool) {
    use tracing_subscriber::EnvFilter;
    let default_level = if quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn read_discovered_pairs(root: &Path, cfg: &GraphConfig) -> Result<Vec<(String, Vec<u8>)>> {
    let discovered = discovery::discover_files(root, cfg)?;
    let mut pairs = Vec::with_capacity(discovered.len());
    for file in discovered {
        let abs = root.join(&file.relpath);
        match fs::read(&abs) {
            Ok(bytes) => pairs.push((file.relpath, bytes)),
            Err(err) => warn!(path = %file.relpath, error = %err, "driver: read failed, skipping"),
        }
    }
    Ok(pairs)
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cfg = GraphConfig::load_from_env_or_default()?;
    let args = parse_args(&cfg)?;
    init_tracing(args.quiet);

    if !args.quiet {
        eprintln!("{} {}", "codegraph:".bold(), format!("scanning {}", args.root.display()).dimmed());
    }

    let pairs = read_discovered_pairs(&args.root, &cfg)?;
    info!(files = pairs.len(), "driver: discovery complete");

    let graph = codegraph_core::build_graph(&pairs, &cfg);

    let document = if let Some(trace_id) = &args.trace {
        let sub = graph.subgraph(trace_id, args.depth);
        if sub.node_count() == 0 {
            eprintln!("{} no node matched {:?}", "warning:".yellow().bold(), trace_id);
        }
        serialize::to_json(&sub)
    } else if args.bridges_only {
        serialize::bridges_only_json(&graph)
    } else if args.clusters || cfg.features.enable_review_clusters {
        let review = review_cluster::build(&graph, cfg.limits.cluster_min_size);
        if cfg.features.enable_markdown_report {
            eprintln!("{}", render::render_markdown(&review));
        }
        serde_json::to_value(&review)?
    } else {
        serialize::to_json(&graph)
    };

    let rendered = serde_json::to_string_pretty(&document)?;
    match &args.output {
        Some(path) => {
            fs::write(path, rendered).with_context(|| format!("writing output to {}", path.display()))?;
            if !args.quiet {
                eprintln!("{} {}", "codegraph:".bold(), format!("wrote {}", path.display()).green());
            }
        }
        None => println!("{rendered}"),
    }

    Ok(())
}
