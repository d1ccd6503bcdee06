//! Per-language extractors (§4.C): line-oriented regex passes over file
//! text. [`extract`] is the single dispatch point the pipeline calls once
//! per discovered file; basename-based formats (`.env*`, `package.json`)
//! take priority over the extension-derived [`Language`] tag.

mod cpp;
mod env_file;
mod javascript;
mod package_json;
mod python;

use crate::model::node::file_node;
use crate::model::{Graph, Language};

pub fn extract(relpath: &str, content: &str, language: Option<Language>, graph: &mut Graph) {
    let basename = relpath.rsplit('/').next().unwrap_or(relpath);

    if basename.starts_with(".env") {
        env_file::extract(relpath, content, graph);
        return;
    }
    if basename == "package.json" {
        package_json::extract(relpath, content, graph);
        return;
    }

    match language {
        Some(lang @ (Language::Js | Language::Ts)) => javascript::extract(relpath, content, lang, graph),
        Some(Language::Python) => python::extract(relpath, content, graph),
        Some(lang @ (Language::Cpp | Language::Arduino)) => cpp::extract(relpath, content, lang, graph),
        Some(Language::Config) => {
            graph.add_node(file_node(relpath, Language::Config));
        }
        None => {
            graph.add_node(file_node(relpath, Language::Config));
        }
    }
}
