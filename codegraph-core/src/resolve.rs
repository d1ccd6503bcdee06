//! Import resolver (§4.D): turns the raw text an extractor found inside an
//! `import`/`require`/`#include` statement into a path token. The token
//! becomes the `file:<token>` edge target; resolvers never touch the
//! filesystem and never require the target to actually exist — an
//! unresolvable reference is not an error, it's the signal used for
//! broken-connection detection later.

use crate::util::normalize_unix_path;

fn dirname(relpath: &str) -> &str {
    match relpath.rfind('/') {
        Some(i) => &relpath[..i],
        None => "",
    }
}

fn join(dir: &str, rest: &str) -> String {
    if dir.is_empty() {
        rest.to_string()
    } else {
        format!("{dir}/{rest}")
    }
}

/// Resolve a JS/TS import specifier relative to the importing file.
/// Relative specifiers (`./x`, `../x`) resolve lexically; `@scope/pkg` and
/// bare package names become `__pkg__/<name>` pseudo paths.
pub fn resolve_js_import(importer_relpath: &str, raw: &str) -> String {
    if raw.starts_with('.') {
        let joined = join(dirname(importer_relpath), raw);
        return normalize_unix_path(&joined);
    }
    let pkg = if let Some(rest) = raw.strip_prefix('@') {
        let mut parts = rest.splitn(2, '/');
        let scope = parts.next().unwrap_or_default();
        let name = parts.next().unwrap_or_default();
        if name.is_empty() {
            format!("@{scope}")
        } else {
            format!("@{scope}/{}", name.split('/').next().unwrap_or_default())
        }
    } else {
        raw.split('/').next().unwrap_or(raw).to_string()
    };
    format!("__pkg__/{pkg}")
}

/// Resolve a Python module reference (`from X import ...` / `import X`)
/// relative to the importing file. Leading dots count as relative levels;
/// no extension is appended to the result.
pub fn resolve_python_import(importer_relpath: &str, module: &str) -> String {
    let leading_dots = module.chars().take_while(|&c| c == '.').count();
    if leading_dots == 0 {
        return module.replace('.', "/");
    }

    let remainder = &module[leading_dots..];
    let mut base = dirname(importer_relpath).to_string();
    for _ in 0..leading_dots.saturating_sub(1) {
        base = dirname(&base).to_string();
    }

    if remainder.is_empty() {
        base
    } else {
        join(&base, &remainder.replace('.', "/"))
    }
}

/// Resolve a quoted (local) C/C++ `#include` path relative to the
/// including file's directory.
pub fn resolve_cpp_include(importer_relpath: &str, header: &str) -> String {
    normalize_unix_path(&join(dirname(importer_relpath), header))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn js_relative_import_resolves_and_normalizes() {
        assert_eq!(resolve_js_import("src/a.js", "./b"), "src/b");
        assert_eq!(resolve_js_import("src/sub/a.js", "../b"), "src/b");
    }

    #[test]
    fn js_external_package_becomes_pseudo_path() {
        assert_eq!(resolve_js_import("src/a.js", "lodash"), "__pkg__/lodash");
        assert_eq!(resolve_js_import("src/a.js", "lodash/fp"), "__pkg__/lodash");
        assert_eq!(resolve_js_import("src/a.js", "@scope/pkg"), "__pkg__/@scope/pkg");
        assert_eq!(resolve_js_import("src/a.js", "@scope/pkg/sub"), "__pkg__/@scope/pkg");
    }

    #[test]
    fn python_relative_import_walks_up_levels() {
        assert_eq!(resolve_python_import("pkg/sub/mod.py", ".sibling"), "pkg/sub/sibling");
        assert_eq!(resolve_python_import("pkg/sub/mod.py", "..other.thing"), "pkg/other/thing");
        assert_eq!(resolve_python_import("pkg/sub/mod.py", ".."), "pkg");
    }

    #[test]
    fn python_absolute_import_joins_dotted_path() {
        assert_eq!(resolve_python_import("pkg/sub/mod.py", "os.path"), "os/path");
    }

    #[test]
    fn cpp_local_include_resolves_relative() {
        assert_eq!(resolve_cpp_include("src/main.cpp", "util.h"), "src/util.h");
        assert_eq!(resolve_cpp_include("src/sub/main.cpp", "../util.h"), "src/util.h");
    }
}
