//! Architecture tests for module layering in the popup crate.
//!
//! Invariants:
//! - `selection`, `export`, `session`, and `action` stay synchronous state logic:
//!   no tokio imports and no dependency on `runtime`.
//! - The host crate defines collaborator contracts only: no popup imports.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Core popup modules that must not reach into the async runtime.
const CORE_MODULES: &[&str] = &["selection.rs", "export.rs", "session.rs", "action.rs"];

const FORBIDDEN_IN_CORE: &[&str] = &["tokio::", "crate::runtime", "super::runtime"];

fn crates_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .expect("architecture-tests lives under crates/")
}

/// Source with `#[cfg(test)]` modules cut off; tests may use anything.
fn production_source(path: &Path) -> String {
    let content = fs::read_to_string(path).unwrap_or_default();
    match content.find("#[cfg(test)]") {
        Some(idx) => content[..idx].to_string(),
        None => content,
    }
}

fn find_violations(source: &str, forbidden: &[&str]) -> Vec<String> {
    source
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim_start().starts_with("//"))
        .filter_map(|(i, line)| {
            forbidden
                .iter()
                .find(|needle| line.contains(*needle))
                .map(|needle| format!("line {}: uses `{needle}`", i + 1))
        })
        .collect()
}

#[test]
fn core_modules_do_not_depend_on_runtime() {
    let src = crates_dir().join("popup/src");
    let mut violations = Vec::new();

    for module in CORE_MODULES {
        let path = src.join(module);
        assert!(path.exists(), "expected core module at {path:?}");
        for v in find_violations(&production_source(&path), FORBIDDEN_IN_CORE) {
            violations.push(format!("{module}: {v}"));
        }
    }

    assert!(
        violations.is_empty(),
        "Core modules must stay runtime-free:\n{}",
        violations.join("\n")
    );
}

#[test]
fn host_crate_does_not_depend_on_popup() {
    let host_src = crates_dir().join("host/src");
    let violations: Vec<String> = WalkDir::new(&host_src)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "rs"))
        .flat_map(|e| {
            let display = e.path().display().to_string();
            find_violations(&production_source(e.path()), &["datasource_popup"])
                .into_iter()
                .map(move |v| format!("{display}: {v}"))
        })
        .collect();

    assert!(violations.is_empty(), "{}", violations.join("\n"));
}

#[test]
fn test_find_violations_ignores_comments() {
    let source = "// tokio::spawn is not used here\nuse tokio::sync::mpsc;\n";
    let found = find_violations(source, FORBIDDEN_IN_CORE);
    assert_eq!(found, vec!["line 2: uses `tokio::`".to_string()]);
}

#[test]
fn test_production_source_drops_test_module() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("m.rs");
    fs::write(&path, "fn a() {}\n#[cfg(test)]\nmod tests { use tokio::test; }\n").unwrap();

    assert_eq!(production_source(&path), "fn a() {}\n");
}
