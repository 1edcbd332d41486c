//! Architecture tests for file size limits.
//!
//! - Files >600 LOC produce a warning.
//! - Files >900 LOC are presumed mis-scoped and fail the test.
//!
//! LOC excludes blank lines and comment-only lines.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

const WARNING_THRESHOLD: usize = 600;
const FAILURE_THRESHOLD: usize = 900;

/// (path suffix, justification) pairs exempt from the failure threshold.
const EXCLUDED_FILES: &[(&str, &str)] = &[];

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .map(Path::to_path_buf)
        .expect("architecture-tests lives at <root>/crates/architecture-tests")
}

fn rust_sources(crates_dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(crates_dir)
        .into_iter()
        .filter_entry(|e| {
            let name = e.file_name().to_string_lossy();
            name != "target" && name != "architecture-tests"
        })
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "rs"))
        .collect()
}

fn count_loc(content: &str) -> usize {
    let mut in_block_comment = false;
    content
        .lines()
        .map(str::trim)
        .filter(|line| {
            if line.is_empty() {
                return false;
            }
            if line.starts_with("/*") {
                in_block_comment = true;
            }
            if in_block_comment {
                if line.ends_with("*/") {
                    in_block_comment = false;
                }
                return false;
            }
            !line.starts_with("//")
        })
        .count()
}

#[test]
fn file_size_limits() {
    let root = workspace_root();
    let crates_dir = root.join("crates");
    assert!(crates_dir.exists(), "crates/ not found at {crates_dir:?}");

    let files = rust_sources(&crates_dir);
    let mut failures = Vec::new();

    for path in &files {
        let content = fs::read_to_string(path).unwrap_or_default();
        let loc = count_loc(&content);
        let relative = path.strip_prefix(&root).unwrap_or(path).to_string_lossy();

        if loc > FAILURE_THRESHOLD {
            if EXCLUDED_FILES.iter().any(|(suffix, _)| relative.ends_with(suffix)) {
                eprintln!("[EXCLUDED] {relative}: {loc} LOC");
            } else {
                failures.push(format!("  - {relative}: {loc} lines"));
            }
        } else if loc > WARNING_THRESHOLD {
            eprintln!("[WARN] {relative}: {loc} LOC exceeds {WARNING_THRESHOLD}");
        }
    }

    assert!(
        failures.is_empty(),
        "Files exceeding {FAILURE_THRESHOLD} LOC (split them or add to EXCLUDED_FILES):\n{}",
        failures.join("\n")
    );
    eprintln!("[architecture] Checked {} Rust files for size limits.", files.len());
}

#[test]
fn test_count_loc_skips_comments_and_blanks() {
    let source = r#"//! Module docs

/// Function docs
fn main() {
    let x = 5; // trailing comment counts

    /* block
       comment */
    println!("{x}");
}
"#;
    assert_eq!(count_loc(source), 4);
}

#[test]
fn test_rust_sources_skips_target_dirs() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("a/src")).unwrap();
    fs::create_dir_all(dir.path().join("a/target/debug")).unwrap();
    fs::write(dir.path().join("a/src/lib.rs"), "fn a() {}").unwrap();
    fs::write(dir.path().join("a/target/debug/gen.rs"), "fn b() {}").unwrap();
    fs::write(dir.path().join("a/README.md"), "docs").unwrap();

    let files = rust_sources(dir.path());
    assert_eq!(files, vec![dir.path().join("a/src/lib.rs")]);
}

#[test]
fn test_excluded_files_are_justified() {
    for (pattern, justification) in EXCLUDED_FILES {
        assert!(!pattern.is_empty());
        assert!(!justification.is_empty(), "'{pattern}' needs a justification");
    }
}
