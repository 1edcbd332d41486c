//! Shared test utilities for datasource-popup integration tests.
//!
//! Responsibilities:
//! - Provide a hermetic CLI command factory that prevents dotenv loading.
//! - Write host fixture files into a temporary directory.
//!
//! Invariants / Assumptions:
//! - `POPUP_*` variables from the host environment never leak into a test run.

use std::path::{Path, PathBuf};

use assert_cmd::Command;

/// Returns a hermetic `datasource-popup` command for integration testing.
///
/// The config path points at a file that does not exist, so built-in
/// defaults apply regardless of the user's config directory.
pub fn popup_cmd(dir: &Path) -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("datasource-popup");

    // Hermeticity: prevent loading local .env
    cmd.env("DOTENV_DISABLED", "1");
    cmd.env("POPUP_CONFIG_PATH", dir.join("missing-config.json"));

    for var in [
        "POPUP_FIXTURE",
        "POPUP_SETTINGS_FILE",
        "POPUP_OUT_DIR",
        "POPUP_MAX_ROWS",
        "POPUP_ELIGIBILITY_MARKER",
        "POPUP_SETTINGS_KEY",
        "POPUP_EXPORT_EXTENSION",
        "POPUP_QUOTE_POLICY",
        "POPUP_EMPTY_RESULT",
        "POPUP_STRIP_THOUSANDS",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }

    cmd
}

/// Write the sales fixture used across CLI tests and return its path.
pub fn write_sales_fixture(dir: &Path) -> PathBuf {
    let fixture = serde_json::json!({
        "openPayload": "15",
        "worksheets": [{"name": "Sales*"}, {"name": "Costs"}, {"name": "Notes/2024*"}],
        "summaries": {
            "Sales*": {
                "columns": [{"fieldName": "Region"}, {"fieldName": "Amount"}],
                "data": [
                    [{"value": "East", "formattedValue": "East"},
                     {"value": 1200, "formattedValue": "1,200"}],
                    [{"value": "West", "formattedValue": "West"},
                     {"value": 300, "formattedValue": "300"}]
                ]
            },
            "Notes/2024*": {
                "columns": [{"fieldName": "Note"}],
                "data": [[{"formattedValue": "a, b"}]]
            }
        }
    });
    let path = dir.join("host.json");
    std::fs::write(&path, fixture.to_string()).unwrap();
    path
}
