//! CLI argument definitions for the scripted popup driver.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Map config flags onto a `ConfigLoader` as the highest-priority layer.
//!
//! Non-responsibilities:
//! - Does not run the popup (see `main.rs`).
//! - Does not read `POPUP_*` config variables; `ConfigLoader::from_env` does.

use std::path::PathBuf;

use clap::Parser;
use datasource_config::{ConfigLoader, EmptyResultPolicy, QuotePolicy};

#[derive(Debug, Parser)]
#[command(name = "datasource-popup")]
#[command(about = "Drive the datasource selection popup against a host fixture", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  datasource-popup --fixture host.json --settings settings.json --toggle 'Sales*'\n  datasource-popup --fixture host.json --settings settings.json --toggle 'Sales*' --export --out-dir exports\n"
)]
pub struct Cli {
    /// Host fixture JSON (open payload, worksheets, summary data)
    #[arg(long, env = "POPUP_FIXTURE", value_name = "FILE")]
    pub fixture: PathBuf,

    /// Settings file holding the persisted selection (created on first save)
    #[arg(long, env = "POPUP_SETTINGS_FILE", value_name = "FILE")]
    pub settings: PathBuf,

    /// Directory exported files are written to
    #[arg(long, env = "POPUP_OUT_DIR", value_name = "DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// Toggle a worksheet by its full name; repeat to toggle several
    #[arg(long = "toggle", value_name = "NAME")]
    pub toggles: Vec<String>,

    /// Export the first selected worksheet before closing
    #[arg(long)]
    pub export: bool,

    /// Payload handed back to the parent on close (defaults to the open payload)
    #[arg(long, value_name = "PAYLOAD")]
    pub close_payload: Option<String>,

    /// Path to a custom configuration file (overrides default location).
    #[arg(long, env = "POPUP_CONFIG_PATH", value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    /// Maximum number of summary rows requested from the host
    #[arg(long)]
    pub max_rows: Option<usize>,

    /// CSV quoting policy (necessary, never)
    #[arg(long, value_name = "POLICY")]
    pub quote_policy: Option<QuotePolicy>,

    /// Behaviour when a worksheet has no rows (header-only, reject)
    #[arg(long, value_name = "POLICY")]
    pub empty_result: Option<EmptyResultPolicy>,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Apply CLI overrides on top of `loader`.
    ///
    /// Blank config paths are ignored so the default location still applies.
    pub fn apply_overrides(&self, mut loader: ConfigLoader) -> ConfigLoader {
        if let Some(path) = &self.config_path
            && !path.to_string_lossy().trim().is_empty()
        {
            loader = loader.with_config_path(path.clone());
        }
        if let Some(max_rows) = self.max_rows {
            loader = loader.with_max_rows(max_rows);
        }
        if let Some(policy) = self.quote_policy {
            loader = loader.with_quote_policy(policy);
        }
        if let Some(policy) = self.empty_result {
            loader = loader.with_empty_result_policy(policy);
        }
        loader
    }

    /// Whether a usable config path was given on the command line.
    pub fn has_config_path(&self) -> bool {
        self.config_path
            .as_ref()
            .is_some_and(|p| !p.to_string_lossy().trim().is_empty())
    }
}
