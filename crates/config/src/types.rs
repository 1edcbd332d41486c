//! Configuration types for the popup.
//!
//! Responsibilities:
//! - Define `PopupConfig` and the CSV policy enums.
//! - Parse policy names from environment/config strings.
//!
//! Does NOT handle:
//! - Loading values from env vars or files (see `loader`).
//!
//! Invariants:
//! - `max_rows` is at least 1 once a config has been validated by the loader.
//! - `eligibility_marker` and `settings_key` are non-empty once validated.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_ELIGIBILITY_MARKER, DEFAULT_EXPORT_EXTENSION, DEFAULT_MAX_ROWS, SELECTION_SETTINGS_KEY,
};

/// How field values are escaped in the exported CSV document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuotePolicy {
    /// Quote fields containing the delimiter, a quote, or a line break (RFC 4180).
    #[default]
    Necessary,
    /// Emit values verbatim. Values are assumed to be delimiter-safe.
    Never,
}

impl FromStr for QuotePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "necessary" | "rfc4180" => Ok(Self::Necessary),
            "never" | "none" => Ok(Self::Never),
            other => Err(format!("unknown quote policy '{other}'")),
        }
    }
}

impl fmt::Display for QuotePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Necessary => write!(f, "necessary"),
            Self::Never => write!(f, "never"),
        }
    }
}

/// What an export does when the host returns zero rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmptyResultPolicy {
    /// Emit a document containing only the header line.
    #[default]
    HeaderOnly,
    /// Fail the export with an empty-result error.
    Reject,
}

impl FromStr for EmptyResultPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "header-only" | "header_only" | "headeronly" => Ok(Self::HeaderOnly),
            "reject" => Ok(Self::Reject),
            other => Err(format!("unknown empty result policy '{other}'")),
        }
    }
}

impl fmt::Display for EmptyResultPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HeaderOnly => write!(f, "header-only"),
            Self::Reject => write!(f, "reject"),
        }
    }
}

/// Popup configuration.
///
/// # Default Values
///
/// - `max_rows`: 50000
/// - `eligibility_marker`: "*"
/// - `settings_key`: "selectedDatasources"
/// - `export_extension`: "csv"
/// - `quote_policy`: necessary
/// - `empty_result_policy`: header-only
/// - `strip_thousands_separator`: true
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopupConfig {
    /// Maximum number of summary rows requested from the host per export.
    pub max_rows: usize,
    /// Substring a worksheet name must contain to be offered for selection.
    pub eligibility_marker: String,
    /// Settings key the selection snapshot is stored under.
    pub settings_key: String,
    /// Extension appended to exported file names (without the dot).
    pub export_extension: String,
    /// CSV quoting policy.
    pub quote_policy: QuotePolicy,
    /// Behaviour for exports that return zero rows.
    pub empty_result_policy: EmptyResultPolicy,
    /// Remove `,` thousands separators from formatted cell values.
    pub strip_thousands_separator: bool,
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            max_rows: DEFAULT_MAX_ROWS,
            eligibility_marker: DEFAULT_ELIGIBILITY_MARKER.to_string(),
            settings_key: SELECTION_SETTINGS_KEY.to_string(),
            export_extension: DEFAULT_EXPORT_EXTENSION.to_string(),
            quote_policy: QuotePolicy::default(),
            empty_result_policy: EmptyResultPolicy::default(),
            strip_thousands_separator: true,
        }
    }
}
