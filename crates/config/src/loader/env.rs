//! Environment variable parsing for configuration.
//!
//! Responsibilities:
//! - Read and parse `POPUP_*` environment variables.
//! - Apply parsed values to a `ConfigLoader` instance.
//!
//! Invariants:
//! - Empty or whitespace-only environment variables are treated as unset.
//! - Returned values are trimmed.
//! - Invalid values return `ConfigError::InvalidValue`.

use super::builder::ConfigLoader;
use super::error::ConfigError;
use crate::types::{EmptyResultPolicy, QuotePolicy};

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn invalid(var: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        var: var.to_string(),
        message: message.into(),
    }
}

/// Apply environment variable configuration to the loader.
///
/// Values already set through builder methods are left untouched.
pub fn apply_env(loader: &mut ConfigLoader) -> Result<(), ConfigError> {
    if let Some(rows) = env_var_or_none("POPUP_MAX_ROWS") {
        let value: usize = rows
            .parse()
            .map_err(|_| invalid("POPUP_MAX_ROWS", "must be a positive integer"))?;
        loader.set_max_rows_if_unset(value);
    }
    if let Some(marker) = env_var_or_none("POPUP_ELIGIBILITY_MARKER") {
        loader.set_eligibility_marker_if_unset(marker);
    }
    if let Some(key) = env_var_or_none("POPUP_SETTINGS_KEY") {
        loader.set_settings_key_if_unset(key);
    }
    if let Some(ext) = env_var_or_none("POPUP_EXPORT_EXTENSION") {
        loader.set_export_extension_if_unset(ext.trim_start_matches('.').to_string());
    }
    if let Some(policy) = env_var_or_none("POPUP_QUOTE_POLICY") {
        let value: QuotePolicy = policy
            .parse()
            .map_err(|e: String| invalid("POPUP_QUOTE_POLICY", e))?;
        loader.set_quote_policy_if_unset(value);
    }
    if let Some(policy) = env_var_or_none("POPUP_EMPTY_RESULT") {
        let value: EmptyResultPolicy = policy
            .parse()
            .map_err(|e: String| invalid("POPUP_EMPTY_RESULT", e))?;
        loader.set_empty_result_policy_if_unset(value);
    }
    if let Some(strip) = env_var_or_none("POPUP_STRIP_THOUSANDS") {
        let value: bool = strip
            .parse()
            .map_err(|_| invalid("POPUP_STRIP_THOUSANDS", "must be true or false"))?;
        loader.set_strip_thousands_separator_if_unset(value);
    }
    Ok(())
}
