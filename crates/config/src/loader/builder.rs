//! Configuration loader builder implementation.
//!
//! Responsibilities:
//! - Provide a builder-pattern `ConfigLoader` for hierarchical configuration merging.
//! - Build and validate the final `PopupConfig`.
//!
//! Invariants / Assumptions:
//! - Builder methods take precedence over environment variables.
//! - Environment variables take precedence over the config file.
//! - Unset values fall back to `PopupConfig::default()`.

use std::path::{Path, PathBuf};

use super::env::apply_env;
use super::error::ConfigError;
use crate::constants::MAX_MAX_ROWS;
use crate::types::{EmptyResultPolicy, PopupConfig, QuotePolicy};

/// Configuration loader that builds a `PopupConfig` from overrides, env vars, and a file.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    max_rows: Option<usize>,
    eligibility_marker: Option<String>,
    settings_key: Option<String>,
    export_extension: Option<String>,
    quote_policy: Option<QuotePolicy>,
    empty_result_policy: Option<EmptyResultPolicy>,
    strip_thousands_separator: Option<bool>,
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if dotenv loading is disabled via environment variable.
    fn dotenv_disabled() -> bool {
        matches!(
            std::env::var("DOTENV_DISABLED").ok().as_deref(),
            Some("true") | Some("1")
        )
    }

    /// Load environment variables from .env file if present.
    ///
    /// If `DOTENV_DISABLED` is set to "true" or "1", the .env file is not loaded.
    /// Missing `.env` files are silently ignored.
    pub fn load_dotenv(self) -> Result<Self, ConfigError> {
        if Self::dotenv_disabled() {
            return Ok(self);
        }

        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if Self::is_not_found(&e) => Ok(self),
            Err(dotenvy::Error::LineParse(_, idx)) => {
                Err(ConfigError::DotenvParse { error_index: idx })
            }
            Err(dotenvy::Error::Io(io_err)) => Err(ConfigError::DotenvIo {
                kind: io_err.kind(),
            }),
            Err(_) => Err(ConfigError::DotenvUnknown),
        }
    }

    fn is_not_found(err: &dotenvy::Error) -> bool {
        matches!(
            err,
            dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound
        )
    }

    /// Read a JSON config file when `build()` runs. A missing file is not an error.
    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    /// Apply `POPUP_*` environment variables to any value not already overridden.
    pub fn from_env(mut self) -> Result<Self, ConfigError> {
        apply_env(&mut self)?;
        Ok(self)
    }

    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = Some(max_rows);
        self
    }

    pub fn with_eligibility_marker(mut self, marker: impl Into<String>) -> Self {
        self.eligibility_marker = Some(marker.into());
        self
    }

    pub fn with_settings_key(mut self, key: impl Into<String>) -> Self {
        self.settings_key = Some(key.into());
        self
    }

    pub fn with_quote_policy(mut self, policy: QuotePolicy) -> Self {
        self.quote_policy = Some(policy);
        self
    }

    pub fn with_empty_result_policy(mut self, policy: EmptyResultPolicy) -> Self {
        self.empty_result_policy = Some(policy);
        self
    }

    pub fn with_strip_thousands_separator(mut self, strip: bool) -> Self {
        self.strip_thousands_separator = Some(strip);
        self
    }

    pub(crate) fn set_max_rows_if_unset(&mut self, value: usize) {
        self.max_rows.get_or_insert(value);
    }

    pub(crate) fn set_eligibility_marker_if_unset(&mut self, value: String) {
        self.eligibility_marker.get_or_insert(value);
    }

    pub(crate) fn set_settings_key_if_unset(&mut self, value: String) {
        self.settings_key.get_or_insert(value);
    }

    pub(crate) fn set_export_extension_if_unset(&mut self, value: String) {
        self.export_extension.get_or_insert(value);
    }

    pub(crate) fn set_quote_policy_if_unset(&mut self, value: QuotePolicy) {
        self.quote_policy.get_or_insert(value);
    }

    pub(crate) fn set_empty_result_policy_if_unset(&mut self, value: EmptyResultPolicy) {
        self.empty_result_policy.get_or_insert(value);
    }

    pub(crate) fn set_strip_thousands_separator_if_unset(&mut self, value: bool) {
        self.strip_thousands_separator.get_or_insert(value);
    }

    /// Build the final configuration.
    ///
    /// # Errors
    ///
    /// - `ConfigFileRead` / `ConfigFileParse` if the config file exists but is unusable.
    /// - `InvalidMaxRows` if `max_rows` is 0 or above the upper bound.
    /// - `EmptyField` if the marker, settings key, or extension is empty.
    pub fn build(self) -> Result<PopupConfig, ConfigError> {
        let base = match &self.config_path {
            Some(path) => read_config_file(path)?,
            None => PopupConfig::default(),
        };

        let config = PopupConfig {
            max_rows: self.max_rows.unwrap_or(base.max_rows),
            eligibility_marker: self.eligibility_marker.unwrap_or(base.eligibility_marker),
            settings_key: self.settings_key.unwrap_or(base.settings_key),
            export_extension: self.export_extension.unwrap_or(base.export_extension),
            quote_policy: self.quote_policy.unwrap_or(base.quote_policy),
            empty_result_policy: self
                .empty_result_policy
                .unwrap_or(base.empty_result_policy),
            strip_thousands_separator: self
                .strip_thousands_separator
                .unwrap_or(base.strip_thousands_separator),
        };

        validate(&config)?;
        tracing::debug!(
            max_rows = config.max_rows,
            quote_policy = %config.quote_policy,
            empty_result_policy = %config.empty_result_policy,
            "Popup configuration loaded"
        );
        Ok(config)
    }
}

fn read_config_file(path: &Path) -> Result<PopupConfig, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(PopupConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::ConfigFileRead {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    serde_json::from_str(&content).map_err(|source| ConfigError::ConfigFileParse {
        path: path.to_path_buf(),
        source,
    })
}

fn validate(config: &PopupConfig) -> Result<(), ConfigError> {
    if config.max_rows == 0 || config.max_rows > MAX_MAX_ROWS {
        return Err(ConfigError::InvalidMaxRows {
            message: format!(
                "must be between 1 and {} (got {})",
                MAX_MAX_ROWS, config.max_rows
            ),
        });
    }
    if config.eligibility_marker.is_empty() {
        return Err(ConfigError::EmptyField {
            field: "eligibility_marker",
        });
    }
    if config.settings_key.trim().is_empty() {
        return Err(ConfigError::EmptyField {
            field: "settings_key",
        });
    }
    if config.export_extension.trim().is_empty() {
        return Err(ConfigError::EmptyField {
            field: "export_extension",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_build_defaults() {
        let config = ConfigLoader::new().build().unwrap();
        assert_eq!(config, PopupConfig::default());
    }

    #[test]
    fn test_builder_overrides() {
        let config = ConfigLoader::new()
            .with_max_rows(10)
            .with_eligibility_marker("#")
            .with_quote_policy(QuotePolicy::Never)
            .with_empty_result_policy(EmptyResultPolicy::Reject)
            .with_strip_thousands_separator(false)
            .build()
            .unwrap();
        assert_eq!(config.max_rows, 10);
        assert_eq!(config.eligibility_marker, "#");
        assert_eq!(config.quote_policy, QuotePolicy::Never);
        assert_eq!(config.empty_result_policy, EmptyResultPolicy::Reject);
        assert!(!config.strip_thousands_separator);
    }

    #[test]
    fn test_zero_max_rows_rejected() {
        let err = ConfigLoader::new().with_max_rows(0).build().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMaxRows { .. }));
    }

    #[test]
    fn test_max_rows_above_bound_rejected() {
        let err = ConfigLoader::new()
            .with_max_rows(MAX_MAX_ROWS + 1)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMaxRows { .. }));
    }

    #[test]
    fn test_empty_marker_rejected() {
        let err = ConfigLoader::new()
            .with_eligibility_marker("")
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::EmptyField {
                field: "eligibility_marker"
            }
        ));
    }

    #[test]
    fn test_config_file_values_and_override_precedence() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"max_rows": 200, "settings_key": "fromFile"}}"#).unwrap();

        let config = ConfigLoader::new()
            .with_config_path(file.path().to_path_buf())
            .with_max_rows(5)
            .build()
            .unwrap();
        assert_eq!(config.max_rows, 5);
        assert_eq!(config.settings_key, "fromFile");
    }

    #[test]
    fn test_missing_config_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigLoader::new()
            .with_config_path(dir.path().join("absent.json"))
            .build()
            .unwrap();
        assert_eq!(config, PopupConfig::default());
    }

    #[test]
    fn test_corrupt_config_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();

        let err = ConfigLoader::new()
            .with_config_path(file.path().to_path_buf())
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::ConfigFileParse { .. }));
    }
}
