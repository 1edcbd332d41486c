//! Configuration management for the datasource popup.
//!
//! This crate provides the popup's tunables (row cap, eligibility marker,
//! settings key, CSV policies) and a loader that merges them from a JSON
//! config file, environment variables, and explicit builder overrides.

pub mod constants;
mod loader;
pub mod types;

pub use loader::{ConfigError, ConfigLoader, default_config_path, env_var_or_none};
pub use types::{EmptyResultPolicy, PopupConfig, QuotePolicy};
