//! Centralized constants for the datasource popup workspace.
//!
//! This module contains default values used across crates to avoid
//! magic number duplication.

// =============================================================================
// Export Defaults
// =============================================================================

/// Default maximum number of summary rows requested from the host.
pub const DEFAULT_MAX_ROWS: usize = 50_000;

/// Upper bound accepted for the configured row cap.
pub const MAX_MAX_ROWS: usize = 1_000_000;

/// File extension appended to exported worksheet names.
pub const DEFAULT_EXPORT_EXTENSION: &str = "csv";

/// MIME type handed to the file delivery collaborator.
pub const CSV_MIME_TYPE: &str = "text/csv";

/// File stem used when a worksheet name is empty after sanitizing.
pub const FALLBACK_EXPORT_STEM: &str = "export";

// =============================================================================
// Selection Defaults
// =============================================================================

/// Substring marking a worksheet as selectable in the popup.
pub const DEFAULT_ELIGIBILITY_MARKER: &str = "*";

/// Settings key under which the selected worksheet names are persisted.
pub const SELECTION_SETTINGS_KEY: &str = "selectedDatasources";
