//! Error types for host collaborator calls.

use thiserror::Error;

/// Result type alias for collaborator operations.
pub type Result<T> = std::result::Result<T, HostError>;

/// Errors reported by the host dashboard, settings store, dialog channel,
/// or file delivery collaborators.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The host dashboard rejected or failed a request.
    #[error("Host request failed: {0}")]
    Dashboard(String),

    /// No worksheet with the given name exists on the dashboard.
    #[error("Worksheet not found: {0}")]
    WorksheetNotFound(String),

    /// The settings store failed to commit.
    #[error("Failed to save settings: {0}")]
    Settings(String),

    /// The dialog channel to the parent context is unavailable.
    #[error("Dialog channel error: {0}")]
    Dialog(String),

    /// The platform refused or failed to deliver a file.
    #[error("File delivery failed: {0}")]
    Delivery(String),
}

impl HostError {
    /// Check if this error came from the file delivery collaborator.
    pub fn is_delivery(&self) -> bool {
        matches!(self, Self::Delivery(_))
    }
}
