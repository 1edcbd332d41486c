//! Error types for popup operations.
//!
//! Invariants:
//! - Delivery failures reported by the host map to `PopupError::Delivery`;
//!   every other host failure maps to `PopupError::HostCommunication`.
//! - Every variant's message is suitable for showing to the user.

use datasource_host::HostError;
use thiserror::Error;

/// Result type alias for popup operations.
pub type Result<T> = std::result::Result<T, PopupError>;

#[derive(Error, Debug)]
pub enum PopupError {
    /// The dashboard, settings store, or dialog channel failed.
    #[error("Host communication failed: {0}")]
    HostCommunication(#[source] HostError),

    /// The host returned no rows and empty exports are rejected.
    #[error("No data returned for '{0}'")]
    EmptyResult(String),

    /// Export was requested with nothing selected.
    #[error("Select a data source before exporting")]
    UnknownSelection,

    /// The platform refused the download.
    #[error("Download failed: {0}")]
    Delivery(#[source] HostError),

    /// An export is still waiting on the host or the download.
    #[error("An export is already in progress")]
    ExportInFlight,

    /// The selection is being saved and the popup is about to close.
    #[error("The popup is closing")]
    ClosePending,

    /// Writing the CSV document failed.
    #[error("Failed to build CSV document: {0}")]
    Document(#[from] csv::Error),
}

impl From<HostError> for PopupError {
    fn from(err: HostError) -> Self {
        if err.is_delivery() {
            Self::Delivery(err)
        } else {
            Self::HostCommunication(err)
        }
    }
}

impl PopupError {
    /// Errors that leave the popup fully usable and only need a warning.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Self::UnknownSelection | Self::ExportInFlight | Self::ClosePending
        )
    }
}
