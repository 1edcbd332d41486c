//! Collaborator traits implemented by the embedding host.
//!
//! Responsibilities:
//! - Describe the host dashboard, settings store, dialog channel, and file
//!   delivery operations the popup depends on.
//!
//! Does NOT handle:
//! - Any concrete transport; implementations live with the host adapter.
//!
//! Invariants:
//! - Every async operation is a single-shot request/response.
//! - Failures are reported as `HostError` and are never retried here.

use std::future::Future;

use crate::error::Result;
use crate::models::{SummaryData, SummaryOptions, Worksheet};

/// The host dashboard the popup was opened from.
pub trait HostDashboard {
    /// Worksheets on the dashboard, in dashboard order.
    fn list_worksheets(&self) -> impl Future<Output = Result<Vec<Worksheet>>> + Send;

    /// Summary data of the named worksheet, capped at `options.max_rows` rows.
    fn summary_data(
        &self,
        sheet_name: &str,
        options: SummaryOptions,
    ) -> impl Future<Output = Result<SummaryData>> + Send;
}

/// Key/value settings store shared with the parent extension.
pub trait SettingsStore {
    /// Current value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Buffer a write; nothing is committed until `save`.
    fn set(&mut self, key: &str, value: String);

    /// Commit buffered writes.
    fn save(&mut self) -> impl Future<Output = Result<()>> + Send;
}

/// Message channel between the popup and its parent context.
pub trait DialogChannel {
    /// Wait for the popup to be opened; yields the parent's open payload.
    fn open(&mut self) -> impl Future<Output = Result<String>> + Send;

    /// Close the popup, handing `payload` back to the parent.
    fn close(&mut self, payload: String) -> Result<()>;
}

/// Platform mechanism that offers a file to the user (e.g. a browser download).
pub trait FileDelivery {
    fn deliver(
        &mut self,
        bytes: Vec<u8>,
        mime_type: &str,
        file_name: &str,
    ) -> impl Future<Output = Result<()>> + Send;
}
