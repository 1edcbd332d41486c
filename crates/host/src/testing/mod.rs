//! In-memory collaborators for tests.
//!
//! Available when running tests or when the `test-utils` feature is enabled.
//! Each fake records what it was asked to do so tests can assert on the
//! exact sequence of host interactions.

pub mod generators;

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use crate::collaborators::{DialogChannel, FileDelivery, HostDashboard, SettingsStore};
use crate::error::{HostError, Result};
use crate::models::{SummaryData, SummaryOptions, Worksheet};

/// Host dashboard with canned worksheets and summary data.
#[derive(Debug, Default)]
pub struct FakeHost {
    worksheets: Vec<Worksheet>,
    summaries: HashMap<String, SummaryData>,
    summary_error: Option<HostError>,
    summary_calls: Mutex<Vec<(String, SummaryOptions)>>,
}

impl FakeHost {
    pub fn new<I, S>(worksheet_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            worksheets: worksheet_names.into_iter().map(Worksheet::new).collect(),
            ..Self::default()
        }
    }

    pub fn with_summary(mut self, sheet_name: impl Into<String>, data: SummaryData) -> Self {
        self.summaries.insert(sheet_name.into(), data);
        self
    }

    /// Make every summary request fail with `error`.
    pub fn with_summary_error(mut self, error: HostError) -> Self {
        self.summary_error = Some(error);
        self
    }

    /// Summary requests received so far.
    pub fn summary_calls(&self) -> Vec<(String, SummaryOptions)> {
        self.summary_calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl HostDashboard for FakeHost {
    async fn list_worksheets(&self) -> Result<Vec<Worksheet>> {
        Ok(self.worksheets.clone())
    }

    async fn summary_data(&self, sheet_name: &str, options: SummaryOptions) -> Result<SummaryData> {
        if let Ok(mut calls) = self.summary_calls.lock() {
            calls.push((sheet_name.to_string(), options));
        }
        if let Some(err) = &self.summary_error {
            return Err(err.clone());
        }
        let data = self
            .summaries
            .get(sheet_name)
            .cloned()
            .ok_or_else(|| HostError::WorksheetNotFound(sheet_name.to_string()))?;
        let mut capped = data;
        capped.rows.truncate(options.max_rows);
        Ok(capped)
    }
}

/// Settings store backed by a map; `set` buffers until `save`.
#[derive(Debug, Default)]
pub struct MemorySettings {
    committed: BTreeMap<String, String>,
    pending: BTreeMap<String, String>,
    save_error: Option<HostError>,
    save_count: usize,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an already committed value.
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.committed.insert(key.into(), value.into());
        self
    }

    /// Make every `save` fail with `error`.
    pub fn with_save_error(mut self, error: HostError) -> Self {
        self.save_error = Some(error);
        self
    }

    /// Committed value for `key`.
    pub fn committed(&self, key: &str) -> Option<&str> {
        self.committed.get(key).map(String::as_str)
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.save_count
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> Option<String> {
        self.pending
            .get(key)
            .or_else(|| self.committed.get(key))
            .cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.pending.insert(key.to_string(), value);
    }

    async fn save(&mut self) -> Result<()> {
        if let Some(err) = &self.save_error {
            return Err(err.clone());
        }
        let pending = std::mem::take(&mut self.pending);
        self.committed.extend(pending);
        self.save_count += 1;
        Ok(())
    }
}

/// Dialog channel that yields a fixed open payload and records the close payload.
#[derive(Debug, Default)]
pub struct RecordingDialog {
    open_payload: String,
    closed_with: Option<String>,
}

impl RecordingDialog {
    pub fn new(open_payload: impl Into<String>) -> Self {
        Self {
            open_payload: open_payload.into(),
            closed_with: None,
        }
    }

    /// Payload passed to `close`, if the dialog was closed.
    pub fn closed_with(&self) -> Option<&str> {
        self.closed_with.as_deref()
    }
}

impl DialogChannel for RecordingDialog {
    async fn open(&mut self) -> Result<String> {
        Ok(self.open_payload.clone())
    }

    fn close(&mut self, payload: String) -> Result<()> {
        if self.closed_with.is_some() {
            return Err(HostError::Dialog("dialog already closed".to_string()));
        }
        self.closed_with = Some(payload);
        Ok(())
    }
}

/// A file handed to `RecordingDelivery`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveredFile {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub file_name: String,
}

impl DeliveredFile {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// File delivery that keeps every delivered file in memory.
#[derive(Debug, Default)]
pub struct RecordingDelivery {
    delivered: Vec<DeliveredFile>,
    error: Option<HostError>,
}

impl RecordingDelivery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every delivery fail with `error`.
    pub fn with_error(mut self, error: HostError) -> Self {
        self.error = Some(error);
        self
    }

    pub fn delivered(&self) -> &[DeliveredFile] {
        &self.delivered
    }
}

impl FileDelivery for RecordingDelivery {
    async fn deliver(&mut self, bytes: Vec<u8>, mime_type: &str, file_name: &str) -> Result<()> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        self.delivered.push(DeliveredFile {
            bytes,
            mime_type: mime_type.to_string(),
            file_name: file_name.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_settings_buffers_until_save() {
        let mut settings = MemorySettings::new();
        settings.set("k", "v".to_string());
        assert_eq!(settings.get("k").as_deref(), Some("v"));
        assert_eq!(settings.committed("k"), None);

        settings.save().await.unwrap();
        assert_eq!(settings.committed("k"), Some("v"));
        assert_eq!(settings.save_count(), 1);
    }

    #[tokio::test]
    async fn test_fake_host_caps_rows() {
        let data = SummaryData::from_text(["A"], [["1"], ["2"], ["3"]]);
        let host = FakeHost::new(["S*"]).with_summary("S*", data);

        let result = host
            .summary_data("S*", SummaryOptions { max_rows: 2 })
            .await
            .unwrap();
        assert_eq!(result.rows.len(), 2);
        assert_eq!(host.summary_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_fake_host_unknown_sheet() {
        let host = FakeHost::new(["S*"]);
        let err = host
            .summary_data("Missing", SummaryOptions { max_rows: 10 })
            .await
            .unwrap_err();
        assert_eq!(err, HostError::WorksheetNotFound("Missing".into()));
    }

    #[test]
    fn test_recording_dialog_closes_once() {
        let mut dialog = RecordingDialog::new("5");
        dialog.close("5".into()).unwrap();
        assert!(dialog.close("5".into()).is_err());
        assert_eq!(dialog.closed_with(), Some("5"));
    }
}
