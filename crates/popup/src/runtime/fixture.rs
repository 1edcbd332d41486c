//! File-backed collaborators used by the `datasource-popup` binary.
//!
//! Responsibilities:
//! - Load a JSON host fixture (open payload, worksheets, summary data).
//! - Persist settings to a JSON file with write-then-rename.
//! - Deliver exported files into a directory.
//!
//! Does NOT handle:
//! - Talking to a real dashboard host.
//!
//! Invariants:
//! - Settings are written only on `save`; `set` only buffers.
//! - Delivered files never escape the output directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use datasource_host::{
    DialogChannel, FileDelivery, HostDashboard, HostError, SettingsStore, SummaryData,
    SummaryOptions, Worksheet,
};
use serde::{Deserialize, Serialize};

/// Contents of a host fixture file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostFixture {
    /// Payload the parent sends when opening the popup.
    #[serde(default)]
    pub open_payload: String,
    pub worksheets: Vec<Worksheet>,
    /// Summary data keyed by worksheet name.
    #[serde(default)]
    pub summaries: BTreeMap<String, SummaryData>,
}

impl HostFixture {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read host fixture: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse host fixture: {}", path.display()))
    }
}

/// Host dashboard and dialog channel served from a `HostFixture`.
#[derive(Debug, Clone)]
pub struct FixtureHost {
    fixture: HostFixture,
    closed_with: Option<String>,
}

impl FixtureHost {
    pub fn new(fixture: HostFixture) -> Self {
        Self {
            fixture,
            closed_with: None,
        }
    }

    /// Payload the popup closed with.
    pub fn closed_with(&self) -> Option<&str> {
        self.closed_with.as_deref()
    }
}

impl HostDashboard for FixtureHost {
    async fn list_worksheets(&self) -> Result<Vec<Worksheet>, HostError> {
        Ok(self.fixture.worksheets.clone())
    }

    async fn summary_data(
        &self,
        sheet_name: &str,
        options: SummaryOptions,
    ) -> Result<SummaryData, HostError> {
        let mut data = self
            .fixture
            .summaries
            .get(sheet_name)
            .cloned()
            .ok_or_else(|| HostError::WorksheetNotFound(sheet_name.to_string()))?;
        data.rows.truncate(options.max_rows);
        Ok(data)
    }
}

impl DialogChannel for FixtureHost {
    async fn open(&mut self) -> Result<String, HostError> {
        Ok(self.fixture.open_payload.clone())
    }

    fn close(&mut self, payload: String) -> Result<(), HostError> {
        self.closed_with = Some(payload);
        Ok(())
    }
}

/// Settings store persisted as a flat JSON object.
#[derive(Debug)]
pub struct FileSettings {
    path: PathBuf,
    committed: BTreeMap<String, String>,
    pending: BTreeMap<String, String>,
}

impl FileSettings {
    /// Load settings from `path`; a missing file starts empty.
    pub fn load(path: PathBuf) -> anyhow::Result<Self> {
        let committed = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse settings file: {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read settings file: {}", path.display()));
            }
        };
        Ok(Self {
            path,
            committed,
            pending: BTreeMap::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for FileSettings {
    fn get(&self, key: &str) -> Option<String> {
        self.pending
            .get(key)
            .or_else(|| self.committed.get(key))
            .cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.pending.insert(key.to_string(), value);
    }

    async fn save(&mut self) -> Result<(), HostError> {
        let mut next = self.committed.clone();
        next.extend(self.pending.clone());

        let content =
            serde_json::to_string_pretty(&next).map_err(|e| HostError::Settings(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| HostError::Settings(e.to_string()))?;
        }
        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, content)
            .await
            .map_err(|e| HostError::Settings(e.to_string()))?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| HostError::Settings(e.to_string()))?;

        self.committed = next;
        self.pending.clear();
        Ok(())
    }
}

/// File delivery that writes each download into a directory.
#[derive(Debug, Clone)]
pub struct DirectoryDelivery {
    dir: PathBuf,
}

impl DirectoryDelivery {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Where a file named `file_name` would be written.
    pub fn target_path(&self, file_name: &str) -> Result<PathBuf, HostError> {
        let name = Path::new(file_name)
            .file_name()
            .filter(|n| *n == std::ffi::OsStr::new(file_name))
            .ok_or_else(|| HostError::Delivery(format!("refusing file name '{file_name}'")))?;
        Ok(self.dir.join(name))
    }
}

impl FileDelivery for DirectoryDelivery {
    async fn deliver(
        &mut self,
        bytes: Vec<u8>,
        mime_type: &str,
        file_name: &str,
    ) -> Result<(), HostError> {
        let path = self.target_path(file_name)?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| HostError::Delivery(e.to_string()))?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| HostError::Delivery(format!("{}: {e}", path.display())))?;
        tracing::debug!(path = %path.display(), mime_type, "File written");
        Ok(())
    }
}
