//! Popup session state machine.
//!
//! Responsibilities:
//! - Own the checklist and selection for one popup lifetime.
//! - Translate actions into state changes plus effects for the runtime.
//! - Enforce the export → deliver → save → close ordering.
//!
//! Does NOT handle:
//! - Performing effects or talking to collaborators (see `runtime`).
//!
//! Invariants:
//! - `update` never blocks and never performs I/O.
//! - At most one export is outstanding; close is refused while it is.
//! - A failed save leaves the popup open with its selection intact.
//! - After the dialog is closed every action is ignored.

use datasource_config::PopupConfig;
use datasource_host::{HostError, SummaryData, SummaryOptions, Worksheet};
use tracing::{debug, error, info, warn};

use crate::action::{Action, Effect, NoticeLevel};
use crate::error::PopupError;
use crate::export::{ExportOptions, build_document, export_file_name};
use crate::selection::{SeededChecklist, SelectionSet, seed};

/// Where the session is in its open → export → close lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    /// Waiting for user input.
    Idle,
    /// Summary data requested for `sheet`.
    FetchingSummary { sheet: String },
    /// Document handed to file delivery as `file_name`.
    Delivering { file_name: String },
    /// Selection handed to the settings store; waiting for the commit.
    Saving,
    /// Dialog closed.
    Closed,
}

impl SessionPhase {
    /// Whether an export is outstanding.
    pub fn is_exporting(&self) -> bool {
        matches!(self, Self::FetchingSummary { .. } | Self::Delivering { .. })
    }
}

/// State of one open popup.
#[derive(Debug, Clone)]
pub struct PopupSession {
    config: PopupConfig,
    checklist: SeededChecklist,
    close_payload: String,
    phase: SessionPhase,
}

impl PopupSession {
    /// Start a session from the open payload, the dashboard's worksheets, and
    /// the raw persisted selection (if the settings store had one).
    ///
    /// A persisted value that is not a JSON array of names is discarded with
    /// a warning notice; the session starts with an empty selection.
    pub fn open(
        config: PopupConfig,
        open_payload: String,
        worksheets: &[Worksheet],
        persisted: Option<&str>,
    ) -> (Self, Vec<Effect>) {
        let mut effects = Vec::new();

        let prior = match persisted {
            Some(raw) => SelectionSet::from_json(raw).unwrap_or_else(|e| {
                warn!(error = %e, "Ignoring unreadable persisted selection");
                effects.push(Effect::notify(
                    NoticeLevel::Warning,
                    "Saved selection could not be read and was reset",
                ));
                SelectionSet::new()
            }),
            None => SelectionSet::new(),
        };

        let checklist = seed(worksheets, prior, &config.eligibility_marker);
        info!(
            worksheets = worksheets.len(),
            rendered = checklist.items.len(),
            selected = checklist.selection.len(),
            "Popup session opened"
        );

        let session = Self {
            config,
            checklist,
            close_payload: open_payload,
            phase: SessionPhase::Idle,
        };
        (session, effects)
    }

    pub fn checklist(&self) -> &SeededChecklist {
        &self.checklist
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.checklist.selection
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn is_closed(&self) -> bool {
        self.phase == SessionPhase::Closed
    }

    /// Whether the close control should be disabled.
    pub fn close_disabled(&self) -> bool {
        self.phase.is_exporting()
    }

    /// Payload that will be handed to the parent on close.
    pub fn close_payload(&self) -> &str {
        &self.close_payload
    }

    /// Replace the payload handed to the parent on close (e.g. an edited refresh interval).
    pub fn set_close_payload(&mut self, payload: impl Into<String>) {
        self.close_payload = payload.into();
    }

    pub fn on_toggle(&mut self, name: impl Into<String>) -> Vec<Effect> {
        self.update(Action::Toggle(name.into()))
    }

    pub fn on_export(&mut self) -> Vec<Effect> {
        self.update(Action::Export)
    }

    pub fn on_close(&mut self) -> Vec<Effect> {
        self.update(Action::Close)
    }

    /// Apply `action` and return the effects the runtime must perform.
    pub fn update(&mut self, action: Action) -> Vec<Effect> {
        if self.is_closed() {
            debug!(action = action.name(), "Ignoring action after close");
            return Vec::new();
        }

        match action {
            Action::Toggle(name) => {
                let selected = self.checklist.selection.toggle(&name);
                self.checklist.sync_checked();
                debug!(name = %name, selected, "Selection toggled");
                Vec::new()
            }
            Action::Export => match self.begin_export() {
                Ok(effect) => vec![effect],
                Err(e) => vec![notice_for(&e)],
            },
            Action::Close => self.begin_close(),
            Action::SummaryLoaded { sheet, result } => self.handle_summary(sheet, result),
            Action::Delivered { file_name, result } => self.handle_delivered(file_name, result),
            Action::SettingsSaved(result) => self.handle_saved(result),
        }
    }

    /// Validate an export request and move into the fetching phase.
    ///
    /// # Errors
    ///
    /// - `ExportInFlight` if an export is already underway.
    /// - `ClosePending` if the selection is being saved for close.
    /// - `UnknownSelection` if nothing is selected.
    pub fn begin_export(&mut self) -> Result<Effect, PopupError> {
        match self.phase {
            SessionPhase::Idle => {}
            SessionPhase::Saving | SessionPhase::Closed => return Err(PopupError::ClosePending),
            SessionPhase::FetchingSummary { .. } | SessionPhase::Delivering { .. } => {
                return Err(PopupError::ExportInFlight);
            }
        }
        let sheet = self
            .checklist
            .selection
            .first()
            .ok_or(PopupError::UnknownSelection)?
            .to_string();

        info!(sheet = %sheet, max_rows = self.config.max_rows, "Export requested");
        self.phase = SessionPhase::FetchingSummary {
            sheet: sheet.clone(),
        };
        Ok(Effect::FetchSummary {
            sheet,
            options: SummaryOptions {
                max_rows: self.config.max_rows,
            },
        })
    }

    fn begin_close(&mut self) -> Vec<Effect> {
        match &self.phase {
            SessionPhase::Idle => {}
            SessionPhase::Saving => {
                debug!("Close already in progress");
                return Vec::new();
            }
            _ => return vec![notice_for(&PopupError::ExportInFlight)],
        }

        self.phase = SessionPhase::Saving;
        vec![Effect::SaveSettings {
            key: self.config.settings_key.clone(),
            value: self.checklist.selection.to_json(),
        }]
    }

    fn handle_summary(
        &mut self,
        sheet: String,
        result: Result<SummaryData, HostError>,
    ) -> Vec<Effect> {
        if !matches!(&self.phase, SessionPhase::FetchingSummary { sheet: s } if *s == sheet) {
            warn!(sheet = %sheet, "Ignoring summary data for a request that is not pending");
            return Vec::new();
        }

        let data = match result {
            Ok(data) => data,
            Err(e) => return self.fail_export(e.into()),
        };

        let options = ExportOptions::from(&self.config);
        match build_document(&sheet, &data, &options) {
            Ok(document) => {
                let file_name = export_file_name(
                    &sheet,
                    &self.config.eligibility_marker,
                    &self.config.export_extension,
                );
                self.phase = SessionPhase::Delivering {
                    file_name: file_name.clone(),
                };
                vec![Effect::Deliver {
                    document,
                    file_name,
                }]
            }
            Err(e) => self.fail_export(e),
        }
    }

    fn handle_delivered(&mut self, file_name: String, result: Result<(), HostError>) -> Vec<Effect> {
        if !matches!(&self.phase, SessionPhase::Delivering { file_name: f } if *f == file_name) {
            warn!(file_name = %file_name, "Ignoring delivery result that is not pending");
            return Vec::new();
        }

        if let Err(e) = result {
            return self.fail_export(PopupError::Delivery(e));
        }

        // A finished export closes the popup.
        self.phase = SessionPhase::Idle;
        let mut effects = vec![Effect::notify(
            NoticeLevel::Success,
            format!("Exported {file_name}"),
        )];
        effects.extend(self.begin_close());
        effects
    }

    fn handle_saved(&mut self, result: Result<(), HostError>) -> Vec<Effect> {
        if self.phase != SessionPhase::Saving {
            warn!("Ignoring settings save result that is not pending");
            return Vec::new();
        }

        match result {
            Ok(()) => {
                info!(
                    selected = self.checklist.selection.len(),
                    "Selection saved, closing popup"
                );
                self.phase = SessionPhase::Closed;
                vec![Effect::CloseDialog {
                    payload: self.close_payload.clone(),
                }]
            }
            Err(e) => {
                self.phase = SessionPhase::Idle;
                vec![notice_for(&PopupError::from(e))]
            }
        }
    }

    fn fail_export(&mut self, err: PopupError) -> Vec<Effect> {
        self.phase = SessionPhase::Idle;
        vec![notice_for(&err)]
    }
}

/// User-visible notice for `err`, logged at the matching level.
fn notice_for(err: &PopupError) -> Effect {
    if err.is_warning() {
        warn!(error = %err, "Popup request refused");
        Effect::notify(NoticeLevel::Warning, err.to_string())
    } else {
        error!(error = %err, "Popup operation failed");
        Effect::notify(NoticeLevel::Error, err.to_string())
    }
}
