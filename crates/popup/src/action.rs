//! Action and effect protocol for the popup session.
//!
//! Actions are the events a session reacts to: user input from the popup
//! and results of collaborator calls. Effects are the work a session asks
//! the runtime to perform; their outcomes come back as actions.

use datasource_host::{HostError, SummaryData, SummaryOptions};

use crate::export::CsvDocument;

/// Events fed into [`PopupSession::update`](crate::session::PopupSession::update).
#[derive(Debug, Clone)]
pub enum Action {
    // User input
    /// A checklist item was clicked.
    Toggle(String),
    /// The export button was clicked.
    Export,
    /// The close button was clicked.
    Close,

    // Collaborator results
    /// Result of a summary data request for `sheet`.
    SummaryLoaded {
        sheet: String,
        result: Result<SummaryData, HostError>,
    },
    /// Result of handing a file to the platform.
    Delivered {
        file_name: String,
        result: Result<(), HostError>,
    },
    /// Result of committing the selection to the settings store.
    SettingsSaved(Result<(), HostError>),
}

impl Action {
    /// Safe action name for tracing (no payload data).
    pub fn name(&self) -> &'static str {
        match self {
            Action::Toggle(_) => "Toggle",
            Action::Export => "Export",
            Action::Close => "Close",
            Action::SummaryLoaded { .. } => "SummaryLoaded",
            Action::Delivered { .. } => "Delivered",
            Action::SettingsSaved(_) => "SettingsSaved",
        }
    }
}

/// Severity of a user-visible notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl NoticeLevel {
    /// Returns the display label for this level.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Success => "OK",
            Self::Warning => "WARN",
            Self::Error => "ERR",
        }
    }
}

/// Work requested by the session, executed by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Ask the host for a worksheet's summary data.
    FetchSummary {
        sheet: String,
        options: SummaryOptions,
    },
    /// Offer a CSV document to the user as a download.
    Deliver {
        document: CsvDocument,
        file_name: String,
    },
    /// Buffer `value` under `key` in the settings store and commit it.
    SaveSettings { key: String, value: String },
    /// Close the popup, handing `payload` to the parent.
    CloseDialog { payload: String },
    /// Show a message to the user.
    Notify { level: NoticeLevel, message: String },
}

impl Effect {
    pub fn notify(level: NoticeLevel, message: impl Into<String>) -> Self {
        Effect::Notify {
            level,
            message: message.into(),
        }
    }

    /// Safe effect name for tracing.
    pub fn name(&self) -> &'static str {
        match self {
            Effect::FetchSummary { .. } => "FetchSummary",
            Effect::Deliver { .. } => "Deliver",
            Effect::SaveSettings { .. } => "SaveSettings",
            Effect::CloseDialog { .. } => "CloseDialog",
            Effect::Notify { .. } => "Notify",
        }
    }
}
