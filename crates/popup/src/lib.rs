//! Datasource selection popup.
//!
//! Responsibilities:
//! - Reconcile the worksheet checklist with the persisted selection (`selection`).
//! - Turn host summary data into a CSV document and hand it to the host (`export`).
//! - Drive the popup lifecycle as a state machine over actions and effects (`session`).
//! - Execute effects against host collaborators (`runtime`).
//!
//! Does NOT handle:
//! - Rendering any UI; the embedding host owns presentation.
//! - Talking to a concrete dashboard API (see the `datasource-host` traits).
//!
//! Invariants:
//! - `selection`, `export`, and `session` are pure and free of async runtime imports.
//! - Collaborator failures surface as notices; the popup never panics on them.

pub mod action;
pub mod cli;
pub mod error;
pub mod export;
pub mod logging;
pub mod runtime;
pub mod selection;
pub mod session;

pub use action::{Action, Effect, NoticeLevel};
pub use error::{PopupError, Result};
pub use export::{
    CsvDocument, ExportOptions, ExportRecord, export_file_name, to_document, to_records,
};
pub use runtime::{Notice, PopupRuntime};
pub use selection::{ChecklistItem, SeededChecklist, SelectionSet, seed};
pub use session::{PopupSession, SessionPhase};
