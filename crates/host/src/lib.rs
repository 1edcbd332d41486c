//! Host collaborator interfaces for the datasource popup.
//!
//! This crate defines the data the host dashboard hands to the popup
//! (worksheets, summary data) and the traits the popup uses to talk to the
//! host, the settings store, the dialog channel, and the platform's file
//! delivery mechanism.

pub mod collaborators;
pub mod error;
pub mod models;

#[cfg(any(feature = "test-utils", test))]
pub mod testing;

pub use collaborators::{DialogChannel, FileDelivery, HostDashboard, SettingsStore};
pub use error::{HostError, Result};
pub use models::{Cell, Column, SummaryData, SummaryOptions, Worksheet};
