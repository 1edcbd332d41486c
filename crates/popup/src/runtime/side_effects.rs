//! Effect handlers.
//!
//! Each handler performs one collaborator call and turns its outcome into
//! the action the session expects next.

use std::time::Instant;

use datasource_host::{DialogChannel, FileDelivery, HostDashboard, SettingsStore};
use tracing::{debug, error, info, warn};

use super::PopupRuntime;
use crate::action::{Action, Effect, NoticeLevel};
use crate::export;

/// A message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl<H, S, C, F> PopupRuntime<H, S, C, F>
where
    H: HostDashboard,
    S: SettingsStore,
    C: DialogChannel,
    F: FileDelivery,
{
    /// Perform `effect`; returns the action reporting its outcome, if any.
    pub(super) async fn perform(&mut self, effect: Effect) -> Option<Action> {
        let name = effect.name();
        let start = Instant::now();

        let follow_up = match effect {
            Effect::FetchSummary { sheet, options } => {
                let result = self.host.summary_data(&sheet, options).await;
                if let Ok(data) = &result {
                    info!(
                        sheet = %sheet,
                        rows = data.rows.len(),
                        columns = data.columns.len(),
                        "Summary data loaded"
                    );
                }
                Some(Action::SummaryLoaded { sheet, result })
            }
            Effect::Deliver {
                document,
                file_name,
            } => {
                let result = export::deliver(&mut self.delivery, document, &file_name).await;
                Some(Action::Delivered { file_name, result })
            }
            Effect::SaveSettings { key, value } => {
                debug!(key = %key, "Saving selection");
                self.settings.set(&key, value);
                Some(Action::SettingsSaved(self.settings.save().await))
            }
            Effect::CloseDialog { payload } => {
                if let Err(e) = self.dialog.close(payload) {
                    error!(error = %e, "Failed to close dialog");
                    self.push_notice(NoticeLevel::Error, e.to_string());
                }
                None
            }
            Effect::Notify { level, message } => {
                self.push_notice(level, message);
                None
            }
        };

        debug!(
            effect = name,
            duration_ms = start.elapsed().as_millis() as u64,
            "Effect performed"
        );
        follow_up
    }

    fn push_notice(&mut self, level: NoticeLevel, message: String) {
        match level {
            NoticeLevel::Error => error!(notice = %message, "Notice"),
            NoticeLevel::Warning => warn!(notice = %message, "Notice"),
            NoticeLevel::Info | NoticeLevel::Success => info!(notice = %message, "Notice"),
        }
        self.notices.push(Notice { level, message });
    }
}
