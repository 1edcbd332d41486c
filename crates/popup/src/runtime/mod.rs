//! Runtime that connects a `PopupSession` to its collaborators.
//!
//! Responsibilities:
//! - Perform the open handshake (dialog payload, worksheets, persisted selection).
//! - Execute session effects against the host collaborators.
//! - Feed collaborator results back into the session as actions.
//!
//! Does NOT handle:
//! - Session state transitions (see `session`).
//! - CSV rendering (see `export`).
//!
//! Invariants:
//! - Exactly one action is processed at a time; every collaborator call is
//!   awaited before the next effect runs.
//! - Collaborator failures become actions or notices, never panics.

mod fixture;
mod side_effects;

pub use fixture::{DirectoryDelivery, FileSettings, FixtureHost, HostFixture};
pub use side_effects::Notice;

use std::collections::VecDeque;

use datasource_config::PopupConfig;
use datasource_host::{DialogChannel, FileDelivery, HostDashboard, SettingsStore};
use tokio::sync::mpsc::Receiver;
use tracing::{Instrument, info, info_span};

use crate::action::{Action, Effect};
use crate::error::Result;
use crate::session::PopupSession;

/// A popup session wired to concrete collaborators.
pub struct PopupRuntime<H, S, C, F> {
    host: H,
    settings: S,
    dialog: C,
    delivery: F,
    session: PopupSession,
    notices: Vec<Notice>,
}

impl<H, S, C, F> PopupRuntime<H, S, C, F>
where
    H: HostDashboard,
    S: SettingsStore,
    C: DialogChannel,
    F: FileDelivery,
{
    /// Open the popup: wait for the open payload, list worksheets, and seed
    /// the session from the persisted selection.
    ///
    /// # Errors
    ///
    /// `HostCommunication` if the dialog channel or the dashboard fails.
    pub async fn open(
        config: PopupConfig,
        host: H,
        settings: S,
        mut dialog: C,
        delivery: F,
    ) -> Result<Self> {
        let open_payload = dialog.open().await?;
        let worksheets = host.list_worksheets().await?;
        let persisted = settings.get(&config.settings_key);

        let (session, effects) =
            PopupSession::open(config, open_payload, &worksheets, persisted.as_deref());

        let mut runtime = Self {
            host,
            settings,
            dialog,
            delivery,
            session,
            notices: Vec::new(),
        };
        runtime.run_effects(effects).await;
        Ok(runtime)
    }

    pub fn session(&self) -> &PopupSession {
        &self.session
    }

    /// Notices shown to the user so far, oldest first.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn is_closed(&self) -> bool {
        self.session.is_closed()
    }

    /// Replace the payload handed back to the parent on close.
    pub fn set_close_payload(&mut self, payload: impl Into<String>) {
        self.session.set_close_payload(payload);
    }

    /// Hand the collaborators back, e.g. to inspect them after the popup closed.
    pub fn into_parts(self) -> (H, S, C, F) {
        (self.host, self.settings, self.dialog, self.delivery)
    }

    /// Process `action` and every action that follows from its effects.
    pub async fn dispatch(&mut self, action: Action) {
        let span = info_span!("popup.dispatch", action = action.name());

        async move {
            let mut queue = VecDeque::from([action]);
            while let Some(next) = queue.pop_front() {
                let effects = self.session.update(next);
                for effect in effects {
                    if let Some(follow_up) = self.perform(effect).await {
                        queue.push_back(follow_up);
                    }
                }
            }
        }
        .instrument(span)
        .await;
    }

    /// Process user actions from `rx` until the popup closes or the sender is dropped.
    pub async fn run(&mut self, mut rx: Receiver<Action>) {
        while !self.is_closed() {
            let Some(action) = rx.recv().await else {
                info!("Action channel closed before the popup was closed");
                break;
            };
            self.dispatch(action).await;
        }
    }

    async fn run_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            if let Some(follow_up) = self.perform(effect).await {
                self.dispatch(follow_up).await;
            }
        }
    }
}
