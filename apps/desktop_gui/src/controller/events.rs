//! Backend-to-UI events and the toast notifier that feeds them.

use crossbeam_channel::{Sender, TrySendError};
use mint_core::Notifier;
use shared::{domain::AccountState, notification::Notification};

pub enum UiEvent {
    Info(String),
    Notify(Notification),
    AccountChanged(AccountState),
    BackendFailed(String),
}

/// Routes controller notifications into the UI event queue.
pub struct UiNotifier {
    ui_tx: Sender<UiEvent>,
}

impl UiNotifier {
    pub fn new(ui_tx: Sender<UiEvent>) -> Self {
        Self { ui_tx }
    }
}

impl Notifier for UiNotifier {
    fn notify(&self, notification: Notification) {
        match self.ui_tx.try_send(UiEvent::Notify(notification)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => tracing::warn!("ui event queue full; toast dropped"),
            Err(TrySendError::Disconnected(_)) => {
                tracing::debug!("ui event queue closed; toast dropped")
            }
        }
    }
}
