//! Forwards form feedback from the backend worker to the UI thread.

use client_core::{Alert, FormFeedback, UploadForm};
use crossbeam_channel::{Sender, TrySendError};

use crate::controller::events::UiEvent;

pub struct ChannelFeedback {
    ui_tx: Sender<UiEvent>,
}

impl ChannelFeedback {
    pub fn new(ui_tx: Sender<UiEvent>) -> Self {
        Self { ui_tx }
    }

    fn send(&self, event: UiEvent) {
        match self.ui_tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                tracing::warn!(?event, "ui event queue full; dropping event");
            }
            Err(TrySendError::Disconnected(_)) => {
                tracing::debug!("ui event queue disconnected");
            }
        }
    }
}

impl FormFeedback for ChannelFeedback {
    fn alert(&self, alert: Alert) {
        self.send(UiEvent::Alert(alert));
    }

    fn navigate(&self, route: &str) {
        self.send(UiEvent::Navigate(route.to_string()));
    }

    fn uploading_changed(&self, uploading: bool) {
        self.send(UiEvent::UploadingChanged(uploading));
    }

    fn form_changed(&self, form: &UploadForm) {
        self.send(UiEvent::FormChanged(form.clone()));
    }
}
