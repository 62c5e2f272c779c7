//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{UploadFormController, VideoBackendClient};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::{commands::BackendCommand, picker::DialogMediaPicker};
use crate::controller::{
    events::{classify_sign_in_failure, UiEvent},
    feedback::ChannelFeedback,
};

#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub storage_bucket: String,
    pub landing_route: String,
}

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, config: BridgeConfig) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                let _ = ui_tx.try_send(UiEvent::SignInFailed(format!(
                    "Backend worker startup failure: {err}"
                )));
                return;
            }
        };

        runtime.block_on(run_worker(cmd_rx, ui_tx, config));
    });
}

async fn run_worker(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    config: BridgeConfig,
) {
    let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));
    let mut controller: Option<Arc<UploadFormController>> = None;

    while let Ok(cmd) = cmd_rx.recv() {
        match cmd {
            BackendCommand::SignIn {
                server_url,
                username,
            } => {
                let backend = Arc::new(VideoBackendClient::new(
                    server_url,
                    config.storage_bucket.clone(),
                ));
                match backend.login(&username).await {
                    Ok(session) => {
                        controller = Some(Arc::new(
                            UploadFormController::new(
                                session.user_id,
                                Arc::new(DialogMediaPicker),
                                backend,
                                Arc::new(ChannelFeedback::new(ui_tx.clone())),
                            )
                            .with_landing_route(config.landing_route.clone()),
                        ));
                        let _ = ui_tx.try_send(UiEvent::SignedIn(session));
                    }
                    Err(err) => {
                        let _ = ui_tx.try_send(UiEvent::SignInFailed(classify_sign_in_failure(
                            &err.to_string(),
                        )));
                    }
                }
            }
            other => {
                let Some(controller) = controller.clone() else {
                    let _ = ui_tx
                        .try_send(UiEvent::Info("Sign in before editing the form".to_string()));
                    continue;
                };
                match other {
                    BackendCommand::SetTitle(title) => controller.set_title(title).await,
                    BackendCommand::SetPrompt(prompt) => controller.set_prompt(prompt).await,
                    // Dialogs and uploads run as tasks so edits keep flowing meanwhile.
                    BackendCommand::PickMedia(kind) => {
                        tokio::spawn(async move {
                            controller.select_media(kind).await;
                        });
                    }
                    BackendCommand::Submit => {
                        tokio::spawn(async move {
                            let outcome = controller.submit().await;
                            tracing::debug!(?outcome, "submit finished");
                        });
                    }
                    BackendCommand::SignIn { .. } => {}
                }
            }
        }
    }
}
