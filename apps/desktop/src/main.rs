use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Result};
use clap::Parser;
use client_core::{
    config::{load_settings, load_settings_from},
    Alert, AlertKind, FormFeedback, SubmitOutcome, UploadFormController, VideoBackendClient,
};
use shared::domain::MediaKind;
use tracing_subscriber::EnvFilter;

mod picker;

use picker::PathPicker;

#[derive(Parser, Debug)]
#[command(about = "Publish a video with its thumbnail and generation prompt")]
struct Args {
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    username: Option<String>,
    /// Settings file; defaults to ./publisher.toml.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value = "")]
    title: String,
    #[arg(long, default_value = "")]
    prompt: String,
    #[arg(long)]
    video: Option<PathBuf>,
    #[arg(long)]
    thumbnail: Option<PathBuf>,
}

struct TerminalFeedback;

impl FormFeedback for TerminalFeedback {
    fn alert(&self, alert: Alert) {
        let label = match alert.kind {
            AlertKind::Warning => "warning",
            AlertKind::Success => "ok",
            AlertKind::Error => "error",
        };
        if alert.message.is_empty() {
            println!("[{label}] {}", alert.title);
        } else {
            println!("[{label}] {}: {}", alert.title, alert.message);
        }
    }

    fn navigate(&self, route: &str) {
        tracing::info!(route, "publish finished; landing view");
    }

    fn uploading_changed(&self, uploading: bool) {
        if uploading {
            println!("Uploading...");
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => load_settings_from(path),
        None => load_settings(),
    };
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    if let Some(username) = args.username {
        settings.username = username;
    }

    let backend = Arc::new(VideoBackendClient::new(
        settings.server_url.clone(),
        settings.storage_bucket.clone(),
    ));
    let session = backend.login(&settings.username).await?;
    println!("Signed in as {} (user_id={})", session.username, session.user_id.0);

    let controller = UploadFormController::new(
        session.user_id,
        Arc::new(PathPicker::new(args.video, args.thumbnail)),
        backend,
        Arc::new(TerminalFeedback),
    )
    .with_landing_route(settings.landing_route);

    controller.set_title(args.title).await;
    controller.select_media(MediaKind::Video).await;
    controller.select_media(MediaKind::Image).await;
    controller.set_prompt(args.prompt).await;

    match controller.submit().await {
        SubmitOutcome::Published(document) => {
            println!(
                "Published video {} at {}",
                document.video_id.0, document.video_url
            );
            Ok(())
        }
        SubmitOutcome::Failed(message) => bail!("publish failed: {message}"),
        SubmitOutcome::Incomplete(missing) => {
            let labels: Vec<&str> = missing.iter().map(|field| field.label()).collect();
            bail!("missing required fields: {}", labels.join(", "))
        }
        SubmitOutcome::AlreadyInFlight => bail!("another upload is already in progress"),
    }
}
