use std::path::{Path, PathBuf};

use clap::Parser;
use client_core::config::{load_settings_from, Settings, DEFAULT_SETTINGS_FILE};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

mod backend_bridge;
mod controller;
mod ui;

use backend_bridge::{commands::BackendCommand, runtime::BridgeConfig};
use controller::events::UiEvent;
use ui::{PublisherApp, StartupConfig};

#[derive(Parser, Debug)]
#[command(about = "Desktop video publisher")]
struct Args {
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    username: Option<String>,
    #[arg(long)]
    config: Option<PathBuf>,
}

/// `--config`, else `./publisher.toml` when present, else the per-user config dir.
fn resolve_settings_path(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(path) = explicit {
        return path;
    }
    let local = Path::new(DEFAULT_SETTINGS_FILE);
    if local.exists() {
        return local.to_path_buf();
    }
    dirs::config_dir()
        .map(|dir| dir.join("video_publisher").join(DEFAULT_SETTINGS_FILE))
        .unwrap_or_else(|| local.to_path_buf())
}

fn apply_args(mut settings: Settings, args: &Args) -> Settings {
    if let Some(server_url) = &args.server_url {
        settings.server_url = server_url.clone();
    }
    if let Some(username) = &args.username {
        settings.username = username.clone();
    }
    settings
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    let args = Args::parse();
    let settings_path = resolve_settings_path(args.config.clone());
    let settings = apply_args(load_settings_from(&settings_path), &args);
    tracing::info!(
        settings = %settings_path.display(),
        server_url = %settings.server_url,
        "starting desktop publisher"
    );

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    backend_bridge::runtime::launch(
        cmd_rx,
        ui_tx,
        BridgeConfig {
            storage_bucket: settings.storage_bucket.clone(),
            landing_route: settings.landing_route.clone(),
        },
    );

    let startup = StartupConfig {
        server_url: settings.server_url,
        username: settings.username,
    };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Video Publisher")
            .with_inner_size([560.0, 820.0])
            .with_min_inner_size([420.0, 560.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Video Publisher",
        options,
        Box::new(|_cc| Ok(Box::new(PublisherApp::new(cmd_tx, ui_rx, startup)))),
    )
}
