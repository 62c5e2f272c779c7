use client_core::{media, Alert, AlertKind, FormField, Session, UploadForm, DEFAULT_LANDING_ROUTE};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use egui::TextureHandle;
use shared::domain::{MediaAsset, MediaKind};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{events::UiEvent, orchestration::dispatch_backend_command};

const PREVIEW_MAX_DIMENSION: f32 = 480.0;

#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub server_url: String,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AppViewState {
    SignIn,
    Form,
    Landing(String),
}

struct ThumbnailPreview {
    uri: String,
    texture: Option<TextureHandle>,
}

pub struct PublisherApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    view_state: AppViewState,
    server_url: String,
    username: String,
    session: Option<Session>,
    status: String,
    title: String,
    prompt: String,
    video: Option<MediaAsset>,
    thumbnail: Option<MediaAsset>,
    thumbnail_preview: Option<ThumbnailPreview>,
    uploading: bool,
    alerts: Vec<Alert>,
}

impl PublisherApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        startup: StartupConfig,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            view_state: AppViewState::SignIn,
            server_url: startup.server_url,
            username: startup.username,
            session: None,
            status: "Starting backend worker...".to_string(),
            title: String::new(),
            prompt: String::new(),
            video: None,
            thumbnail: None,
            thumbnail_preview: None,
            uploading: false,
            alerts: Vec::new(),
        }
    }

    fn dispatch(&mut self, cmd: BackendCommand) {
        dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status);
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => self.status = message,
                UiEvent::SignedIn(session) => {
                    self.status = format!("Signed in as {}", session.username);
                    self.session = Some(session);
                    self.view_state = AppViewState::Form;
                }
                UiEvent::SignInFailed(message) => {
                    self.status = message.clone();
                    self.alerts.push(Alert::error("Sign-in failed", message));
                }
                UiEvent::Alert(alert) => self.alerts.push(alert),
                UiEvent::Navigate(route) => self.view_state = AppViewState::Landing(route),
                UiEvent::UploadingChanged(uploading) => {
                    self.uploading = uploading;
                    if uploading {
                        self.status = "Uploading...".to_string();
                    }
                }
                UiEvent::FormChanged(form) => self.apply_form(form),
            }
        }
    }

    /// Text fields are edited locally, so only a reset overwrites them.
    fn apply_form(&mut self, form: UploadForm) {
        if form.is_empty() {
            self.title.clear();
            self.prompt.clear();
        }
        self.video = form.video;
        self.thumbnail = form.thumbnail;
    }

    fn thumbnail_texture(&mut self, ctx: &egui::Context) -> Option<TextureHandle> {
        let asset = self.thumbnail.as_ref()?;
        let stale = self
            .thumbnail_preview
            .as_ref()
            .map(|preview| preview.uri != asset.uri)
            .unwrap_or(true);
        if stale {
            self.thumbnail_preview = Some(ThumbnailPreview {
                uri: asset.uri.clone(),
                texture: load_preview_texture(ctx, asset),
            });
        }
        self.thumbnail_preview
            .as_ref()
            .and_then(|preview| preview.texture.clone())
    }

    fn show_sign_in_screen(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let avail = ui.available_size();
            ui.add_space((avail.y * 0.15).clamp(18.0, 120.0));
            ui.vertical_centered(|ui| {
                ui.set_width(avail.x.clamp(360.0, 480.0));
                ui.heading("Video Publisher");
                ui.weak("Sign in to upload.");
                ui.add_space(12.0);

                labeled_text_field(
                    ui,
                    "Server URL",
                    "http://127.0.0.1:8080",
                    &mut self.server_url,
                );
                labeled_text_field(ui, "Username", "creator", &mut self.username);
                ui.add_space(10.0);

                let button = egui::Button::new(egui::RichText::new("Sign in").strong())
                    .min_size(egui::vec2(ui.available_width(), 40.0));
                let can_submit =
                    !self.server_url.trim().is_empty() && !self.username.trim().is_empty();
                if ui.add_enabled(can_submit, button).clicked() {
                    self.status = "Signing in...".to_string();
                    self.dispatch(BackendCommand::SignIn {
                        server_url: self.server_url.trim().to_string(),
                        username: self.username.trim().to_string(),
                    });
                }

                ui.add_space(8.0);
                ui.small(egui::RichText::new(&self.status).weak());
            });
        });
    }

    fn show_form_screen(&mut self, ctx: &egui::Context) {
        let thumbnail_texture = self.thumbnail_texture(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Upload Video");
                ui.add_space(16.0);

                if labeled_text_field(
                    ui,
                    FormField::Title.label(),
                    "Give your video a catchy title...",
                    &mut self.title,
                )
                .changed()
                {
                    self.dispatch(BackendCommand::SetTitle(self.title.clone()));
                }
                ui.add_space(12.0);

                ui.label(egui::RichText::new(FormField::Video.label()).strong());
                let video_text = match &self.video {
                    Some(asset) => format!("🎬 {}", asset_summary(asset)),
                    None => "⬆ Choose a video".to_string(),
                };
                if picker_region(ui, &video_text, 120.0).clicked() {
                    self.dispatch(BackendCommand::PickMedia(MediaKind::Video));
                }
                ui.add_space(12.0);

                ui.label(egui::RichText::new(FormField::Thumbnail.label()).strong());
                let thumbnail_clicked = match (&self.thumbnail, &thumbnail_texture) {
                    (Some(_), Some(texture)) => {
                        let mut size = texture.size_vec2();
                        let scale = (ui.available_width() / size.x)
                            .min(PREVIEW_MAX_DIMENSION / size.y)
                            .min(1.0);
                        size *= scale;
                        ui.add(
                            egui::Image::new(texture)
                                .fit_to_exact_size(size)
                                .corner_radius(12.0)
                                .sense(egui::Sense::click()),
                        )
                        .clicked()
                    }
                    (Some(asset), None) => {
                        picker_region(ui, &format!("🖼 {}", asset_summary(asset)), 56.0).clicked()
                    }
                    (None, _) => picker_region(ui, "⬆ Choose a file", 56.0).clicked(),
                };
                if thumbnail_clicked {
                    self.dispatch(BackendCommand::PickMedia(MediaKind::Image));
                }
                ui.add_space(12.0);

                if labeled_text_field(
                    ui,
                    FormField::Prompt.label(),
                    "The prompt you used to create this video",
                    &mut self.prompt,
                )
                .changed()
                {
                    self.dispatch(BackendCommand::SetPrompt(self.prompt.clone()));
                }
                ui.add_space(16.0);

                ui.horizontal(|ui| {
                    let label = if self.uploading {
                        "Publishing..."
                    } else {
                        "Submit & Publish"
                    };
                    let button = egui::Button::new(egui::RichText::new(label).strong())
                        .min_size(egui::vec2(ui.available_width() - 32.0, 44.0));
                    if ui.add_enabled(!self.uploading, button).clicked() {
                        self.dispatch(BackendCommand::Submit);
                    }
                    if self.uploading {
                        ui.add(egui::Spinner::new());
                    }
                });

                ui.add_space(8.0);
                ui.small(egui::RichText::new(&self.status).weak());
            });
        });
    }

    fn show_landing_screen(&mut self, ctx: &egui::Context, route: &str) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(60.0);
                ui.heading("Home");
                if route != DEFAULT_LANDING_ROUTE {
                    ui.weak(route);
                }
                if let Some(session) = &self.session {
                    ui.label(format!("Your post is live, {}.", session.username));
                }
                ui.add_space(16.0);
                if ui.button("Upload another video").clicked() {
                    self.view_state = AppViewState::Form;
                }
            });
        });
    }

    fn show_alert(&mut self, ctx: &egui::Context) {
        let Some(alert) = self.alerts.first() else {
            return;
        };
        let icon = match alert.kind {
            AlertKind::Warning => "⚠",
            AlertKind::Success => "✔",
            AlertKind::Error => "✖",
        };
        let mut dismissed = false;
        egui::Window::new(format!("{icon} {}", alert.title))
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                if !alert.message.is_empty() {
                    ui.label(&alert.message);
                    ui.add_space(8.0);
                }
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        if dismissed {
            self.alerts.remove(0);
        }
    }
}

impl eframe::App for PublisherApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        match self.view_state.clone() {
            AppViewState::SignIn => self.show_sign_in_screen(ctx),
            AppViewState::Form => self.show_form_screen(ctx),
            AppViewState::Landing(route) => self.show_landing_screen(ctx, &route),
        }
        self.show_alert(ctx);

        // Backend events arrive off-thread; poll faster while an upload is running.
        let poll = if self.uploading { 50 } else { 200 };
        ctx.request_repaint_after(std::time::Duration::from_millis(poll));
    }
}

fn labeled_text_field(
    ui: &mut egui::Ui,
    label: &str,
    hint: &str,
    value: &mut String,
) -> egui::Response {
    ui.label(egui::RichText::new(label).strong());
    let edit = egui::TextEdit::singleline(value)
        .hint_text(hint)
        .desired_width(f32::INFINITY);
    ui.add_sized([ui.available_width(), 34.0], edit)
}

fn picker_region(ui: &mut egui::Ui, text: &str, height: f32) -> egui::Response {
    let button = egui::Button::new(text)
        .min_size(egui::vec2(ui.available_width(), height))
        .corner_radius(12.0);
    ui.add(button)
}

fn asset_summary(asset: &MediaAsset) -> String {
    match asset.size_bytes {
        Some(bytes) => format!("{} ({})", asset.display_name(), human_readable_bytes(bytes)),
        None => asset.display_name().to_string(),
    }
}

fn load_preview_texture(ctx: &egui::Context, asset: &MediaAsset) -> Option<TextureHandle> {
    let path = media::local_path(asset).ok()?;
    let decoded = match image::open(&path) {
        Ok(decoded) => decoded,
        Err(err) => {
            tracing::debug!(
                "thumbnail preview unavailable for '{}': {err}",
                path.display()
            );
            return None;
        }
    };
    let resized = decoded.thumbnail(PREVIEW_MAX_DIMENSION as u32, PREVIEW_MAX_DIMENSION as u32);
    let rgba = resized.to_rgba8();
    let [w, h] = [rgba.width() as usize, rgba.height() as usize];
    let color_image = egui::ColorImage::from_rgba_unmultiplied([w, h], rgba.as_raw());
    Some(ctx.load_texture(
        format!("thumbnail-preview:{}", asset.uri),
        color_image,
        egui::TextureOptions::LINEAR,
    ))
}

pub(crate) fn human_readable_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else if (value.fract() * 10.0).round() == 0.0 || (value.fract() * 10.0).round() == 10.0 {
        format!("{} {}", value.round(), UNITS[unit])
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::{asset_summary, human_readable_bytes};
    use shared::domain::MediaAsset;

    #[test]
    fn formats_media_sizes_readably() {
        assert_eq!(human_readable_bytes(0), "0 B");
        assert_eq!(human_readable_bytes(1023), "1023 B");
        assert_eq!(human_readable_bytes(1024), "1 KB");
        assert_eq!(human_readable_bytes(1536), "1.5 KB");
        assert_eq!(human_readable_bytes(2 * 1024 * 1024), "2 MB");
        assert_eq!(human_readable_bytes(3 * 1024 * 1024 * 1024), "3 GB");
    }

    #[test]
    fn summarizes_asset_name_and_size() {
        let asset = MediaAsset::from_uri("file:///videos/cat.mp4").with_size_bytes(1536);
        assert_eq!(asset_summary(&asset), "cat.mp4 (1.5 KB)");

        let bare = MediaAsset::from_uri("file:///videos/dog.mp4");
        assert_eq!(asset_summary(&bare), "dog.mp4");
    }
}
