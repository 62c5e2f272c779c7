//! Upload form state and the controller that drives picking and publishing.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use shared::{
    domain::{MediaAsset, MediaKind, UserId},
    protocol::VideoDocument,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    Alert, CreateVideoPayload, FormFeedback, MediaPicker, PickerRequest, PickerResponse,
    VideoCreator,
};

pub const REQUIRED_FIELDS_WARNING: &str = "Please fill in all required fields";
pub const DEFAULT_LANDING_ROUTE: &str = "/home";

const SUCCESS_TITLE: &str = "Success!";
const SUCCESS_MESSAGE: &str = "Post uploaded successfully";
const ERROR_TITLE: &str = "Error";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Video,
    Thumbnail,
    Prompt,
}

impl FormField {
    pub fn label(self) -> &'static str {
        match self {
            FormField::Title => "Video Title",
            FormField::Video => "Upload Video",
            FormField::Thumbnail => "Thumbnail Image",
            FormField::Prompt => "AI Prompt",
        }
    }
}

/// Form contents. Every edit produces a new value; nothing mutates a shared instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadForm {
    pub title: String,
    pub video: Option<MediaAsset>,
    pub thumbnail: Option<MediaAsset>,
    pub prompt: String,
}

impl UploadForm {
    pub fn with_title(&self, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..self.clone()
        }
    }

    pub fn with_prompt(&self, prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..self.clone()
        }
    }

    /// Images fill the thumbnail slot, videos the video slot.
    pub fn with_media(&self, kind: MediaKind, asset: MediaAsset) -> Self {
        match kind {
            MediaKind::Image => Self {
                thumbnail: Some(asset),
                ..self.clone()
            },
            MediaKind::Video => Self {
                video: Some(asset),
                ..self.clone()
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn missing_fields(&self) -> Vec<FormField> {
        let mut missing = Vec::new();
        if self.title.is_empty() {
            missing.push(FormField::Title);
        }
        if self.video.is_none() {
            missing.push(FormField::Video);
        }
        if self.thumbnail.is_none() {
            missing.push(FormField::Thumbnail);
        }
        if self.prompt.is_empty() {
            missing.push(FormField::Prompt);
        }
        missing
    }

    pub fn to_payload(&self, author_id: UserId) -> Result<CreateVideoPayload, Vec<FormField>> {
        match (&self.video, &self.thumbnail) {
            (Some(video), Some(thumbnail)) if !self.title.is_empty() && !self.prompt.is_empty() => {
                Ok(CreateVideoPayload {
                    title: self.title.clone(),
                    prompt: self.prompt.clone(),
                    video: video.clone(),
                    thumbnail: thumbnail.clone(),
                    author_id,
                })
            }
            _ => Err(self.missing_fields()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Published(VideoDocument),
    Failed(String),
    Incomplete(Vec<FormField>),
    AlreadyInFlight,
}

pub struct UploadFormController {
    author_id: UserId,
    landing_route: String,
    picker: Arc<dyn MediaPicker>,
    creator: Arc<dyn VideoCreator>,
    feedback: Arc<dyn FormFeedback>,
    form: Mutex<UploadForm>,
    uploading: AtomicBool,
}

impl UploadFormController {
    pub fn new(
        author_id: UserId,
        picker: Arc<dyn MediaPicker>,
        creator: Arc<dyn VideoCreator>,
        feedback: Arc<dyn FormFeedback>,
    ) -> Self {
        Self {
            author_id,
            landing_route: DEFAULT_LANDING_ROUTE.to_string(),
            picker,
            creator,
            feedback,
            form: Mutex::new(UploadForm::default()),
            uploading: AtomicBool::new(false),
        }
    }

    pub fn with_landing_route(mut self, route: impl Into<String>) -> Self {
        self.landing_route = route.into();
        self
    }

    pub async fn form(&self) -> UploadForm {
        self.form.lock().await.clone()
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading.load(Ordering::Acquire)
    }

    pub async fn set_title(&self, title: impl Into<String>) {
        let title = title.into();
        self.replace_form(|form| form.with_title(title)).await;
    }

    pub async fn set_prompt(&self, prompt: impl Into<String>) {
        let prompt = prompt.into();
        self.replace_form(|form| form.with_prompt(prompt)).await;
    }

    /// Opens the picker for `kind` and stores the first chosen asset.
    /// Returns whether the form changed; cancellation and picker failures leave it untouched.
    pub async fn select_media(&self, kind: MediaKind) -> bool {
        let request = PickerRequest::for_kind(kind);
        let response = match self.picker.pick(request).await {
            Ok(response) => response,
            Err(err) => {
                warn!(kind = kind.as_str(), "media picker failed: {err:#}");
                return false;
            }
        };

        let asset = match response {
            PickerResponse::Cancelled => {
                debug!(kind = kind.as_str(), "media picker cancelled");
                return false;
            }
            PickerResponse::Selected(assets) => match assets.into_iter().next() {
                Some(asset) => asset,
                None => {
                    warn!(kind = kind.as_str(), "media picker returned no assets");
                    return false;
                }
            },
        };

        debug!(kind = kind.as_str(), uri = %asset.uri, "media selected");
        self.replace_form(|form| form.with_media(kind, asset)).await;
        true
    }

    /// Publishes the current form. Incomplete forms are rejected with a warning before
    /// anything is sent, and a submit issued while another is in flight is ignored.
    /// Every attempt that gets past the in-flight check ends with an empty form.
    pub async fn submit(&self) -> SubmitOutcome {
        let payload = {
            let mut form = self.form.lock().await;
            if self.uploading.load(Ordering::Acquire) {
                debug!("submit ignored: upload already in flight");
                return SubmitOutcome::AlreadyInFlight;
            }

            let checked = form.to_payload(self.author_id);
            match checked {
                Ok(payload) => {
                    self.uploading.store(true, Ordering::Release);
                    payload
                }
                Err(missing) => {
                    *form = UploadForm::default();
                    drop(form);
                    info!(?missing, "submit rejected: required fields missing");
                    self.feedback.alert(Alert::warning(REQUIRED_FIELDS_WARNING));
                    self.feedback.form_changed(&UploadForm::default());
                    return SubmitOutcome::Incomplete(missing);
                }
            }
        };
        self.feedback.uploading_changed(true);

        info!(
            author_id = payload.author_id.0,
            title = %payload.title,
            "publishing video"
        );
        let outcome = match self.creator.create(payload).await {
            Ok(document) => {
                info!(video_id = document.video_id.0, "video published");
                self.feedback.alert(Alert::success(SUCCESS_TITLE, SUCCESS_MESSAGE));
                self.feedback.navigate(&self.landing_route);
                SubmitOutcome::Published(document)
            }
            Err(err) => {
                let message = format!("{err:#}");
                warn!("video publish failed: {message}");
                self.feedback.alert(Alert::error(ERROR_TITLE, message.clone()));
                SubmitOutcome::Failed(message)
            }
        };

        {
            let mut form = self.form.lock().await;
            *form = UploadForm::default();
            self.uploading.store(false, Ordering::Release);
        }
        self.feedback.form_changed(&UploadForm::default());
        self.feedback.uploading_changed(false);
        outcome
    }

    async fn replace_form(&self, update: impl FnOnce(&UploadForm) -> UploadForm) {
        let next = {
            let mut form = self.form.lock().await;
            let next = update(&*form);
            *form = next.clone();
            next
        };
        self.feedback.form_changed(&next);
    }
}

#[cfg(test)]
#[path = "tests/upload_form_tests.rs"]
mod tests;
