use anyhow::Result;
use async_trait::async_trait;
use shared::{
    domain::{MediaAsset, MediaKind, UserId},
    protocol::VideoDocument,
};

pub mod backend;
pub mod config;
pub mod error;
pub mod media;
pub mod upload_form;

pub use backend::{Session, VideoBackendClient};
pub use error::BackendError;
pub use upload_form::{
    FormField, SubmitOutcome, UploadForm, UploadFormController, DEFAULT_LANDING_ROUTE,
    REQUIRED_FIELDS_WARNING,
};

/// Crop aspect hint (width, height) sent with every picker request.
pub const PICKER_ASPECT_HINT: (u32, u32) = (4, 3);
/// Export quality hint in `0.0..=1.0`; pickers are asked for the original quality.
pub const PICKER_QUALITY_HINT: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickerRequest {
    pub kind: MediaKind,
    pub aspect: (u32, u32),
    pub quality: f32,
}

impl PickerRequest {
    pub fn for_kind(kind: MediaKind) -> Self {
        Self {
            kind,
            aspect: PICKER_ASPECT_HINT,
            quality: PICKER_QUALITY_HINT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerResponse {
    Cancelled,
    Selected(Vec<MediaAsset>),
}

#[async_trait]
pub trait MediaPicker: Send + Sync {
    async fn pick(&self, request: PickerRequest) -> Result<PickerResponse>;
}

/// Everything the remote side needs to publish one video post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateVideoPayload {
    pub title: String,
    pub prompt: String,
    pub video: MediaAsset,
    pub thumbnail: MediaAsset,
    pub author_id: UserId,
}

#[async_trait]
pub trait VideoCreator: Send + Sync {
    async fn create(&self, payload: CreateVideoPayload) -> Result<VideoDocument>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Warning,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn warning(title: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Warning,
            title: title.into(),
            message: String::new(),
        }
    }

    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Success,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Error,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// User-facing side effects of the form: dialogs, navigation and loading indicators.
pub trait FormFeedback: Send + Sync {
    fn alert(&self, alert: Alert);
    fn navigate(&self, route: &str);
    fn uploading_changed(&self, _uploading: bool) {}
    fn form_changed(&self, _form: &UploadForm) {}
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
