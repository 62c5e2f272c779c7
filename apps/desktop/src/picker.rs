use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;
use client_core::{media, MediaPicker, PickerRequest, PickerResponse};
use shared::domain::MediaKind;

/// Answers picker requests with the files named on the command line.
pub struct PathPicker {
    video: Option<PathBuf>,
    thumbnail: Option<PathBuf>,
}

impl PathPicker {
    pub fn new(video: Option<PathBuf>, thumbnail: Option<PathBuf>) -> Self {
        Self { video, thumbnail }
    }
}

#[async_trait]
impl MediaPicker for PathPicker {
    async fn pick(&self, request: PickerRequest) -> Result<PickerResponse> {
        let path = match request.kind {
            MediaKind::Image => self.thumbnail.as_ref(),
            MediaKind::Video => self.video.as_ref(),
        };
        let Some(path) = path else {
            return Ok(PickerResponse::Cancelled);
        };

        if !media::path_matches_kind(path, request.kind) {
            tracing::warn!(
                kind = request.kind.as_str(),
                "'{}' does not look like a {} file",
                path.display(),
                request.kind.as_str()
            );
        }
        let asset = media::asset_from_path(path).await?;
        Ok(PickerResponse::Selected(vec![asset]))
    }
}
