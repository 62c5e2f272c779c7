//! Native file dialog picker.

use anyhow::Result;
use async_trait::async_trait;
use client_core::{media, MediaPicker, PickerRequest, PickerResponse};
use shared::domain::MediaKind;

pub struct DialogMediaPicker;

fn dialog_title(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Image => "Choose a thumbnail image",
        MediaKind::Video => "Choose a video",
    }
}

fn filter_name(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Image => "Images",
        MediaKind::Video => "Videos",
    }
}

#[async_trait]
impl MediaPicker for DialogMediaPicker {
    async fn pick(&self, request: PickerRequest) -> Result<PickerResponse> {
        // Native dialogs cannot crop or transcode, so the hints are only recorded.
        tracing::debug!(
            kind = request.kind.as_str(),
            aspect = ?request.aspect,
            quality = request.quality,
            "opening media dialog"
        );
        let handle = rfd::AsyncFileDialog::new()
            .set_title(dialog_title(request.kind))
            .add_filter(filter_name(request.kind), media::extensions_for(request.kind))
            .pick_file()
            .await;

        let Some(handle) = handle else {
            return Ok(PickerResponse::Cancelled);
        };
        let asset = media::asset_from_path(handle.path()).await?;
        Ok(PickerResponse::Selected(vec![asset]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialog_labels_follow_media_kind() {
        assert_eq!(dialog_title(MediaKind::Video), "Choose a video");
        assert_eq!(filter_name(MediaKind::Image), "Images");
    }
}
