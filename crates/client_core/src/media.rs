//! Local media helpers: describing files as assets and resolving assets back to files.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use shared::domain::{MediaAsset, MediaKind};
use url::Url;

use crate::error::BackendError;

pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp", "heic"];
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "m4v", "webm", "mkv", "avi"];

const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

pub fn extensions_for(kind: MediaKind) -> &'static [&'static str] {
    match kind {
        MediaKind::Image => IMAGE_EXTENSIONS,
        MediaKind::Video => VIDEO_EXTENSIONS,
    }
}

pub fn path_matches_kind(path: &Path, kind: MediaKind) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            extensions_for(kind).contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Describes a local file as a picker asset with a `file://` URI.
pub async fn asset_from_path(path: &Path) -> Result<MediaAsset> {
    let absolute = tokio::fs::canonicalize(path)
        .await
        .with_context(|| format!("failed to resolve media path '{}'", path.display()))?;
    let metadata = tokio::fs::metadata(&absolute)
        .await
        .with_context(|| format!("failed to stat media file '{}'", absolute.display()))?;
    if !metadata.is_file() {
        return Err(anyhow!("'{}' is not a regular file", absolute.display()));
    }

    let uri = Url::from_file_path(&absolute)
        .map_err(|()| anyhow!("cannot express '{}' as a file url", absolute.display()))?;

    let mut asset = MediaAsset::from_uri(uri.to_string()).with_size_bytes(metadata.len());
    if let Some(name) = absolute.file_name().and_then(|name| name.to_str()) {
        asset = asset.with_file_name(name);
    }
    if let Some(mime) = mime_guess::from_path(&absolute).first() {
        asset = asset.with_mime_type(mime.essence_str());
    }
    Ok(asset)
}

/// Resolves an asset URI to a local path. Accepts `file://` URLs and bare paths.
pub fn local_path(asset: &MediaAsset) -> Result<PathBuf, BackendError> {
    let unsupported = || BackendError::UnsupportedUri {
        uri: asset.uri.clone(),
    };
    match Url::parse(&asset.uri) {
        Ok(url) if url.scheme() == "file" => url.to_file_path().map_err(|()| unsupported()),
        // Single-letter schemes are Windows drive letters, not URLs.
        Ok(url) if url.scheme().len() == 1 => Ok(PathBuf::from(&asset.uri)),
        Ok(_) => Err(unsupported()),
        Err(_) if !asset.uri.is_empty() => Ok(PathBuf::from(&asset.uri)),
        Err(_) => Err(unsupported()),
    }
}

pub fn mime_type_for(asset: &MediaAsset) -> String {
    if let Some(mime) = asset.mime_type.as_deref().filter(|mime| !mime.is_empty()) {
        return mime.to_string();
    }
    mime_guess::from_path(asset.display_name())
        .first()
        .map(|mime| mime.essence_str().to_string())
        .unwrap_or_else(|| FALLBACK_MIME_TYPE.to_string())
}
