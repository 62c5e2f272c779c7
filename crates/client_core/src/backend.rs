//! HTTP client for the media backend: sign-in, file storage and video documents.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{MediaAsset, UserId},
    error::{ApiError, ApiException},
    protocol::{
        CreateVideoRequest, FileUploadQuery, LoginRequest, LoginResponse, StoredFile,
        VideoDocument,
    },
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{error::BackendError, media, CreateVideoPayload, VideoCreator};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: UserId,
    pub username: String,
}

pub struct VideoBackendClient {
    http: Client,
    server_url: String,
    bucket: String,
}

impl VideoBackendClient {
    pub fn new(server_url: impl Into<String>, bucket: impl Into<String>) -> Self {
        let server_url = server_url.into();
        Self {
            http: Client::new(),
            server_url: server_url.trim_end_matches('/').to_string(),
            bucket: bucket.into(),
        }
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub async fn login(&self, username: &str) -> Result<Session, BackendError> {
        let response = self
            .http
            .post(format!("{}/login", self.server_url))
            .json(&LoginRequest {
                username: username.to_string(),
            })
            .send()
            .await?;
        let body: LoginResponse = decode_response(response).await?;
        info!(user_id = body.user_id.0, username, "signed in");
        Ok(Session {
            user_id: body.user_id,
            username: username.to_string(),
        })
    }

    /// Sends the local file behind `asset` to the storage bucket under a fresh id.
    pub async fn upload_file(&self, asset: &MediaAsset) -> Result<StoredFile, BackendError> {
        let path = media::local_path(asset)?;
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|source| BackendError::ReadAsset {
                path: path.clone(),
                source,
            })?;

        let query = FileUploadQuery {
            file_id: Uuid::new_v4(),
            filename: asset.display_name().to_string(),
            mime_type: media::mime_type_for(asset),
        };
        debug!(
            file_id = %query.file_id,
            filename = %query.filename,
            size_bytes = bytes.len(),
            "uploading file"
        );

        let response = self
            .http
            .post(format!("{}/storage/{}/files", self.server_url, self.bucket))
            .query(&query)
            .header(reqwest::header::CONTENT_TYPE, query.mime_type.as_str())
            .body(bytes)
            .send()
            .await?;
        decode_response(response).await
    }

    /// Uploads thumbnail and video together, then records the document pointing at them.
    pub async fn create_video(
        &self,
        payload: &CreateVideoPayload,
    ) -> Result<VideoDocument, BackendError> {
        let (thumbnail, video) = futures::try_join!(
            self.upload_file(&payload.thumbnail),
            self.upload_file(&payload.video)
        )?;

        let request = CreateVideoRequest {
            title: payload.title.clone(),
            prompt: payload.prompt.clone(),
            thumbnail_url: thumbnail.url,
            video_url: video.url,
            creator: payload.author_id,
        };
        let response = self
            .http
            .post(format!("{}/videos", self.server_url))
            .json(&request)
            .send()
            .await?;
        let document: VideoDocument = decode_response(response).await?;
        info!(video_id = document.video_id.0, "video document created");
        Ok(document)
    }
}

#[async_trait]
impl VideoCreator for VideoBackendClient {
    async fn create(&self, payload: CreateVideoPayload) -> Result<VideoDocument> {
        Ok(self.create_video(&payload).await?)
    }
}

async fn decode_response<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ApiError>(&body) {
        Ok(api_error) => Err(BackendError::Api(ApiException::from(api_error))),
        Err(_) => Err(BackendError::Status {
            status: status.as_u16(),
            body,
        }),
    }
}

#[cfg(test)]
#[path = "tests/backend_tests.rs"]
mod tests;
