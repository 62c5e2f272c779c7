use std::path::PathBuf;

use shared::error::ApiException;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("{}", .0.message)]
    Api(ApiException),
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("asset uri is not a local file: {uri}")]
    UnsupportedUri { uri: String },
    #[error("failed to read asset '{}'", path.display())]
    ReadAsset {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl BackendError {
    /// True for failures that happened before any bytes reached the server.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            BackendError::UnsupportedUri { .. } | BackendError::ReadAsset { .. }
        )
    }
}
