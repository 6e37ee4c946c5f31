use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::path::PathBuf;

use crate::mount::MountError;

/// Custom error type for the HTTP endpoints
///
/// Every variant renders as a plain-text body. File creation failures never
/// show up here; `/make-mount-file` reports them in a normal 200 response.
#[derive(Debug)]
pub enum ApiError {
    /// Redis probe failed under the unguarded ping policy
    CacheUnavailable(anyhow::Error),
    /// Mount path does not exist
    MountNotFound(PathBuf),
    /// Mount path exists but cannot be enumerated
    MountUnreadable(PathBuf, String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::CacheUnavailable(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Redis PING failed: {:#}", err),
            ),
            ApiError::MountNotFound(path) => (
                StatusCode::NOT_FOUND,
                format!("Mount path not found: {}", path.display()),
            ),
            ApiError::MountUnreadable(path, reason) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Cannot list mount path {}: {}", path.display(), reason),
            ),
        };

        (status, message).into_response()
    }
}

impl From<MountError> for ApiError {
    fn from(err: MountError) -> Self {
        match err {
            MountError::NotFound(path) => ApiError::MountNotFound(path),
            MountError::Unreadable(path, err) => ApiError::MountUnreadable(path, err.to_string()),
        }
    }
}
