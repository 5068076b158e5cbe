use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::scanner::ScanError;

use super::types::ErrorBody;

/// Errors surfaced to HTTP callers as `{"error": "..."}`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("Email text is required")]
    MissingEmailText,

    #[error("URL is required")]
    MissingUrl,

    #[error("VirusTotal API key not configured")]
    ScannerNotConfigured,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("API rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Request timeout. Please try again.")]
    Timeout,

    #[error("Failed to scan website")]
    ScanFailed,

    #[error("Not found")]
    NotFound,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingEmailText | ApiError::MissingUrl => StatusCode::BAD_REQUEST,
            ApiError::InvalidApiKey => StatusCode::UNAUTHORIZED,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::ScannerNotConfigured | ApiError::ScanFailed | ApiError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Timeouts only get their own status when `report_timeouts` is set;
    /// otherwise they read as any other scan failure.
    pub fn from_scan(err: &ScanError, report_timeouts: bool) -> Self {
        match err {
            ScanError::MissingApiKey => ApiError::ScannerNotConfigured,
            ScanError::Unauthorized => ApiError::InvalidApiKey,
            ScanError::RateLimited => ApiError::RateLimited,
            ScanError::Timeout if report_timeouts => ApiError::Timeout,
            ScanError::Timeout
            | ScanError::UnexpectedStatus(_)
            | ScanError::MalformedResponse(_)
            | ScanError::Transport(_) => ApiError::ScanFailed,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
