use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::{SecondsFormat, Utc};

use crate::{
    domain::{ScanOutcome, Verdict},
    scanner::VirusTotalClient,
    spam::SpamClassifier,
};

use super::{
    error::ApiError,
    types::{DetectRequest, DetectResponse, HealthResponse, ScanRequest},
};

pub struct AppState {
    pub classifier: SpamClassifier,
    pub scanner: VirusTotalClient,
    pub report_timeouts: bool,
}

/// POST /api/detect
///
/// An unreadable body is treated the same as a body without `email_text`.
pub async fn detect(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<DetectRequest>, JsonRejection>,
) -> Result<Json<DetectResponse>, ApiError> {
    let text = payload
        .ok()
        .and_then(|Json(req)| req.email_text)
        .filter(|text| !text.is_empty())
        .ok_or(ApiError::MissingEmailText)?;

    let verdict = Verdict::from_spam(state.classifier.classify(&text));
    tracing::info!(
        target: "http",
        verdict = verdict.label(),
        chars = text.chars().count(),
        "email text classified"
    );

    Ok(Json(DetectResponse {
        result: verdict.label().to_string(),
    }))
}

/// POST /api/scan
pub async fn scan(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ScanRequest>, JsonRejection>,
) -> Result<Json<ScanOutcome>, ApiError> {
    let url = payload
        .ok()
        .and_then(|Json(req)| req.url)
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .ok_or(ApiError::MissingUrl)?;

    match state.scanner.scan(&url).await {
        Ok(outcome) => {
            tracing::info!(
                target: "http",
                url = %url,
                scan_id = %outcome.scan_id,
                status = ?outcome.status,
                "website scanned"
            );
            Ok(Json(outcome))
        }
        Err(err) => {
            let api_err = ApiError::from_scan(&err, state.report_timeouts);
            tracing::error!(
                target: "http",
                url = %url,
                error = %err,
                status = api_err.status().as_u16(),
                "website scan failed"
            );
            Err(api_err)
        }
    }
}

/// GET /api/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
