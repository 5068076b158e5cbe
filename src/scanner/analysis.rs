use reqwest::{Response, StatusCode};
use serde::Deserialize;

use crate::domain::ScanReport;

use super::error::ScanError;

pub const API_KEY_HEADER: &str = "x-apikey";

pub fn submission_url(base_url: &str) -> String {
    format!("{}/urls", base_url)
}

pub fn analysis_url(base_url: &str, scan_id: &str) -> String {
    format!("{}/analyses/{}", base_url, scan_id)
}

/// Maps the statuses the service uses for quota and credential problems to
/// their own errors; any other non-success status is unexpected.
pub fn check_status(response: Response) -> Result<Response, ScanError> {
    match response.status() {
        status if status.is_success() => Ok(response),
        StatusCode::TOO_MANY_REQUESTS => Err(ScanError::RateLimited),
        StatusCode::UNAUTHORIZED => Err(ScanError::Unauthorized),
        status => Err(ScanError::UnexpectedStatus(status.as_u16())),
    }
}

pub async fn parse_submission(response: Response) -> Result<String, ScanError> {
    let body = response.bytes().await?;
    let submission: SubmissionResponse = serde_json::from_slice(&body)
        .map_err(|err| ScanError::MalformedResponse(format!("submission: {err}")))?;
    let scan_id = submission.data.id;
    if scan_id.trim().is_empty() {
        return Err(ScanError::MalformedResponse("submission: empty data.id".into()));
    }
    Ok(scan_id)
}

pub async fn parse_analysis(response: Response) -> Result<AnalysisAttributes, ScanError> {
    let body = response.bytes().await?;
    let analysis: AnalysisResponse = serde_json::from_slice(&body)
        .map_err(|err| ScanError::MalformedResponse(format!("analysis: {err}")))?;
    Ok(analysis.data.attributes)
}

#[derive(Debug, Deserialize)]
pub struct SubmissionResponse {
    pub data: SubmissionData,
}

#[derive(Debug, Deserialize)]
pub struct SubmissionData {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisResponse {
    pub data: AnalysisData,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisData {
    pub attributes: AnalysisAttributes,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisAttributes {
    pub stats: ScanReport,
    #[serde(default)]
    pub status: Option<String>,
}
