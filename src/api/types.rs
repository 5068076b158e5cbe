use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct DetectRequest {
    #[serde(default)]
    pub email_text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DetectResponse {
    pub result: String,
}

#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
