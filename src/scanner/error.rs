use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("VirusTotal API key not configured")]
    MissingApiKey,

    #[error("request to VirusTotal timed out")]
    Timeout,

    #[error("VirusTotal rate limit exceeded")]
    RateLimited,

    #[error("VirusTotal rejected the API key")]
    Unauthorized,

    #[error("VirusTotal returned unexpected status {0}")]
    UnexpectedStatus(u16),

    #[error("malformed VirusTotal response: {0}")]
    MalformedResponse(String),

    #[error("VirusTotal request failed: {0}")]
    Transport(#[source] reqwest::Error),
}

impl From<reqwest::Error> for ScanError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ScanError::Timeout
        } else if err.is_decode() {
            ScanError::MalformedResponse(err.to_string())
        } else {
            ScanError::Transport(err)
        }
    }
}
