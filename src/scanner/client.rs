use reqwest::Client;
use tokio::time::sleep;

use crate::{config::VirusTotalConfig, domain::ScanOutcome};

use super::{
    analysis::{
        analysis_url, check_status, parse_analysis, parse_submission, submission_url,
        AnalysisAttributes, API_KEY_HEADER,
    },
    error::ScanError,
};

#[derive(Clone)]
pub struct VirusTotalClient {
    http: Client,
    config: VirusTotalConfig,
}

impl VirusTotalClient {
    pub fn new(http: Client, config: VirusTotalConfig) -> Self {
        Self { http, config }
    }

    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// Submits `url`, waits for the configured delay, then reads the analysis
    /// statistics. With `max_polls > 1` an unfinished analysis is fetched
    /// again with doubling waits.
    pub async fn scan(&self, url: &str) -> Result<ScanOutcome, ScanError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(ScanError::MissingApiKey)?;

        let scan_id = self.submit(api_key, url).await?;
        tracing::info!(target: "scan", %scan_id, "url submitted for analysis");

        sleep(self.config.analysis_delay).await;
        let attributes = self.fetch_analysis(api_key, &scan_id).await?;
        let mut outcome = ScanOutcome {
            scan_id,
            report: attributes.stats,
            status: attributes.status,
        };

        let mut polls = 1;
        while polls < self.config.max_polls && !outcome.is_complete() {
            let wait = self
                .config
                .analysis_delay
                .saturating_mul(1u32 << polls.min(16));
            tracing::debug!(
                target: "scan",
                scan_id = %outcome.scan_id,
                status = ?outcome.status,
                poll = polls,
                ?wait,
                "analysis not finished; polling again"
            );
            sleep(wait).await;

            let attributes = self.fetch_analysis(api_key, &outcome.scan_id).await?;
            outcome.report = attributes.stats;
            outcome.status = attributes.status;
            polls += 1;
        }

        if !outcome.is_complete() {
            tracing::warn!(
                target: "scan",
                scan_id = %outcome.scan_id,
                status = ?outcome.status,
                "returning statistics of an unfinished analysis"
            );
        }
        Ok(outcome)
    }

    async fn submit(&self, api_key: &str, url: &str) -> Result<String, ScanError> {
        let response = self
            .http
            .post(submission_url(&self.config.base_url))
            .header(API_KEY_HEADER, api_key)
            .timeout(self.config.request_timeout)
            .form(&[("url", url)])
            .send()
            .await?;

        parse_submission(check_status(response)?).await
    }

    async fn fetch_analysis(
        &self,
        api_key: &str,
        scan_id: &str,
    ) -> Result<AnalysisAttributes, ScanError> {
        let response = self
            .http
            .get(analysis_url(&self.config.base_url, scan_id))
            .header(API_KEY_HEADER, api_key)
            .timeout(self.config.request_timeout)
            .send()
            .await?;

        parse_analysis(check_status(response)?).await
    }
}
