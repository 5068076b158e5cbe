use std::{env, str::FromStr, time::Duration};

use url::Url;

use super::env::{
    AppConfig, ClassifierConfig, ConfigError, DeploymentProfile, DirectoryConfig, LoggingConfig,
    ServerConfig, VirusTotalConfig,
};

pub const DEFAULT_PORT: u16 = 10_000;
pub const DEFAULT_VIRUSTOTAL_BASE_URL: &str = "https://www.virustotal.com/api/v3";

pub fn load_config() -> Result<AppConfig, ConfigError> {
    AppConfig::from_lookup(|key| env::var(key).ok())
}

impl AppConfig {
    /// Builds the configuration from any key/value source. Empty values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let profile = match get("DEPLOYMENT_PROFILE") {
            Some(value) => value
                .parse::<DeploymentProfile>()
                .map_err(|_| ConfigError::Invalid {
                    key: "DEPLOYMENT_PROFILE",
                    value,
                })?,
            None => DeploymentProfile::default(),
        };

        let server = ServerConfig {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_value(get("PORT"), "PORT")?.unwrap_or(DEFAULT_PORT),
        };

        let classifier = ClassifierConfig {
            threshold: parse_value(get("SPAM_THRESHOLD"), "SPAM_THRESHOLD")?
                .unwrap_or_else(|| profile.spam_threshold()),
            heuristics: parse_flag(get("SPAM_HEURISTICS"), "SPAM_HEURISTICS")?
                .unwrap_or_else(|| profile.heuristics()),
            extra_keywords: get("SPAM_EXTRA_KEYWORDS")
                .map(|value| {
                    value
                        .split(',')
                        .map(|part| part.trim().to_string())
                        .filter(|part| !part.is_empty())
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default(),
        };

        let base_url = get("VIRUSTOTAL_BASE_URL")
            .unwrap_or_else(|| DEFAULT_VIRUSTOTAL_BASE_URL.to_string());
        match Url::parse(&base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => {
                return Err(ConfigError::Invalid {
                    key: "VIRUSTOTAL_BASE_URL",
                    value: base_url,
                })
            }
        }

        let max_polls = parse_value::<u32>(get("SCAN_MAX_POLLS"), "SCAN_MAX_POLLS")?.unwrap_or(1);
        if max_polls == 0 {
            return Err(ConfigError::Invalid {
                key: "SCAN_MAX_POLLS",
                value: max_polls.to_string(),
            });
        }

        let virustotal = VirusTotalConfig {
            api_key: get("VIRUSTOTAL_API_KEY"),
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout: parse_value(get("VIRUSTOTAL_TIMEOUT_MS"), "VIRUSTOTAL_TIMEOUT_MS")?
                .map(Duration::from_millis)
                .unwrap_or_else(|| profile.request_timeout()),
            analysis_delay: parse_value(get("SCAN_ANALYSIS_DELAY_MS"), "SCAN_ANALYSIS_DELAY_MS")?
                .map(Duration::from_millis)
                .unwrap_or_else(|| profile.analysis_delay()),
            max_polls,
            report_timeouts: parse_flag(get("SCAN_REPORT_TIMEOUTS"), "SCAN_REPORT_TIMEOUTS")?
                .unwrap_or_else(|| profile.report_timeouts()),
        };

        let directories = DirectoryConfig {
            logs_dir: get("LOGS_DIR").unwrap_or_else(|| "logs".to_string()),
        };

        let logging = LoggingConfig {
            level: get("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        };

        Ok(Self {
            profile,
            server,
            classifier,
            virustotal,
            directories,
            logging,
        })
    }
}

fn parse_value<T: FromStr>(raw: Option<String>, key: &'static str) -> Result<Option<T>, ConfigError> {
    raw.map(|value| {
        value
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key, value })
    })
    .transpose()
}

fn parse_flag(raw: Option<String>, key: &'static str) -> Result<Option<bool>, ConfigError> {
    raw.map(|value| match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid { key, value }),
    })
    .transpose()
}
