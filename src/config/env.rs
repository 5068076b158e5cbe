use std::{str::FromStr, time::Duration};

use thiserror::Error;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub profile: DeploymentProfile,
    pub server: ServerConfig,
    pub classifier: ClassifierConfig,
    pub virustotal: VirusTotalConfig,
    pub directories: DirectoryConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub threshold: u32,
    pub heuristics: bool,
    pub extra_keywords: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct VirusTotalConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub request_timeout: Duration,
    pub analysis_delay: Duration,
    /// Total analysis fetches per scan, including the first one.
    pub max_polls: u32,
    /// Surface timeouts as their own error instead of a generic scan failure.
    pub report_timeouts: bool,
}

#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    pub logs_dir: String,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

/// The two shapes this service has been deployed in. Each one fixes a set of
/// defaults; every individual value can still be overridden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeploymentProfile {
    /// Long-running server: richer scoring, longer waits, explicit timeouts.
    #[default]
    Server,
    /// Platform function: keyword-only scoring, shorter waits.
    Function,
}

impl DeploymentProfile {
    pub fn spam_threshold(self) -> u32 {
        match self {
            DeploymentProfile::Server => 3,
            DeploymentProfile::Function => 2,
        }
    }

    pub fn heuristics(self) -> bool {
        matches!(self, DeploymentProfile::Server)
    }

    pub fn extended_keywords(self) -> bool {
        matches!(self, DeploymentProfile::Server)
    }

    pub fn analysis_delay(self) -> Duration {
        match self {
            DeploymentProfile::Server => Duration::from_millis(3_000),
            DeploymentProfile::Function => Duration::from_millis(2_000),
        }
    }

    pub fn request_timeout(self) -> Duration {
        match self {
            DeploymentProfile::Server => Duration::from_millis(15_000),
            DeploymentProfile::Function => Duration::from_millis(10_000),
        }
    }

    pub fn report_timeouts(self) -> bool {
        matches!(self, DeploymentProfile::Server)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeploymentProfile::Server => "server",
            DeploymentProfile::Function => "function",
        }
    }
}

impl FromStr for DeploymentProfile {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "server" => Ok(DeploymentProfile::Server),
            "function" | "serverless" => Ok(DeploymentProfile::Function),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for environment variable {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}
