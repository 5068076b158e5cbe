use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::Client;
use tokio::net::TcpListener;

use crate::{
    api::{self, AppState},
    config::AppConfig,
    infrastructure::{directories::ResolvedPaths, shutdown::Shutdown},
    scanner::VirusTotalClient,
    spam::SpamClassifier,
};

pub struct CyberShieldApp {
    _paths: ResolvedPaths,
    config: Arc<AppConfig>,
    state: Arc<AppState>,
    shutdown: Shutdown,
}

impl CyberShieldApp {
    pub fn initialize(config: AppConfig, paths: ResolvedPaths, shutdown: Shutdown) -> Result<Self> {
        let config = Arc::new(config);

        let http_client = Client::builder()
            .user_agent(format!("cybershield/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;

        let classifier = SpamClassifier::from_config(
            &config.classifier,
            config.profile.extended_keywords(),
        );
        let scanner = VirusTotalClient::new(http_client, config.virustotal.clone());

        tracing::info!(
            target: "config",
            profile = config.profile.as_str(),
            threshold = classifier.threshold(),
            keywords = classifier.keywords().len(),
            heuristics = config.classifier.heuristics,
            analysis_delay = ?config.virustotal.analysis_delay,
            max_polls = config.virustotal.max_polls,
            "classifier and scanner configured"
        );
        tracing::debug!(
            target: "config",
            keywords = ?classifier.keywords().iter().collect::<Vec<_>>(),
            "spam keyword list"
        );
        if !scanner.is_configured() {
            tracing::warn!(
                target: "config",
                "VIRUSTOTAL_API_KEY is not set; /api/scan will answer 500"
            );
        }

        let state = Arc::new(AppState {
            classifier,
            scanner,
            report_timeouts: config.virustotal.report_timeouts,
        });

        Ok(Self {
            _paths: paths,
            config,
            state,
            shutdown,
        })
    }

    pub async fn run(self) -> Result<()> {
        let CyberShieldApp {
            _paths: _,
            config,
            state,
            shutdown,
        } = self;

        let bind_addr = config.server.bind_addr();
        let listener = TcpListener::bind(&bind_addr)
            .await
            .with_context(|| format!("failed to bind {}", bind_addr))?;

        tracing::info!(target: "app", addr = %bind_addr, "CyberShield server listening");
        tracing::info!(target: "app", "API: http://localhost:{}/api", config.server.port);

        let listener_signal = shutdown.subscribe();
        axum::serve(listener, api::router(state))
            .with_graceful_shutdown(listener_signal.clone().wait())
            .await
            .context("HTTP server error")?;

        if listener_signal.is_triggered() {
            tracing::info!(target: "app", "server stopped after shutdown signal");
        } else {
            tracing::warn!(target: "app", "server stopped without shutdown signal");
        }
        Ok(())
    }
}
