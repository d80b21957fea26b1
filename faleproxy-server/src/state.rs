use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use faleproxy_common::{FaleproxyError, Result};
use faleproxy_config::FaleproxyConfig;
use faleproxy_http::HttpClient;
use faleproxy_rewrite::Substitution;

use crate::fetcher::PageFetcher;

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<dyn PageFetcher>,
    pub substitution: Arc<Substitution>,
    /// Deployment label reported by `GET /health`.
    pub environment: String,
}

impl AppState {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        substitution: Substitution,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            substitution: Arc::new(substitution),
            environment: environment.into(),
        }
    }

    /// Build the fetch client and compile the term pair from configuration.
    pub fn from_config(config: &FaleproxyConfig) -> Result<Self> {
        let substitution = Substitution::new(
            &config.substitution.source,
            &config.substitution.replacement,
        )
        .map_err(|e| FaleproxyError::Config(format!("substitution: {e}")))?;

        let client = HttpClient::new(
            &config.fetch.user_agent,
            Duration::from_secs(config.fetch.connect_timeout_secs),
        )
        .map_err(|e| FaleproxyError::Config(format!("fetch client: {e}")))?
        .with_timeout(Duration::from_secs(config.fetch.timeout_secs))
        .with_retries(config.fetch.retries);

        Ok(Self::new(
            Arc::new(client),
            substitution,
            config.server.environment.clone(),
        ))
    }
}

/// Where and what to serve.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
}

impl From<&FaleproxyConfig> for ServerSettings {
    fn from(config: &FaleproxyConfig) -> Self {
        Self {
            host: config.server.host.clone(),
            port: config.server.port,
            static_dir: config.server.static_dir.clone(),
        }
    }
}
