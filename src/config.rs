//! Runtime configuration.
//!
//! Everything has a default, so the tool runs without a config file. A YAML
//! file passed with `--config` (or `NEWSFILTER_CONFIG`) overrides any subset
//! of fields:
//!
//! ```yaml
//! feed_base: https://static.newsfilter.io/landing-page
//! retry:
//!   max_attempts: 3
//! http:
//!   timeout_secs: 30
//! model:
//!   backend: ollama          # ollama | openai | awful_jade
//!   model: mistral-7B-Instruct-v0.2:latest
//!   api_base: http://localhost:11434
//! output:
//!   width: 100
//! ```

use crate::error::NewsError;
use crate::newsfilter::DEFAULT_FEED_BASE;
use crate::outputs::terminal::DEFAULT_WIDTH;
use crate::retry::RetryPolicy;
use crate::translate::DEFAULT_TRANSLATE_ENDPOINT;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tracing::{info, instrument};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL the `articles-{slug}.json` feeds live under.
    pub feed_base: String,
    /// Endpoint used by `--translate` for titles and briefs.
    pub translate_endpoint: String,
    pub retry: RetryConfig,
    pub http: HttpConfig,
    pub model: ModelConfig,
    pub output: OutputConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            feed_base: DEFAULT_FEED_BASE.to_string(),
            translate_endpoint: DEFAULT_TRANSLATE_ENDPOINT.to_string(),
            retry: RetryConfig::default(),
            http: HttpConfig::default(),
            model: ModelConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load the config at `path`, or the defaults when no path is given.
    ///
    /// # Errors
    ///
    /// Returns [`NewsError::Io`] if the file cannot be read, and
    /// [`NewsError::Yaml`] or [`NewsError::Config`] if its contents are invalid.
    #[instrument(level = "info", skip_all)]
    pub async fn load(path: Option<&Path>) -> Result<Self, NewsError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = fs::read_to_string(path).await?;
        let config = Self::from_yaml(&raw)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, NewsError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(raw)?;
        if config.output.width == 0 {
            return Err(NewsError::Config("output.width must be at least 1".to_string()));
        }
        Ok(config)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts per fetch, including the first.
    pub max_attempts: usize,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { max_attempts: 3 }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout. Unset means requests may wait indefinitely.
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
}

impl HttpConfig {
    /// Build the HTTP client shared by the feed, scrapers, and model backends.
    pub fn build_client(&self) -> Result<Client, NewsError> {
        let mut builder = Client::builder();
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        Ok(builder.build()?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum ModelBackend {
    #[serde(rename = "ollama")]
    Ollama,
    #[serde(rename = "openai")]
    OpenAi,
    #[serde(rename = "awful_jade")]
    AwfulJade,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelConfig {
    pub backend: ModelBackend,
    /// Model identifier understood by the backend.
    pub model: String,
    pub api_base: String,
    pub api_key: Option<String>,
    /// Completion budget for the `openai` backend.
    pub max_tokens: u32,
    /// Chat template name for the `awful_jade` backend.
    pub template: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            backend: ModelBackend::Ollama,
            model: "mistral-7B-Instruct-v0.2:latest".to_string(),
            api_base: "http://localhost:11434".to_string(),
            api_key: None,
            max_tokens: 256,
            template: "simple_question".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Maximum characters per printed line.
    pub width: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
        }
    }
}
