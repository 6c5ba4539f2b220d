//! Language-model summarization and translation.
//!
//! Article text goes through a fixed two-step prompt chain: first a
//! summarization prompt, then the summary is handed to a translate-to-Chinese
//! prompt. Both steps run against the same backend.
//!
//! # Architecture
//!
//! - [`TextGenerator`]: plain string-in, string-out model call
//! - [`OllamaGenerator`]: local Ollama server (`/api/generate`)
//! - [`OpenAiGenerator`]: OpenAI-compatible completions endpoint
//! - `AwfulJadeGenerator`: the `awful_aj` client (feature `awful-jade`)
//! - [`Backend`]: whichever of the above the configuration selects
//! - [`Summarizer`]: the prompt chain over any [`TextGenerator`]
//!
//! Calls are made once; there is no retry and no length limit on the input.

use crate::config::{ModelBackend, ModelConfig};
use crate::error::NewsError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{info, instrument, warn};

/// Prompt for the first step. `{article}` is replaced by the article text.
pub const SUMMARY_PROMPT: &str = "\
I want you to act as a news article summarizer.
I will provide you with an article on a specific topic:
{article}
Create a summary of the main points and findings of the article.
Keep it concise, objective, and in your own words, without direct quotes
or personal opinions, and make sure it accurately reflects the article.
";

/// Prompt for the second step. `{content}` is replaced by the summary.
pub const TRANSLATE_PROMPT: &str = "\
You are an expert in Chinese-English translation. Translate the following
English content into meaningful Chinese:
{content}
";

/// Fill a single `{name}` placeholder in a prompt template.
pub fn render(template: &str, name: &str, value: &str) -> String {
    template.replace(&format!("{{{name}}}"), value)
}

/// A text-generation backend.
pub trait TextGenerator {
    /// Send `prompt` to the model and return its completion.
    async fn generate(&self, prompt: &str) -> Result<String, NewsError>;
}

/// Local Ollama server.
#[derive(Debug, Clone)]
pub struct OllamaGenerator {
    http: Client,
    api_base: String,
    model: String,
}

#[derive(Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct OllamaResponse {
    response: String,
}

impl OllamaGenerator {
    pub fn new(http: Client, api_base: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http,
            api_base: api_base.into(),
            model: model.into(),
        }
    }
}

impl TextGenerator for OllamaGenerator {
    #[instrument(level = "info", skip_all, fields(model = %self.model))]
    async fn generate(&self, prompt: &str) -> Result<String, NewsError> {
        let url = format!("{}/api/generate", self.api_base.trim_end_matches('/'));
        let t0 = Instant::now();
        let response = self
            .http
            .post(&url)
            .json(&OllamaRequest {
                model: &self.model,
                prompt,
                stream: false,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(elapsed_ms = t0.elapsed().as_millis(), status = status.as_u16(), "Ollama call failed");
            return Err(NewsError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body: OllamaResponse = serde_json::from_str(&response.text().await?)?;
        info!(elapsed_ms = t0.elapsed().as_millis(), bytes = body.response.len(), "Ollama call succeeded");
        Ok(body.response)
    }
}

/// OpenAI-compatible `/v1/completions` endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiGenerator {
    http: Client,
    api_base: String,
    model: String,
    api_key: Option<String>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    text: String,
}

impl OpenAiGenerator {
    pub fn new(
        http: Client,
        api_base: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        max_tokens: u32,
    ) -> Self {
        Self {
            http,
            api_base: api_base.into(),
            model: model.into(),
            api_key,
            max_tokens,
        }
    }
}

impl TextGenerator for OpenAiGenerator {
    #[instrument(level = "info", skip_all, fields(model = %self.model))]
    async fn generate(&self, prompt: &str) -> Result<String, NewsError> {
        let url = format!("{}/v1/completions", self.api_base.trim_end_matches('/'));
        let t0 = Instant::now();
        let mut request = self.http.post(&url).json(&CompletionRequest {
            model: &self.model,
            prompt,
            max_tokens: self.max_tokens,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(elapsed_ms = t0.elapsed().as_millis(), status = status.as_u16(), "Completion call failed");
            return Err(NewsError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body: CompletionResponse = serde_json::from_str(&response.text().await?)?;
        let text = body
            .choices
            .into_iter()
            .next()
            .map(|c| c.text)
            .ok_or_else(|| NewsError::Model("completion response had no choices".to_string()))?;
        info!(elapsed_ms = t0.elapsed().as_millis(), bytes = text.len(), "Completion call succeeded");
        Ok(text)
    }
}

/// The `awful_aj` client, configured by its own `config.yaml` and a named chat template.
#[cfg(feature = "awful-jade")]
pub struct AwfulJadeGenerator {
    config: awful_aj::config::AwfulJadeConfig,
    template: awful_aj::template::ChatTemplate,
}

#[cfg(feature = "awful-jade")]
impl std::fmt::Debug for AwfulJadeGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwfulJadeGenerator").finish_non_exhaustive()
    }
}

#[cfg(feature = "awful-jade")]
impl AwfulJadeGenerator {
    /// Load `config.yaml` from the `awful_aj` config directory and the named template.
    pub async fn load(template_name: &str) -> Result<Self, NewsError> {
        let conf_file = awful_aj::config_dir()
            .map_err(|e| NewsError::Config(e.to_string()))?
            .join("config.yaml");
        let config_path = conf_file
            .to_str()
            .ok_or_else(|| NewsError::Config("not a valid config filename".to_string()))?;
        let config = awful_aj::config::load_config(config_path)
            .map_err(|e| NewsError::Config(e.to_string()))?;
        let template = awful_aj::template::load_template(template_name)
            .await
            .map_err(|e| NewsError::Config(e.to_string()))?;
        info!(config_path, template = template_name, "Loaded awful_aj configuration");
        Ok(Self { config, template })
    }
}

#[cfg(feature = "awful-jade")]
impl TextGenerator for AwfulJadeGenerator {
    #[instrument(level = "info", skip_all)]
    async fn generate(&self, prompt: &str) -> Result<String, NewsError> {
        let t0 = Instant::now();
        let res = awful_aj::api::ask(&self.config, prompt.to_string(), &self.template, None, None).await;
        match res {
            Ok(text) => Ok(text),
            Err(e) => {
                warn!(elapsed_ms = t0.elapsed().as_millis(), error = %e, "API call failed");
                Err(NewsError::Model(e.to_string()))
            }
        }
    }
}

/// The backend selected by [`ModelConfig::backend`].
#[derive(Debug)]
pub enum Backend {
    Ollama(OllamaGenerator),
    OpenAi(OpenAiGenerator),
    #[cfg(feature = "awful-jade")]
    AwfulJade(AwfulJadeGenerator),
}

impl Backend {
    pub async fn from_config(config: &ModelConfig, http: Client) -> Result<Self, NewsError> {
        match config.backend {
            ModelBackend::Ollama => Ok(Backend::Ollama(OllamaGenerator::new(
                http,
                &config.api_base,
                &config.model,
            ))),
            ModelBackend::OpenAi => Ok(Backend::OpenAi(OpenAiGenerator::new(
                http,
                &config.api_base,
                &config.model,
                config.api_key.clone(),
                config.max_tokens,
            ))),
            #[cfg(feature = "awful-jade")]
            ModelBackend::AwfulJade => Ok(Backend::AwfulJade(
                AwfulJadeGenerator::load(&config.template).await?,
            )),
            #[cfg(not(feature = "awful-jade"))]
            ModelBackend::AwfulJade => Err(NewsError::Config(
                "the awful_jade backend requires building with `--features awful-jade`".to_string(),
            )),
        }
    }
}

impl TextGenerator for Backend {
    async fn generate(&self, prompt: &str) -> Result<String, NewsError> {
        match self {
            Backend::Ollama(g) => g.generate(prompt).await,
            Backend::OpenAi(g) => g.generate(prompt).await,
            #[cfg(feature = "awful-jade")]
            Backend::AwfulJade(g) => g.generate(prompt).await,
        }
    }
}

/// The summarize-then-translate prompt chain.
#[derive(Debug)]
pub struct Summarizer<G> {
    generator: G,
}

impl<G: TextGenerator> Summarizer<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    /// Summarize `article`, then translate the summary to Chinese.
    #[instrument(level = "info", skip_all, fields(bytes = article.len()))]
    pub async fn summarize(&self, article: &str) -> Result<String, NewsError> {
        info!("Generating summary");
        let summary = self
            .generator
            .generate(&render(SUMMARY_PROMPT, "article", article))
            .await?;
        info!(bytes = summary.len(), "Summary generated; translating");
        self.translate(&summary).await
    }

    /// Translate `content` to Chinese with the model.
    pub async fn translate(&self, content: &str) -> Result<String, NewsError> {
        self.generator
            .generate(&render(TRANSLATE_PROMPT, "content", content))
            .await
    }
}
