//! English-to-Chinese translation through a hosted Gradio endpoint.
//!
//! The endpoint takes `{"data": [text, "en", "zh"]}` and answers with
//! `{"data": [translated_text, ...]}`. Translation is best effort: any
//! failure hands back the original text.

use crate::error::NewsError;
use crate::utils::truncate_for_log;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

pub const DEFAULT_TRANSLATE_ENDPOINT: &str = "https://hf.space/embed/mikeee/gradio-deepl/+/api/predict";

#[derive(Serialize)]
struct PredictRequest<'a> {
    data: [&'a str; 3],
}

#[derive(Deserialize)]
struct PredictResponse {
    data: Vec<serde_json::Value>,
}

#[derive(Debug, Clone)]
pub struct Translator {
    http: Client,
    endpoint: String,
}

impl Translator {
    pub fn new(http: Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    /// Translate `text` from English to Chinese.
    ///
    /// # Arguments
    ///
    /// * `text` - English text, typically a title or brief
    ///
    /// # Returns
    ///
    /// The translation, or `text` unchanged if the request or the response
    /// failed. The failure is logged as a warning.
    pub async fn translate(&self, text: &str) -> String {
        match self.try_translate(text).await {
            Ok(translated) => translated,
            Err(e) => {
                warn!(error = %e, "Translation failed; keeping original text");
                text.to_string()
            }
        }
    }

    #[instrument(level = "info", skip_all, fields(bytes = text.len()))]
    pub async fn try_translate(&self, text: &str) -> Result<String, NewsError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&PredictRequest {
                data: [text, "en", "zh"],
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(NewsError::Status {
                status: status.as_u16(),
                url: self.endpoint.clone(),
            });
        }
        debug!(body = %truncate_for_log(&body, 300), "Translation response");

        let parsed: PredictResponse = serde_json::from_str(&body)?;
        parsed
            .data
            .into_iter()
            .next()
            .and_then(|v| v.as_str().map(str::to_string))
            .ok_or_else(|| NewsError::Model("translation response carried no text".to_string()))
    }
}
