//! # NewsFilter Brief
//!
//! Reads the latest Bloomberg and Reuters articles from the NewsFilter
//! landing-page feeds and prints them to the terminal.
//!
//! ## Features
//!
//! - Lists article briefs (title, url, description), optionally filtered by a
//!   whole-word topic and optionally translated to Chinese
//! - Scrapes the full text of a single article
//! - Summarizes articles through a language model (Ollama, an
//!   OpenAI-compatible API, or `awful_aj`), then translates the summary
//!
//! ## Usage
//!
//! ```sh
//! newsfilter_brief -s reuters -t fed
//! newsfilter_brief -l https://www.bloomberg.com/news/articles/... --summary
//! ```
//!
//! ## Architecture
//!
//! Everything runs sequentially:
//! 1. **Lookup**: resolve `--source` in the static source registry
//! 2. **Feed**: fetch the provider's feed with linear-backoff retries
//! 3. **Content**: optionally scrape full article text
//! 4. **Model**: optionally summarize and translate
//! 5. **Output**: print fixed-width text to stdout; logs go to stderr

use clap::Parser;
use std::error::Error;
use std::io::{self, Write};
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod error;
mod filter;
#[cfg(test)]
mod log_capture;
mod models;
mod newsfilter;
mod outputs;
mod retry;
mod scrapers;
mod translate;
mod utils;

use api::{Backend, Summarizer, TextGenerator};
use cli::Cli;
use config::AppConfig;
use newsfilter::NewsClient;
use outputs::terminal::{BriefTranslation, write_brief, write_content, write_digest_entry};
use translate::Translator;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();

    let args = Cli::parse();
    debug!(?args.source, ?args.topic, ?args.url, "Parsed CLI arguments");

    let mut config = AppConfig::load(args.config.as_deref()).await?;
    if let Some(width) = args.width {
        config.output.width = width;
    }
    if args.api_key.is_some() {
        config.model.api_key = args.api_key.clone();
    }

    let provider = match scrapers::lookup(&args.source) {
        Ok(provider) => provider,
        Err(e) => {
            error!(source = %args.source, "Unknown news source");
            return Err(e.into());
        }
    };
    info!(source = provider.display_name(), "news starting up");

    let http = config.http.build_client()?;
    let client = NewsClient::new(
        http.clone(),
        provider,
        config.feed_base.clone(),
        config.retry.policy(),
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &args.url {
        Some(url) => {
            let summarizer = if args.summary {
                Some(Summarizer::new(Backend::from_config(&config.model, http.clone()).await?))
            } else {
                None
            };
            show_article(&client, summarizer.as_ref(), url, config.output.width, &mut out).await?;
        }
        None if args.summary => {
            let summarizer = Summarizer::new(Backend::from_config(&config.model, http.clone()).await?);
            show_digest(&client, &summarizer, &args.topic, args.top_k, config.output.width, &mut out)
                .await?;
        }
        None => {
            let translator = args
                .translate
                .then(|| Translator::new(http.clone(), config.translate_endpoint.clone()));
            show_briefs(&client, translator.as_ref(), &args.topic, config.output.width, &mut out)
                .await?;
        }
    }
    out.flush()?;

    let elapsed = start_time.elapsed();
    info!(?elapsed, "Execution complete");
    Ok(())
}

/// Print the brief of every (topic-matching) article in the feed.
#[instrument(level = "info", skip(client, translator, out))]
async fn show_briefs<W: Write>(
    client: &NewsClient,
    translator: Option<&Translator>,
    topic: &str,
    width: usize,
    out: &mut W,
) -> Result<(), Box<dyn Error>> {
    let fetched = client.fetch_articles(topic).await;
    if !fetched.succeeded() {
        warn!(attempts = fetched.attempts, "Feed unavailable; nothing to show");
    }

    for article in &fetched.value {
        let translation = match translator {
            Some(t) => Some(BriefTranslation {
                title: t.translate(&article.title).await,
                brief: t.translate(&article.description).await,
            }),
            None => None,
        };
        write_brief(out, article, translation.as_ref(), width)?;
    }
    info!(count = fetched.value.len(), "Printed briefs");
    Ok(())
}

/// Print the full content of one article, then optionally its summary.
#[instrument(level = "info", skip(client, summarizer, out))]
async fn show_article<G: TextGenerator, W: Write>(
    client: &NewsClient,
    summarizer: Option<&Summarizer<G>>,
    url: &str,
    width: usize,
    out: &mut W,
) -> Result<(), Box<dyn Error>> {
    let fetched = client.fetch_article_content(url).await;
    if !fetched.succeeded() {
        warn!(attempts = fetched.attempts, "Article unavailable; printing empty content");
    }
    let content = fetched.into_value();

    let summary = match summarizer {
        Some(s) => Some(s.summarize(&content).await?),
        None => None,
    };
    write_content(out, &content, summary.as_deref(), width)?;
    Ok(())
}

/// Summarize the first `top_k` (topic-matching) articles.
#[instrument(level = "info", skip(client, summarizer, out))]
async fn show_digest<G: TextGenerator, W: Write>(
    client: &NewsClient,
    summarizer: &Summarizer<G>,
    topic: &str,
    top_k: usize,
    width: usize,
    out: &mut W,
) -> Result<(), Box<dyn Error>> {
    let fetched = client.fetch_articles(topic).await;
    if !fetched.succeeded() {
        warn!(attempts = fetched.attempts, "Feed unavailable; nothing to summarize");
    }

    for article in fetched.value.iter().take(top_k) {
        info!(title = %article.title, "Generating summary");
        let content = match client.fetch_article_content(&article.url).await.into_result() {
            Ok(content) => content,
            Err(e) => {
                error!(title = %article.title, error = %e, "Article unavailable; skipping");
                continue;
            }
        };
        match summarizer.summarize(&content).await {
            Ok(summary) => write_digest_entry(out, article, &summary, width)?,
            Err(e) => error!(title = %article.title, error = %e, "Summary failed; skipping article"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NewsError;
    use crate::retry::RetryPolicy;
    use crate::scrapers::bloomberg::Bloomberg;
    use httpmock::{
        Method::{GET, POST},
        Mock, MockServer,
    };
    use reqwest::Client;
    use serde_json::json;
    use std::time::Duration;

    /// Answers every prompt with the same text, and refuses prompts that
    /// mention "poison".
    struct CannedGenerator;

    impl TextGenerator for CannedGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, NewsError> {
            if prompt.contains("poison") {
                return Err(NewsError::Model("model refused".to_string()));
            }
            Ok("canned summary".to_string())
        }
    }

    fn client_for(server: &MockServer) -> NewsClient {
        NewsClient::new(
            Client::new(),
            Box::new(Bloomberg),
            server.base_url(),
            RetryPolicy::new(3).with_backoff(|_| Duration::ZERO),
        )
    }

    /// Serve a feed listing one article per id, each linking to `/news/{id}`.
    fn serve_feed(server: &MockServer, ids: &[&str]) {
        let records: Vec<_> = ids
            .iter()
            .map(|id| {
                json!({
                    "source": { "id": "bloomberg", "name": "Bloomberg" },
                    "title": format!("Title {id}"),
                    "description": format!("Brief {id}"),
                    "publishedAt": "2024-03-20T18:00:00.000Z",
                    "symbols": [],
                    "url": server.url(format!("/news/{id}")),
                    "id": id
                })
            })
            .collect();
        let body = serde_json::Value::Array(records).to_string();
        server.mock(|when, then| {
            when.method(GET).path("/articles-bloomberg.json");
            then.status(200).body(body.clone());
        });
    }

    fn serve_page<'a>(server: &'a MockServer, id: &str, text: &str) -> Mock<'a> {
        let html = format!(r#"<html><body><div class="article-text">{text}</div></body></html>"#);
        server.mock(|when, then| {
            when.method(GET).path(format!("/news/{id}"));
            then.status(200).body(html.clone());
        })
    }

    fn printed(out: Vec<u8>) -> String {
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn test_digest_stops_at_top_k() {
        let server = MockServer::start();
        serve_feed(&server, &["a", "b", "c"]);
        let page_a = serve_page(&server, "a", "Body a");
        let page_b = serve_page(&server, "b", "Body b");
        let page_c = serve_page(&server, "c", "Body c");

        let mut out = Vec::new();
        let summarizer = Summarizer::new(CannedGenerator);
        show_digest(&client_for(&server), &summarizer, "", 2, 100, &mut out)
            .await
            .unwrap();
        let text = printed(out);

        page_a.assert_calls(1);
        page_b.assert_calls(1);
        page_c.assert_calls(0);
        assert!(text.contains("title: Title a"));
        assert!(text.contains("title: Title b"));
        assert!(!text.contains("Title c"));
        assert_eq!(text.matches("canned summary").count(), 2);
    }

    #[tokio::test]
    async fn test_digest_skips_article_that_never_loads() {
        let server = MockServer::start();
        serve_feed(&server, &["down", "up"]);
        let broken = server.mock(|when, then| {
            when.method(GET).path("/news/down");
            then.status(500);
        });
        serve_page(&server, "up", "Body up");

        let mut out = Vec::new();
        let summarizer = Summarizer::new(CannedGenerator);
        show_digest(&client_for(&server), &summarizer, "", 5, 100, &mut out)
            .await
            .unwrap();
        let text = printed(out);

        broken.assert_calls(3);
        assert!(!text.contains("Title down"));
        assert!(text.contains("title: Title up"));
        assert!(text.contains(&server.url("/news/up")));
    }

    #[tokio::test]
    async fn test_digest_continues_after_summary_failure() {
        let server = MockServer::start();
        serve_feed(&server, &["bad", "good"]);
        serve_page(&server, "bad", "poison pill");
        serve_page(&server, "good", "Rates were held.");

        let mut out = Vec::new();
        let summarizer = Summarizer::new(CannedGenerator);
        show_digest(&client_for(&server), &summarizer, "", 5, 100, &mut out)
            .await
            .unwrap();
        let text = printed(out);

        assert!(!text.contains("Title bad"));
        assert!(text.contains("title: Title good"));
        assert_eq!(text.matches("canned summary").count(), 1);
    }

    #[tokio::test]
    async fn test_digest_with_empty_feed_prints_nothing() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/articles-bloomberg.json");
            then.status(502);
        });

        let mut out = Vec::new();
        let summarizer = Summarizer::new(CannedGenerator);
        show_digest(&client_for(&server), &summarizer, "", 5, 100, &mut out)
            .await
            .unwrap();

        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_briefs_translate_title_and_brief() {
        let server = MockServer::start();
        serve_feed(&server, &["a", "b"]);
        let translate = server.mock(|when, then| {
            when.method(POST).path("/api/predict");
            then.status(200).json_body(json!({ "data": ["译文"] }));
        });

        let translator = Translator::new(Client::new(), server.url("/api/predict"));
        let mut out = Vec::new();
        show_briefs(&client_for(&server), Some(&translator), "", 100, &mut out)
            .await
            .unwrap();
        let text = printed(out);

        translate.assert_calls(4);
        assert_eq!(text.matches("translated title: 译文").count(), 2);
        assert_eq!(text.matches("translated brief: ").count(), 2);
        assert!(text.contains("brief: \nBrief a\n"));
    }

    #[tokio::test]
    async fn test_briefs_without_translator() {
        let server = MockServer::start();
        serve_feed(&server, &["a"]);

        let mut out = Vec::new();
        show_briefs(&client_for(&server), None, "", 100, &mut out)
            .await
            .unwrap();
        let text = printed(out);

        assert!(text.starts_with("title: Title a\nurl: "));
        assert!(!text.contains("translated"));
    }

    #[tokio::test]
    async fn test_article_without_summary() {
        let server = MockServer::start();
        serve_page(&server, "a", "Rates were held.");

        let mut out = Vec::new();
        show_article(
            &client_for(&server),
            None::<&Summarizer<CannedGenerator>>,
            &server.url("/news/a"),
            100,
            &mut out,
        )
        .await
        .unwrap();

        let rule = "-".repeat(100);
        assert_eq!(printed(out), format!("{rule}\nRates were held.\n{rule}\n"));
    }

    #[tokio::test]
    async fn test_article_with_summary() {
        let server = MockServer::start();
        serve_page(&server, "a", "Rates were held.");

        let mut out = Vec::new();
        let summarizer = Summarizer::new(CannedGenerator);
        show_article(
            &client_for(&server),
            Some(&summarizer),
            &server.url("/news/a"),
            100,
            &mut out,
        )
        .await
        .unwrap();

        let rule = "-".repeat(100);
        assert_eq!(
            printed(out),
            format!("{rule}\nRates were held.\n{rule}\ncanned summary\n{rule}\n")
        );
    }

    #[tokio::test]
    async fn test_article_summary_failure_is_returned() {
        let server = MockServer::start();
        serve_page(&server, "a", "poison pill");

        let mut out = Vec::new();
        let summarizer = Summarizer::new(CannedGenerator);
        let result = show_article(
            &client_for(&server),
            Some(&summarizer),
            &server.url("/news/a"),
            100,
            &mut out,
        )
        .await;

        assert!(result.is_err());
        assert!(out.is_empty());
    }
}
