//! NewsFilter feed client.
//!
//! NewsFilter publishes one landing-page feed per provider at
//! `https://static.newsfilter.io/landing-page/articles-{slug}.json`. A
//! [`NewsClient`] pairs that feed with one provider's scraping rules and
//! exposes two retried operations:
//!
//! - [`NewsClient::fetch_articles`]: list the feed, optionally filtered by topic
//! - [`NewsClient::fetch_article_content`]: download and scrape one article page
//!
//! Both report failures through [`Retried`] rather than an error: after the
//! last attempt the caller gets an empty value and a failed [`Status`]. The
//! `try_*` variants return the underlying `Result` for a single attempt.

use crate::error::NewsError;
use crate::filter::filter_by_topic;
use crate::models::Article;
use crate::retry::{Retried, RetryPolicy, Status, retry};
use crate::scrapers::Provider;
use crate::utils::truncate_for_log;
use reqwest::{Client, StatusCode};
use scraper::Html;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

/// Default base for the landing-page feeds.
pub const DEFAULT_FEED_BASE: &str = "https://static.newsfilter.io/landing-page";

/// Feed and article client for a single provider.
#[derive(Debug)]
pub struct NewsClient {
    http: Client,
    provider: Box<dyn Provider>,
    feed_base: String,
    policy: RetryPolicy,
}

impl NewsClient {
    /// Create a client for one provider's feed.
    ///
    /// # Arguments
    ///
    /// * `http` - Shared HTTP client, used for both the feed and article pages
    /// * `provider` - Scraping rules, usually from [`crate::scrapers::lookup`]
    /// * `feed_base` - Base URL the `articles-{slug}.json` feeds live under
    ///   (see [`DEFAULT_FEED_BASE`]); a trailing slash is ignored
    /// * `policy` - Retry policy applied to [`Self::fetch_articles`] and
    ///   [`Self::fetch_article_content`]
    pub fn new(
        http: Client,
        provider: Box<dyn Provider>,
        feed_base: impl Into<String>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            http,
            provider,
            feed_base: feed_base.into(),
            policy,
        }
    }

    /// The feed URL for this client's provider.
    pub fn feed_url(&self) -> String {
        format!(
            "{}/articles-{}.json",
            self.feed_base.trim_end_matches('/'),
            self.provider.slug()
        )
    }

    /// One attempt at listing the feed.
    #[instrument(level = "info", skip(self), fields(source = self.provider.slug()))]
    pub async fn try_fetch_articles(&self, topic: &str) -> Result<Vec<Article>, NewsError> {
        let url = self.feed_url();
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK {
            warn!(%url, status = status.as_u16(), body = %truncate_for_log(&body, 300), "Feed responded with an error");
            return Err(NewsError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let records: Vec<Value> = serde_json::from_str(&body)?;
        let total = records.len();
        let articles = decode_records(records);
        let articles = filter_by_topic(articles, topic);

        info!(total, kept = articles.len(), %topic, "Fetched NewsFilter feed");
        Ok(articles)
    }

    /// List the feed, retrying per the client's [`RetryPolicy`].
    ///
    /// # Arguments
    ///
    /// * `topic` - Whole-word, case-insensitive filter on descriptions; blank
    ///   keeps every article
    ///
    /// # Returns
    ///
    /// The matching articles in feed order. After the last failed attempt the
    /// list is empty and the status is [`Status::Err`].
    pub async fn fetch_articles(&self, topic: &str) -> Retried<Vec<Article>> {
        retry(&self.policy, "fetch_articles", move || async move {
            match self.try_fetch_articles(topic).await {
                Ok(articles) => (articles, Status::Ok),
                Err(e) => {
                    self.log_failure("NewsFilter API", &e);
                    (Vec::new(), Status::Err)
                }
            }
        })
        .await
    }

    /// One attempt at downloading and scraping an article page.
    ///
    /// A page where no content node matches yields an empty string and is
    /// still a success.
    #[instrument(level = "info", skip(self), fields(source = self.provider.slug()))]
    pub async fn try_fetch_article_content(&self, article_url: &str) -> Result<String, NewsError> {
        let url = self.provider.content_url(article_url);
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK {
            warn!(%url, status = status.as_u16(), body = %truncate_for_log(&body, 300), "Article page responded with an error");
            return Err(NewsError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let document = Html::parse_document(&body);
        match self.provider.extract_content(&document) {
            Some(content) => {
                info!(bytes = content.len(), "Parsed article");
                Ok(content)
            }
            None => {
                debug!(%url, "No content nodes matched; returning empty content");
                Ok(String::new())
            }
        }
    }

    /// Download and scrape an article page, retrying per the client's [`RetryPolicy`].
    ///
    /// # Arguments
    ///
    /// * `article_url` - The article URL as published in the feed; the
    ///   provider may rewrite it before the request
    ///
    /// # Returns
    ///
    /// The scraped text, or an empty string with [`Status::Err`] once every
    /// attempt has failed.
    pub async fn fetch_article_content(&self, article_url: &str) -> Retried<String> {
        retry(&self.policy, "fetch_article_content", move || async move {
            match self.try_fetch_article_content(article_url).await {
                Ok(content) => (content, Status::Ok),
                Err(e) => {
                    self.log_failure(self.provider.display_name(), &e);
                    (String::new(), Status::Err)
                }
            }
        })
        .await
    }

    fn log_failure(&self, target: &str, e: &NewsError) {
        match e {
            NewsError::Http(_) => {
                error!(source = self.provider.slug(), error = %e, "Unable to connect to {target}")
            }
            // Already logged with the response body.
            NewsError::Status { .. } => {}
            _ => warn!(source = self.provider.slug(), error = %e, "Unable to fetch news from {target}"),
        }
    }
}

/// Build articles from raw feed records, skipping any that fail to decode.
fn decode_records(records: Vec<Value>) -> Vec<Article> {
    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match Article::from_raw(record) {
            Ok(article) => Some(article),
            Err(e) => {
                warn!(index, error = %e, "Skipping malformed feed record");
                None
            }
        })
        .collect()
}
