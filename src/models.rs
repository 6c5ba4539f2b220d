//! Data models for NewsFilter feed records.
//!
//! The landing-page feeds publish a JSON array of article records:
//!
//! ```json
//! {
//!   "source": { "id": "bloomberg", "name": "Bloomberg" },
//!   "title": "...",
//!   "description": "...",
//!   "publishedAt": "2024-03-01T12:00:00.000Z",
//!   "symbols": ["AAPL"],
//!   "url": "https://www.bloomberg.com/news/...",
//!   "id": "..."
//! }
//! ```
//!
//! Field names follow the feed's camelCase schema through serde renames.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The provider an article was published by.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Source {
    pub id: String,
    pub name: String,
}

/// A single entry from a NewsFilter feed.
///
/// Built once per feed record with [`Article::from_raw`] and never mutated
/// afterwards.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// The provider, rehydrated from the nested `source` mapping.
    pub source: Source,
    pub title: String,
    /// The brief shown in listings; also the only field the topic filter inspects.
    pub description: String,
    pub published_at: DateTime<FixedOffset>,
    /// Ticker symbols tagged by the feed, in feed order.
    pub symbols: Vec<String>,
    pub url: String,
    pub id: String,
}

impl Article {
    /// Build an article from one raw feed record.
    ///
    /// The record must carry a `source` object with string `id` and `name`;
    /// all other fields pass through as published.
    pub fn from_raw(record: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(record)
    }
}
