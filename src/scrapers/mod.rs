//! Per-provider scraping rules and the source registry.
//!
//! Every provider shares the same NewsFilter feed endpoint (see
//! [`crate::newsfilter`]); what differs is the feed slug, how the article URL
//! is reached, and which HTML nodes carry the article body.
//!
//! # Supported Sources
//!
//! | Source | Module | Content nodes | Notes |
//! |--------|--------|---------------|-------|
//! | Bloomberg | [`bloomberg`] | first `.article-text` | |
//! | Reuters | [`reuters`] | every `<p>` | fetched through the `neuters.de` mirror |
//!
//! # Registry
//!
//! [`SOURCES`] is a static table from CLI name to constructor. Adding a
//! provider means adding a module and one row.

use crate::error::NewsError;
use scraper::{ElementRef, Html};
use std::fmt;

pub mod bloomberg;
pub mod reuters;

/// Scraping rules for one news provider.
pub trait Provider: fmt::Debug + Send + Sync {
    /// Feed slug, as in `articles-{slug}.json`.
    fn slug(&self) -> &'static str;

    /// Human-readable provider name for log lines.
    fn display_name(&self) -> &'static str;

    /// The URL to actually request for an article.
    ///
    /// Defaults to the feed URL unchanged.
    fn content_url(&self, article_url: &str) -> String {
        article_url.to_string()
    }

    /// Pull the article body out of a parsed page.
    ///
    /// Returns `None` when no content node matched.
    fn extract_content(&self, document: &Html) -> Option<String>;
}

/// Constructor for a registered provider.
pub type ProviderFactory = fn() -> Box<dyn Provider>;

/// Every source the CLI can select, keyed by its `--source` name.
pub static SOURCES: &[(&str, ProviderFactory)] = &[
    ("bloomberg", || Box::new(bloomberg::Bloomberg) as Box<dyn Provider>),
    ("reuters", || Box::new(reuters::Reuters) as Box<dyn Provider>),
];

/// Names of all registered sources, in registry order.
pub fn source_names() -> Vec<&'static str> {
    SOURCES.iter().map(|(name, _)| *name).collect()
}

/// Build the provider registered as `name` (case-insensitive).
///
/// # Errors
///
/// [`NewsError::UnknownSource`], listing every registered name, when nothing
/// is registered under `name`.
pub fn lookup(name: &str) -> Result<Box<dyn Provider>, NewsError> {
    SOURCES
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name.trim()))
        .map(|(_, factory)| factory())
        .ok_or_else(|| NewsError::UnknownSource {
            name: name.to_string(),
            known: source_names().join(", "),
        })
}

/// Concatenate every text node below `element`.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}
