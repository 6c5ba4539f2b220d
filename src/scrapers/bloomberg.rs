//! Bloomberg article scraper.
//!
//! Bloomberg pages carry the story body in a single element with the
//! `article-text` class; only the first such element is used.

use super::{Provider, element_text};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

static ARTICLE_TEXT: Lazy<Selector> = Lazy::new(|| Selector::parse(".article-text").unwrap());

#[derive(Debug, Clone, Copy, Default)]
pub struct Bloomberg;

impl Provider for Bloomberg {
    fn slug(&self) -> &'static str {
        "bloomberg"
    }

    fn display_name(&self) -> &'static str {
        "Bloomberg"
    }

    fn extract_content(&self, document: &Html) -> Option<String> {
        document.select(&ARTICLE_TEXT).next().map(element_text)
    }
}
