//! Reuters article scraper.
//!
//! `www.reuters.com` blocks plain HTTP clients, so article pages are fetched
//! from the `neuters.de` mirror, which serves the same paths as minimal HTML.
//! The body is every `<p>` on the page, one paragraph per line.

use super::{Provider, element_text};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

const REUTERS_HOST: &str = "www.reuters.com";
const MIRROR_HOST: &str = "neuters.de";

static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());

#[derive(Debug, Clone, Copy, Default)]
pub struct Reuters;

impl Provider for Reuters {
    fn slug(&self) -> &'static str {
        "reuters"
    }

    fn display_name(&self) -> &'static str {
        "Reuters"
    }

    fn content_url(&self, article_url: &str) -> String {
        let Ok(mut url) = Url::parse(article_url) else {
            return article_url.to_string();
        };
        if url.host_str() != Some(REUTERS_HOST) {
            return article_url.to_string();
        }
        match url.set_host(Some(MIRROR_HOST)) {
            Ok(()) => {
                debug!(from = %article_url, to = %url, "Rewrote Reuters URL to mirror");
                url.to_string()
            }
            Err(_) => article_url.to_string(),
        }
    }

    fn extract_content(&self, document: &Html) -> Option<String> {
        let paragraphs: Vec<String> = document.select(&PARAGRAPH).map(element_text).collect();
        if paragraphs.is_empty() {
            None
        } else {
            Some(paragraphs.join("\n"))
        }
    }
}
