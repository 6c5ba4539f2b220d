//! Topic filtering for feed listings.
//!
//! A topic matches an article when it appears as a whole word anywhere in the
//! article's description, ignoring case. Titles and symbols are not consulted.

use crate::models::Article;
use regex::{Regex, RegexBuilder};

#[derive(Debug, Clone)]
pub struct TopicFilter {
    pattern: Regex,
}

impl TopicFilter {
    /// Compile a filter for `topic`, or `None` when the topic is blank.
    ///
    /// The topic is matched literally; regex metacharacters are escaped.
    pub fn new(topic: &str) -> Option<Self> {
        let topic = topic.trim();
        if topic.is_empty() {
            return None;
        }
        let pattern = RegexBuilder::new(&format!(r"\b{}\b", regex::escape(topic)))
            .case_insensitive(true)
            .build()
            .ok()?;
        Some(Self { pattern })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    pub fn matches(&self, article: &Article) -> bool {
        self.is_match(&article.description)
    }
}

/// Keep the articles whose description mentions `topic`; a blank topic keeps everything.
pub fn filter_by_topic(articles: Vec<Article>, topic: &str) -> Vec<Article> {
    match TopicFilter::new(topic) {
        Some(filter) => articles.into_iter().filter(|a| filter.matches(a)).collect(),
        None => articles,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Source;
    use chrono::DateTime;

    fn article(title: &str, description: &str) -> Article {
        Article {
            source: Source {
                id: "bloomberg".to_string(),
                name: "Bloomberg".to_string(),
            },
            title: title.to_string(),
            description: description.to_string(),
            published_at: DateTime::parse_from_rfc3339("2024-03-01T12:00:00Z").unwrap(),
            symbols: vec![],
            url: "https://www.bloomberg.com/news/articles/x".to_string(),
            id: title.to_string(),
        }
    }

    #[test]
    fn test_whole_word_case_insensitive() {
        let filter = TopicFilter::new("fed").unwrap();
        assert!(filter.is_match("The Fed raised rates"));
        assert!(filter.is_match("FED officials met."));
        assert!(!filter.is_match("federal budget talks"));
        assert!(!filter.is_match("a confederate monument"));
    }

    #[test]
    fn test_blank_topic_is_no_filter() {
        assert!(TopicFilter::new("").is_none());
        assert!(TopicFilter::new("   ").is_none());
    }

    #[test]
    fn test_metacharacters_are_literal() {
        let filter = TopicFilter::new("S&P").unwrap();
        assert!(filter.is_match("The S&P 500 closed higher"));

        let filter = TopicFilter::new("a.b").unwrap();
        assert!(!filter.is_match("axb"));
    }

    #[test]
    fn test_filter_checks_description_only() {
        let articles = vec![
            article("Fed holds", "Rates unchanged"),
            article("Markets", "The Fed signalled cuts"),
            article("Budget", "Federal spending rises"),
        ];

        let kept = filter_by_topic(articles, "fed");
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].title, "Markets");
    }

    #[test]
    fn test_filter_blank_keeps_all() {
        let articles = vec![article("a", "x"), article("b", "y")];
        assert_eq!(filter_by_topic(articles, "").len(), 2);
    }
}
