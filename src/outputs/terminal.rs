//! Plain-text terminal views.
//!
//! Long text is wrapped by slicing it into fixed-width lines, counted in
//! characters so CJK translations are never split inside a code point. Views
//! write to any [`Write`] so they can be captured in tests.

use crate::models::Article;
use itertools::Itertools;
use std::io::{self, Write};

pub const DEFAULT_WIDTH: usize = 100;

/// Separator printed after each brief.
const BRIEF_RULE: usize = 30;
/// Separator around full article content and summaries.
const CONTENT_RULE: usize = 100;

/// Slice `text` into lines of at most `width` characters.
///
/// # Arguments
///
/// * `text` - The text to wrap; newlines inside it are not treated specially
/// * `width` - Maximum characters per line. 0 disables wrapping
///
/// # Returns
///
/// The lines in order. Empty text still yields a single (empty) line.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(chunk_lines("abcde", 2), vec!["ab", "cd", "e"]);
/// ```
pub fn chunk_lines(text: &str, width: usize) -> Vec<String> {
    if text.is_empty() || width == 0 {
        return vec![text.to_string()];
    }
    let chunks = text.chars().chunks(width);
    chunks.into_iter().map(|chunk| chunk.collect()).collect()
}

/// Print `text` in slices of `width` characters.
pub fn text_output<W: Write>(out: &mut W, text: &str, width: usize) -> io::Result<()> {
    for line in chunk_lines(text, width) {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn rule<W: Write>(out: &mut W, len: usize) -> io::Result<()> {
    writeln!(out, "{}", "-".repeat(len))
}

/// Translated title and description for a brief.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BriefTranslation {
    pub title: String,
    pub brief: String,
}

/// Print the title/url/description view of one article.
pub fn write_brief<W: Write>(
    out: &mut W,
    article: &Article,
    translation: Option<&BriefTranslation>,
    width: usize,
) -> io::Result<()> {
    writeln!(out, "title: {}", article.title)?;
    if let Some(t) = translation {
        writeln!(out, "translated title: {}", t.title)?;
    }
    writeln!(out, "url: {}", article.url)?;
    writeln!(out, "brief: ")?;
    text_output(out, &article.description, width)?;
    if let Some(t) = translation {
        writeln!(out, "translated brief: ")?;
        text_output(out, &t.brief, width)?;
    }
    rule(out, BRIEF_RULE)
}

/// Print full article content framed by rules, followed by an optional summary.
pub fn write_content<W: Write>(
    out: &mut W,
    content: &str,
    summary: Option<&str>,
    width: usize,
) -> io::Result<()> {
    rule(out, CONTENT_RULE)?;
    text_output(out, content, width)?;
    rule(out, CONTENT_RULE)?;
    if let Some(summary) = summary {
        text_output(out, summary, width)?;
        rule(out, CONTENT_RULE)?;
    }
    Ok(())
}

/// Print one digest entry: the article title and its summary.
pub fn write_digest_entry<W: Write>(
    out: &mut W,
    article: &Article,
    summary: &str,
    width: usize,
) -> io::Result<()> {
    writeln!(out, "title: {}", article.title)?;
    writeln!(out, "url: {}", article.url)?;
    text_output(out, summary, width)?;
    rule(out, CONTENT_RULE)
}
