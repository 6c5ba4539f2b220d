//! Command-line interface definitions.
//!
//! Options can be passed as flags; the config path and API key can also come
//! from the environment.

use clap::Parser;
use std::path::PathBuf;

/// Get the latest news from Bloomberg or Reuters via NewsFilter.
///
/// # Examples
///
/// ```sh
/// # Briefs for every Bloomberg article mentioning the Fed
/// newsfilter_brief -t fed
///
/// # Reuters briefs with translated titles and descriptions
/// newsfilter_brief -s reuters --translate
///
/// # Full text of one article, summarized by the configured model
/// newsfilter_brief -s reuters -l https://www.reuters.com/markets/... --summary
///
/// # Summaries of the first five matching articles
/// newsfilter_brief -t oil --summary --top-k 5
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Your topic of interest; matched as a whole word in each brief
    #[arg(short, long, default_value = "")]
    pub topic: String,

    /// News source (bloomberg, reuters)
    #[arg(short, long, default_value = "bloomberg")]
    pub source: String,

    /// Article URL, to print its whole content
    #[arg(short = 'l', long)]
    pub url: Option<String>,

    /// Summarize with the configured language model
    #[arg(long)]
    pub summary: bool,

    /// Translate titles and briefs
    #[arg(long)]
    pub translate: bool,

    /// Number of articles to summarize when --summary is given without --url
    #[arg(long, default_value_t = 3)]
    pub top_k: usize,

    /// Maximum characters per printed line (overrides the config file)
    #[arg(short, long)]
    pub width: Option<usize>,

    /// Path to a YAML config file
    #[arg(short, long, env = "NEWSFILTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// API key for the openai model backend
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["newsfilter_brief"]);

        assert_eq!(cli.topic, "");
        assert_eq!(cli.source, "bloomberg");
        assert!(cli.url.is_none());
        assert!(!cli.summary);
        assert!(!cli.translate);
        assert_eq!(cli.top_k, 3);
        assert!(cli.width.is_none());
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "newsfilter_brief",
            "-t",
            "fed",
            "-s",
            "reuters",
            "-l",
            "https://www.reuters.com/markets/x",
            "-w",
            "80",
        ]);

        assert_eq!(cli.topic, "fed");
        assert_eq!(cli.source, "reuters");
        assert_eq!(cli.url.as_deref(), Some("https://www.reuters.com/markets/x"));
        assert_eq!(cli.width, Some(80));
    }

    #[test]
    fn test_cli_long_flags() {
        let cli = Cli::parse_from([
            "newsfilter_brief",
            "--topic",
            "oil",
            "--summary",
            "--translate",
            "--top-k",
            "5",
            "--config",
            "/etc/newsfilter.yaml",
        ]);

        assert_eq!(cli.topic, "oil");
        assert!(cli.summary);
        assert!(cli.translate);
        assert_eq!(cli.top_k, 5);
        assert_eq!(cli.config, Some(PathBuf::from("/etc/newsfilter.yaml")));
    }
}
