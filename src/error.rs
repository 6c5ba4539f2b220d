//! Error type shared by the feed client, scrapers, and model backends.

use thiserror::Error;

/// The primary error type for all fallible operations in this crate.
#[derive(Debug, Error)]
pub enum NewsError {
    /// The HTTP layer failed before a response was received.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with something other than `200 OK`.
    #[error("Unexpected response status: {status} at {url}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The URL that returned the error.
        url: String,
    },

    /// A response body or feed record could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration file could not be decoded.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The text-generation backend failed or returned an unusable payload.
    #[error("Model error: {0}")]
    Model(String),

    /// The configuration is well-formed YAML but semantically invalid.
    #[error("Config error: {0}")]
    Config(String),

    /// No source is registered under the requested name.
    #[error("{name} is not implemented (known sources: {known})")]
    UnknownSource {
        /// The name that was looked up.
        name: String,
        /// Comma-separated list of registered names.
        known: String,
    },

    /// Every attempt of a retried operation reported failure.
    #[error("operation failed after {attempts} attempts")]
    RetriesExhausted {
        /// Number of attempts made.
        attempts: usize,
    },
}
