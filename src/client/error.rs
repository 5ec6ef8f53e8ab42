//! Line-count client error types.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// No server URL has been saved in the settings panel.
    #[error("No counting server configured")]
    Unconfigured,

    /// The configured server URL cannot be parsed.
    #[error("Invalid server URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Transport failure or an unreadable body.
    #[error("Request to counting server failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Counting server returned HTTP {0}")]
    Status(StatusCode),

    /// The server answered `success: false`.
    #[error("Counting server rejected the request: {0}")]
    Rejected(String),
}
