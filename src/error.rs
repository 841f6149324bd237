//! Failure kinds for the data-acquisition layer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected HTTP status: {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error("invalid response shape: {0}")]
    Validation(String),

    /// Terminal failure: the live fetch failed and no previously successful
    /// data exists to fall back on.
    #[error("no spot price available: fetch failed and nothing is cached")]
    NoDataAvailable,
}
