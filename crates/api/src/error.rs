use reqwest::StatusCode;
use thiserror::Error;

/// Failures talking to the SOAR backend.
///
/// The `Display` text is surfaced to tool callers inside failure records, so
/// it never includes request headers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid SOAR base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("app key contains characters that are not valid in an HTTP header")]
    InvalidAppKey,

    #[error("invalid request URL '{url}': {reason}")]
    InvalidRequestUrl { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("request to '{url}' failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP status {status} for url '{url}'")]
    Status { status: StatusCode, url: String, body: String },

    #[error("invalid JSON response from '{url}': {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected response shape from '{url}': {reason}")]
    UnexpectedShape { url: String, reason: String },
}
