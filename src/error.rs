//! Error types shared across the client.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yml::Error),
}

/// Failure of a single call to the Sereno backend.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("server returned status {0}")]
    Status(StatusCode),
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The only failure the prompt loader knows about. It is absorbed into the
/// fallback list and only ever logged.
#[derive(Debug, Error)]
pub enum PromptSourceUnavailable {
    #[error("prompt source unavailable: {0}")]
    Api(#[from] ApiError),
    #[error("prompt source unavailable: server returned an empty list")]
    Empty,
}

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("failed to open clipboard: {0}")]
    Open(String),
    #[error("failed to set clipboard: {0}")]
    Write(String),
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("failed to open audio output: {0}")]
    Output(String),
}
