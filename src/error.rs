//! Typed failures raised by the client layers.
//!
//! Command handlers return `anyhow::Result`; these types stay recognisable
//! through it so `main` can pick the exit code and whether to show usage.

use thiserror::Error;

/// Missing or invalid connection settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unauthenticated. Please fill out Env vars or place a configuration file at ~/.oha (missing {missing})")]
    NotConfigured { missing: String },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Failure exchanging credentials for a token.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The server's own message is never surfaced.
    #[error("username or password is incorrect")]
    InvalidCredentials,
    #[error("login response did not contain a token")]
    MissingToken,
    #[error("login response was not valid JSON: {0}")]
    MalformedResponse(#[source] serde_json::Error),
}

/// A positional argument failed its character-set check.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid Number Input: {0}")]
    Number(String),
    #[error("Filename contained invalid characters: {0}")]
    FileName(String),
    #[error("file not found: {0}")]
    FileMissing(String),
    #[error("Query string contains invalid characters: {0}")]
    QueryString(String),
    #[error("list name must not be empty")]
    EmptyListName,
}

/// Network-level failure talking to the server.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to read response from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// A required positional argument was not given; the caller prints usage.
#[derive(Debug, Error)]
#[error("missing argument for '{command}'")]
pub struct UsageRequested {
    pub command: &'static str,
}
