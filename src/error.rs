//! Error types and partial-failure results.

use serde::Serialize;
use thiserror::Error;

/// Errors raised while fetching a page of license assignments.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Always built from `reqwest::Error::without_url`; request URLs stay out of reports.
    #[error("HTTP request failed: {0}")]
    Http(reqwest::Error),

    #[error("Licensing API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Access token not available: {0}")]
    MissingToken(String),

    #[error("{0}")]
    Other(String),
}

/// Errors raised while delivering a payload to one destination.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// Always built from `reqwest::Error::without_url`; request URLs stay out of reports.
    #[error("HTTP request failed: {0}")]
    Http(reqwest::Error),

    #[error("Webhook returned {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// A product whose pagination stopped early.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchFailure {
    pub product_id: String,
    /// Zero-based index of the page that failed.
    pub page: usize,
    pub message: String,
}

/// A destination that did not accept the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryFailure {
    pub destination: String,
    pub message: String,
}

/// Whatever data could be gathered, plus the failures met along the way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartialResult<T, F> {
    pub data: T,
    pub failures: Vec<F>,
}

impl<T, F> PartialResult<T, F> {
    pub fn new(data: T, failures: Vec<F>) -> Self {
        Self { data, failures }
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}
