//! Errors raised while talking to the content API.

use reqwest::StatusCode;
use thiserror::Error;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport-level failure (DNS, TLS, timeout, connection reset).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned {status}")]
    Status { url: String, status: StatusCode },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("response from {url} exceeds {limit} bytes")]
    TooLarge { url: String, limit: usize },

    #[error("invalid API URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Story not found.")]
    StoryNotFound,

    #[error("Category not found for section: {0}")]
    UnknownSection(String),
}

impl ApiError {
    pub fn decode(url: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            url: url.into(),
            source,
        }
    }
}
