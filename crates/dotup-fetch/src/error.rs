use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request for {url} failed: {message}")]
    Network { url: String, message: String },

    #[error("digest mismatch for {url}: expected {expected}, got {actual}")]
    DigestMismatch {
        url: String,
        expected: String,
        actual: String,
    },

    #[error("malformed release feed: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("fetch of {url} cancelled")]
    Cancelled { url: String },

    #[error("verification task failed: {0}")]
    TaskJoin(String),
}

impl FetchError {
    pub(crate) fn network(url: &str, error: impl std::fmt::Display) -> Self {
        FetchError::Network {
            url: url.to_string(),
            message: error.to_string(),
        }
    }

    pub(crate) fn cancelled(url: &str) -> Self {
        FetchError::Cancelled {
            url: url.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
