use thiserror::Error;

use crate::cache::CacheError;

/// A failed attempt to get fresh data from the feed.
///
/// These never reach the UI directly: the feed client answers them with the
/// cached entry when one exists.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("USGS API error: status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Failed to update cache: {0}")]
    CacheWrite(#[from] CacheError),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl FeedError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        FeedError::Status {
            status: status.as_u16(),
            body: Self::truncate_body(body),
        }
    }
}

/// The feed could not be reached and there is no cached data to fall back on.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Feed unavailable and no cached data: {0}")]
    Unavailable(#[source] FeedError),
}
