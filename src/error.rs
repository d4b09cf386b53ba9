//! Error types for feed and image fetches

use thiserror::Error;

/// Failure of a page, detail or image fetch.
///
/// Fetch errors are absorbed at the component boundary (pager, slots,
/// drivers) and reported as tagged outcomes, never as panics.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network or transport failure, including unreadable response bodies
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server answered with a non-2xx status
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    /// Response was not of the expected content type
    #[error("unexpected content type: {0}")]
    ContentType(String),

    /// Response body was not a decodable image
    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),

    /// The request was superseded or aborted
    #[error("request cancelled")]
    Cancelled,
}

impl FetchError {
    /// Whether this is the expected outcome of a reassignment rather than a
    /// real failure.
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Result alias for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;
