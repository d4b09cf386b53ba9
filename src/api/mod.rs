//! Network collaborators: feed pages, photo details and image downloads

pub mod five_hundred_px;

use std::future::Future;

use image::DynamicImage;

use crate::error::FetchResult;
use crate::models::{Comment, PhotoDetail, PhotoId, RawPhotoEntry};

pub use five_hundred_px::{FiveHundredPxClient, Route};

/// Fetches one page of the photo feed.
pub trait FeedFetchClient: Send + Sync + 'static {
    /// Get page `page` (1-based)
    fn fetch_page(&self, page: u32)
    -> impl Future<Output = FetchResult<Vec<RawPhotoEntry>>> + Send;
}

/// Downloads and decodes a single image.
pub trait ImageFetchClient: Send + Sync + 'static {
    /// Fetch the image at `url`
    fn fetch_image(&self, url: &str) -> impl Future<Output = FetchResult<DynamicImage>> + Send;
}

/// Fetches what the full-screen viewer shows.
pub trait PhotoDetailClient: Send + Sync + 'static {
    /// Get details for one photo
    fn photo_detail(&self, id: PhotoId) -> impl Future<Output = FetchResult<PhotoDetail>> + Send;

    /// Get one page of a photo's comments
    fn comments(
        &self,
        id: PhotoId,
        page: u32,
    ) -> impl Future<Output = FetchResult<Vec<Comment>>> + Send;
}
