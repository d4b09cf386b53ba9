//! HTTP image download and decoding.

use std::time::Duration;

use image::DynamicImage;
use reqwest::header::CONTENT_TYPE;

use crate::api::ImageFetchClient;
use crate::error::{FetchError, FetchResult};

/// Longest edge kept after decoding
const MAX_DIMENSION: u32 = 1600;

/// Downloads images over HTTP and decodes them in memory.
#[derive(Debug, Clone)]
pub struct HttpImageClient {
    client: reqwest::Client,
}

impl Default for HttpImageClient {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

impl HttpImageClient {
    /// Create a client with a per-request timeout.
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("photomania/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();
        Self { client }
    }
}

impl ImageFetchClient for HttpImageClient {
    async fn fetch_image(&self, url: &str) -> FetchResult<DynamicImage> {
        tracing::debug!("Downloading image: {url}");

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        validate_content_type(content_type.as_deref())?;

        let bytes = response.bytes().await?;
        let image = image::load_from_memory(&bytes)?;
        Ok(resize_if_needed(image))
    }
}

/// Accept only `image/*` responses.
fn validate_content_type(content_type: Option<&str>) -> FetchResult<()> {
    match content_type {
        Some(value) if value.trim().to_ascii_lowercase().starts_with("image/") => Ok(()),
        Some(value) => Err(FetchError::ContentType(value.to_string())),
        None => Err(FetchError::ContentType("missing".to_string())),
    }
}

/// Resize image if it's too large (to save memory and rendering time).
fn resize_if_needed(image: DynamicImage) -> DynamicImage {
    let (width, height) = (image.width(), image.height());

    if width <= MAX_DIMENSION && height <= MAX_DIMENSION {
        return image;
    }

    // Keep the aspect ratio
    let ratio = f64::from(width) / f64::from(height);
    let (new_width, new_height) = if width > height {
        (MAX_DIMENSION, (f64::from(MAX_DIMENSION) / ratio) as u32)
    } else {
        ((f64::from(MAX_DIMENSION) * ratio) as u32, MAX_DIMENSION)
    };

    image.resize(new_width, new_height, image::imageops::FilterType::Triangle)
}
