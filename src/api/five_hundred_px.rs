//! 500px API client

use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::error::{FetchError, FetchResult};
use crate::models::{Comment, ImageSize, PhotoDetail, PhotoId, RawPhotoEntry};

use super::{FeedFetchClient, PhotoDetailClient};

/// Endpoints used by the browser and the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    /// A page of the featured photo stream
    Photos {
        /// Stream name, e.g. "popular"
        feature: &'a str,
        /// Photos per page
        per_page: u32,
        /// Thumbnail size
        size: ImageSize,
        /// Page number (1-based)
        page: u32,
    },
    /// One photo at a given size
    PhotoInfo {
        /// Photo id
        id: PhotoId,
        /// Image size
        size: ImageSize,
    },
    /// A page of a photo's comments
    Comments {
        /// Photo id
        id: PhotoId,
        /// Page number (1-based)
        page: u32,
    },
}

impl Route<'_> {
    /// Path and query, without the consumer key
    pub fn path(&self) -> String {
        match self {
            Route::Photos {
                feature,
                per_page,
                size,
                page,
            } => format!(
                "/photos?feature={}&rpp={}&image_size={}&page={}",
                urlencoding::encode(feature),
                per_page,
                size.code(),
                page
            ),
            Route::PhotoInfo { id, size } => {
                format!("/photos/{}?image_size={}", id, size.code())
            }
            Route::Comments { id, page } => format!("/photos/{id}/comments?page={page}"),
        }
    }
}

/// 500px API client
#[derive(Debug, Clone)]
pub struct FiveHundredPxClient {
    client: Client,
    base_url: String,
    consumer_key: String,
    feature: String,
    per_page: u32,
    thumbnail_size: ImageSize,
    viewer_size: ImageSize,
}

impl FiveHundredPxClient {
    /// Create a client with default paging settings
    pub fn new(base_url: &str, consumer_key: &str) -> Self {
        Self::from_config(&Config {
            api_base_url: base_url.to_string(),
            consumer_key: consumer_key.to_string(),
            ..Config::default()
        })
    }

    /// Create a client from configuration
    pub fn from_config(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("photomania/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            consumer_key: config.consumer_key.clone(),
            feature: config.feature.clone(),
            per_page: config.photos_per_page,
            thumbnail_size: config.thumbnail_size,
            viewer_size: config.viewer_size,
        }
    }

    /// Build the full URL for a route
    pub fn url(&self, route: Route<'_>) -> String {
        let path = route.path();
        let separator = if path.contains('?') { '&' } else { '?' };
        format!(
            "{}{}{}consumer_key={}",
            self.base_url,
            path,
            separator,
            urlencoding::encode(&self.consumer_key)
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, route: Route<'_>) -> FetchResult<T> {
        let url = self.url(route);
        tracing::debug!("GET {}", route.path());

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        Ok(response.json().await?)
    }
}

impl FeedFetchClient for FiveHundredPxClient {
    async fn fetch_page(&self, page: u32) -> FetchResult<Vec<RawPhotoEntry>> {
        let body: PhotosResponse = self
            .get_json(Route::Photos {
                feature: &self.feature,
                per_page: self.per_page,
                size: self.thumbnail_size,
                page,
            })
            .await?;
        Ok(body.photos)
    }
}

impl PhotoDetailClient for FiveHundredPxClient {
    async fn photo_detail(&self, id: PhotoId) -> FetchResult<PhotoDetail> {
        let body: PhotoResponse = self
            .get_json(Route::PhotoInfo {
                id,
                size: self.viewer_size,
            })
            .await?;
        Ok(body.photo)
    }

    async fn comments(&self, id: PhotoId, page: u32) -> FetchResult<Vec<Comment>> {
        let body: CommentsResponse = self.get_json(Route::Comments { id, page }).await?;
        Ok(body.comments)
    }
}

// ==================== API Types ====================

#[derive(Debug, Deserialize)]
struct PhotosResponse {
    #[serde(default)]
    photos: Vec<RawPhotoEntry>,
}

#[derive(Debug, Deserialize)]
struct PhotoResponse {
    photo: PhotoDetail,
}

#[derive(Debug, Deserialize)]
struct CommentsResponse {
    #[serde(default)]
    comments: Vec<Comment>,
}
