//! # Photomania
//!
//! The data core of a paginated photo browser.
//!
//! ## Overview
//!
//! Photomania pages through a remote photo feed, keeps the photos it has
//! seen in a stable, de-duplicated display order, caches decoded images by
//! URL and loads grid images per reusable slot, cancelling work for slots
//! that get recycled before their image arrives.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 PhotoBrowser / PhotoViewer                  │
//! │   Own all state, apply fetch results, notify the renderer   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!          ┌───────────────────┼───────────────────┐
//!          ▼                   ▼                   ▼
//! ┌─────────────────┐ ┌─────────────────┐ ┌─────────────────┐
//! │      Feed       │ │     Images      │ │       API       │
//! │                 │ │                 │ │                 │
//! │ • Page cursor   │ │ • LRU cache     │ │ • Feed pages    │
//! │ • Fetch guard   │ │ • Request slots │ │ • Photo details │
//! │ • Unique set    │ │ • HTTP decode   │ │ • Comments      │
//! └─────────────────┘ └─────────────────┘ └─────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`api`] - Network collaborators (feed, details, images) and the 500px client
//! - [`app`] - Browser and viewer drivers
//! - [`config`] - Configuration management
//! - [`error`] - Fetch error taxonomy
//! - [`feed`] - Paging state and the ordered unique photo set
//! - [`images`] - Image cache and cancellable per-slot loading
//! - [`models`] - Data models (photo entries, records, details, comments)
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use photomania::{Config, FiveHundredPxClient, HttpImageClient, ImageCache, PhotoBrowser};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let config = Config::load()?;
//! let feed = Arc::new(FiveHundredPxClient::from_config(&config));
//! let images = Arc::new(HttpImageClient::new(config.request_timeout()));
//! let mut browser = PhotoBrowser::new(feed, images, ImageCache::new(config.image_cache_capacity));
//! browser.request_next_page();
//! # Ok(())
//! # }
//! ```

#![doc(html_root_url = "https://docs.rs/photomania/0.1.0")]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::return_self_not_must_use)]

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod feed;
pub mod images;
pub mod models;

// Re-export main types for convenience
pub use api::{FeedFetchClient, FiveHundredPxClient, ImageFetchClient, PhotoDetailClient};
pub use app::{PhotoBrowser, PhotoViewer, RenderObserver, ScrollMetrics, SlotId, ViewerObserver};
pub use config::Config;
pub use error::{FetchError, FetchResult};
pub use feed::{FeedPager, OrderedPhotoSet, PageOutcome};
pub use images::{HttpImageClient, ImageCache, RequestSlot, SlotContent};
pub use models::{Comment, ImageSize, PhotoDetail, PhotoId, PhotoRecord, RawPhotoEntry};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
