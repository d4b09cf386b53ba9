//! Async operations for the browser and viewer
//!
//! Fetches run as spawned tokio tasks. Their results travel back over an
//! unbounded channel and are applied by whoever owns the state, on that
//! owner's own context.

use std::sync::Arc;

use image::DynamicImage;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

use crate::api::{FeedFetchClient, ImageFetchClient, PhotoDetailClient};
use crate::error::FetchResult;
use crate::feed::PageTicket;
use crate::images::RequestId;
use crate::models::{Comment, PhotoDetail, PhotoId, RawPhotoEntry};

use super::SlotId;

/// Results delivered to a [`PhotoBrowser`](super::PhotoBrowser)
#[derive(Debug)]
pub enum BrowserResult {
    /// A feed page finished
    PageFetched {
        ticket: PageTicket,
        result: FetchResult<Vec<RawPhotoEntry>>,
    },
    /// A grid image finished
    ImageFetched {
        slot: SlotId,
        request: RequestId,
        url: String,
        result: FetchResult<DynamicImage>,
    },
}

/// Which viewer slot an image belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerTarget {
    /// The full-size photo
    Photo,
    /// Avatar of the comment at this row
    Avatar(usize),
}

/// Counts [`PhotoViewer::open`](super::PhotoViewer::open) calls; results
/// from an earlier opening are dropped even when the photo id is the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewSession(u64);

impl ViewSession {
    /// The session after this one
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Results delivered to a [`PhotoViewer`](super::PhotoViewer)
#[derive(Debug)]
pub enum ViewerResult {
    /// Photo details finished
    DetailFetched {
        session: ViewSession,
        photo_id: PhotoId,
        result: FetchResult<PhotoDetail>,
    },
    /// Comments finished
    CommentsFetched {
        session: ViewSession,
        photo_id: PhotoId,
        result: FetchResult<Vec<Comment>>,
    },
    /// An image finished
    ImageFetched {
        session: ViewSession,
        target: ViewerTarget,
        request: RequestId,
        url: String,
        result: FetchResult<DynamicImage>,
    },
}

/// Fetch one feed page in the background.
pub fn spawn_page_fetch<F: FeedFetchClient>(
    client: Arc<F>,
    ticket: PageTicket,
    result_tx: mpsc::UnboundedSender<BrowserResult>,
) {
    tokio::spawn(async move {
        let result = client.fetch_page(ticket.page).await;
        let _ = result_tx.send(BrowserResult::PageFetched { ticket, result });
    });
}

/// Download one image in the background, wrapping the outcome with `wrap`.
pub fn spawn_image_fetch<I, T, W>(
    client: Arc<I>,
    url: String,
    result_tx: mpsc::UnboundedSender<T>,
    wrap: W,
) -> AbortHandle
where
    I: ImageFetchClient,
    T: Send + 'static,
    W: FnOnce(String, FetchResult<DynamicImage>) -> T + Send + 'static,
{
    tokio::spawn(async move {
        let result = client.fetch_image(&url).await;
        let _ = result_tx.send(wrap(url, result));
    })
    .abort_handle()
}

/// Fetch photo details in the background.
pub fn spawn_detail_fetch<D: PhotoDetailClient>(
    client: Arc<D>,
    session: ViewSession,
    photo_id: PhotoId,
    result_tx: mpsc::UnboundedSender<ViewerResult>,
) -> AbortHandle {
    tokio::spawn(async move {
        let result = client.photo_detail(photo_id).await;
        let _ = result_tx.send(ViewerResult::DetailFetched {
            session,
            photo_id,
            result,
        });
    })
    .abort_handle()
}

/// Fetch the first page of comments in the background.
pub fn spawn_comments_fetch<D: PhotoDetailClient>(
    client: Arc<D>,
    session: ViewSession,
    photo_id: PhotoId,
    result_tx: mpsc::UnboundedSender<ViewerResult>,
) -> AbortHandle {
    tokio::spawn(async move {
        let result = client.comments(photo_id, 1).await;
        let _ = result_tx.send(ViewerResult::CommentsFetched {
            session,
            photo_id,
            result,
        });
    })
    .abort_handle()
}
