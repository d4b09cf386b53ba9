//! Binding between a reusable display slot and its in-flight image fetch

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use image::DynamicImage;
use tokio::task::AbortHandle;

use super::ImageCache;
use crate::error::FetchError;

static NEXT_REQUEST: AtomicU64 = AtomicU64::new(1);

/// Identity of one image request.
///
/// Ids are unique for the life of the process, so a slot that is dropped
/// and rebuilt never hands out an id an older request already carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(u64);

impl RequestId {
    fn next() -> Self {
        Self(NEXT_REQUEST.fetch_add(1, Ordering::Relaxed))
    }
}

/// What a slot currently displays
#[derive(Debug, Clone, Default)]
pub enum SlotContent {
    /// Nothing bound, or waiting for a fetch
    #[default]
    Blank,
    /// A decoded image
    Image(Arc<DynamicImage>),
    /// The last fetch failed; the slot stays blank
    Failed,
}

impl SlotContent {
    /// Displayed image, if any
    pub const fn image(&self) -> Option<&Arc<DynamicImage>> {
        match self {
            Self::Image(image) => Some(image),
            _ => None,
        }
    }
}

/// How a reassignment was satisfied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    /// Served from the cache, no fetch issued
    Cached,
    /// A fetch was issued under this request id
    Fetching(RequestId),
}

#[derive(Debug)]
struct ActiveRequest {
    id: RequestId,
    handle: Option<AbortHandle>,
}

/// A reusable display slot (grid cell, avatar, viewer) and the one fetch it
/// may have in flight.
///
/// Reassigning the slot cancels its previous fetch first. A completion is
/// applied only if it carries the id of the request the slot is still
/// waiting on, so a late or superseded result never reaches the display.
#[derive(Debug, Default)]
pub struct RequestSlot {
    url: Option<String>,
    content: SlotContent,
    active: Option<ActiveRequest>,
}

impl RequestSlot {
    /// Create an empty slot
    pub fn new() -> Self {
        Self::default()
    }

    /// URL the slot currently represents
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// What the slot displays
    pub const fn content(&self) -> &SlotContent {
        &self.content
    }

    /// Id of the fetch the slot is waiting on
    pub fn pending(&self) -> Option<RequestId> {
        self.active.as_ref().map(|a| a.id)
    }

    /// Rebind the slot to `url`.
    ///
    /// Any fetch already attached is cancelled before anything else happens.
    /// On a cache hit the image is shown at once; otherwise the slot is
    /// blanked and `fetch` is called with a fresh request id to start the
    /// download, returning a handle used to abort it later.
    pub fn assign<F>(&mut self, url: &str, cache: &ImageCache, fetch: F) -> Assignment
    where
        F: FnOnce(RequestId) -> Option<AbortHandle>,
    {
        self.cancel();
        self.url = Some(url.to_string());

        if let Some(image) = cache.get(url) {
            self.content = SlotContent::Image(image);
            return Assignment::Cached;
        }

        self.content = SlotContent::Blank;
        let id = RequestId::next();
        let handle = fetch(id);
        self.active = Some(ActiveRequest { id, handle });
        Assignment::Fetching(id)
    }

    /// Apply a finished fetch.
    ///
    /// Returns `true` if the display changed. Results for any other request
    /// id are dropped silently, as are cancellations.
    pub fn complete(
        &mut self,
        id: RequestId,
        result: Result<Arc<DynamicImage>, FetchError>,
    ) -> bool {
        if self.pending() != Some(id) {
            tracing::trace!("Dropping superseded image result {id:?}");
            return false;
        }
        self.active = None;

        match result {
            Ok(image) => {
                self.content = SlotContent::Image(image);
                true
            }
            Err(e) if e.is_cancelled() => false,
            Err(_) => {
                self.content = SlotContent::Failed;
                true
            }
        }
    }

    /// Abort the pending fetch, if any, keeping the current content.
    pub fn cancel(&mut self) {
        if let Some(active) = self.active.take()
            && let Some(handle) = active.handle
        {
            handle.abort();
        }
    }

    /// Cancel and forget the bound URL.
    pub fn clear(&mut self) {
        self.cancel();
        self.url = None;
        self.content = SlotContent::Blank;
    }
}

impl Drop for RequestSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(width: u32) -> Arc<DynamicImage> {
        Arc::new(DynamicImage::new_rgba8(width, 1))
    }

    #[test]
    fn test_cache_hit_issues_no_fetch() {
        let cache = ImageCache::new(4);
        cache.put("x", DynamicImage::new_rgba8(3, 1));
        let mut slot = RequestSlot::new();

        let assignment = slot.assign("x", &cache, |_| panic!("should not fetch"));
        assert_eq!(assignment, Assignment::Cached);
        assert_eq!(slot.content().image().unwrap().width(), 3);
        assert!(slot.pending().is_none());
    }

    #[test]
    fn test_miss_blanks_and_fetches() {
        let cache = ImageCache::new(4);
        let mut slot = RequestSlot::new();
        let Assignment::Fetching(id) = slot.assign("x", &cache, |_| None) else {
            panic!("expected a fetch");
        };
        assert!(slot.content().image().is_none());
        assert_eq!(slot.pending(), Some(id));
        assert!(slot.complete(id, Ok(pixel(5))));
        assert_eq!(slot.content().image().unwrap().width(), 5);
    }

    #[test]
    fn test_superseded_result_is_discarded() {
        let cache = ImageCache::new(4);
        let mut slot = RequestSlot::new();

        let Assignment::Fetching(for_x) = slot.assign("x", &cache, |_| None) else {
            panic!("expected a fetch");
        };
        let Assignment::Fetching(for_y) = slot.assign("y", &cache, |_| None) else {
            panic!("expected a fetch");
        };

        assert!(slot.complete(for_y, Ok(pixel(2))));
        assert!(!slot.complete(for_x, Ok(pixel(9))));
        assert_eq!(slot.content().image().unwrap().width(), 2);
        assert_eq!(slot.url(), Some("y"));
    }

    #[test]
    fn test_late_result_after_cached_reassignment() {
        let cache = ImageCache::new(4);
        cache.put("y", DynamicImage::new_rgba8(4, 1));
        let mut slot = RequestSlot::new();

        let Assignment::Fetching(for_x) = slot.assign("x", &cache, |_| None) else {
            panic!("expected a fetch");
        };
        assert_eq!(slot.assign("y", &cache, |_| None), Assignment::Cached);
        assert!(!slot.complete(for_x, Ok(pixel(9))));
        assert_eq!(slot.content().image().unwrap().width(), 4);
    }

    #[test]
    fn test_failure_leaves_slot_blank() {
        let cache = ImageCache::new(4);
        let mut slot = RequestSlot::new();
        let Assignment::Fetching(id) = slot.assign("x", &cache, |_| None) else {
            panic!("expected a fetch");
        };
        assert!(slot.complete(id, Err(FetchError::Status(404))));
        assert!(matches!(slot.content(), SlotContent::Failed));
    }

    #[test]
    fn test_cancellation_is_silent() {
        let cache = ImageCache::new(4);
        let mut slot = RequestSlot::new();
        let Assignment::Fetching(id) = slot.assign("x", &cache, |_| None) else {
            panic!("expected a fetch");
        };
        assert!(!slot.complete(id, Err(FetchError::Cancelled)));
        assert!(matches!(slot.content(), SlotContent::Blank));
    }

    #[test]
    fn test_rebuilt_slot_rejects_old_request() {
        let cache = ImageCache::new(4);
        let mut old = RequestSlot::new();
        let Assignment::Fetching(for_x) = old.assign("x", &cache, |_| None) else {
            panic!("expected a fetch");
        };
        drop(old);

        let mut slot = RequestSlot::new();
        let Assignment::Fetching(for_y) = slot.assign("y", &cache, |_| None) else {
            panic!("expected a fetch");
        };
        assert_ne!(for_x, for_y);
        assert!(!slot.complete(for_x, Ok(pixel(9))));
        assert!(slot.content().image().is_none());
        assert_eq!(slot.pending(), Some(for_y));
    }

    #[tokio::test]
    async fn test_reassignment_aborts_previous_task() {
        let cache = ImageCache::new(4);
        let mut slot = RequestSlot::new();
        let task = tokio::spawn(std::future::pending::<()>());
        let abort = task.abort_handle();

        slot.assign("x", &cache, move |_| Some(abort));
        slot.assign("y", &cache, |_| None);

        let err = task.await.unwrap_err();
        assert!(err.is_cancelled());
    }
}
