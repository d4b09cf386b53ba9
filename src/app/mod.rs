//! Drivers that connect the feed, the image cache and a render layer
//!
//! [`PhotoBrowser`] runs the paginated grid and [`PhotoViewer`] the
//! full-screen view with comments. Both own their state exclusively and
//! apply background fetch results on the caller's context, notifying an
//! observer supplied by the render layer.

mod async_ops;
mod browser;
mod scroll;
mod viewer;

use std::ops::Range;

pub use async_ops::{BrowserResult, ViewSession, ViewerResult, ViewerTarget};
pub use browser::PhotoBrowser;
pub use scroll::ScrollMetrics;
pub use viewer::{PhotoViewer, ViewerObserver};

/// Identifies a reusable grid slot (cell)
pub type SlotId = usize;

/// Callbacks from the [`PhotoBrowser`] to the render layer.
pub trait RenderObserver {
    /// Photos were appended at `range`
    fn on_items_inserted(&mut self, range: Range<usize>);

    /// Everything was cleared by a refresh
    fn on_reloaded(&mut self) {}

    /// A slot's displayed image changed
    fn on_slot_changed(&mut self, _slot: SlotId) {}
}

#[cfg(test)]
pub(crate) mod test_support {
    //! In-memory collaborators with controllable completion

    use std::collections::{HashMap, HashSet, VecDeque};
    use std::ops::Range;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use image::DynamicImage;
    use tokio::sync::Semaphore;

    use super::{RenderObserver, SlotId, ViewerObserver};
    use crate::api::{FeedFetchClient, ImageFetchClient, PhotoDetailClient};
    use crate::error::{FetchError, FetchResult};
    use crate::models::{Comment, PhotoDetail, PhotoId, RawPhotoEntry};

    pub fn entry(id: u64, url: &str, nsfw: bool) -> RawPhotoEntry {
        RawPhotoEntry {
            id,
            url: url.to_string(),
            nsfw,
        }
    }

    /// Feed that serves queued pages, optionally holding each one until
    /// [`GatedFeed::release`] is called.
    pub struct GatedFeed {
        pages: Mutex<VecDeque<FetchResult<Vec<RawPhotoEntry>>>>,
        gate: Option<Semaphore>,
        pub calls: AtomicUsize,
        pub pages_requested: Mutex<Vec<u32>>,
    }

    impl GatedFeed {
        fn build(pages: Vec<FetchResult<Vec<RawPhotoEntry>>>, gated: bool) -> Arc<Self> {
            Arc::new(Self {
                pages: Mutex::new(pages.into()),
                gate: gated.then(|| Semaphore::new(0)),
                calls: AtomicUsize::new(0),
                pages_requested: Mutex::new(Vec::new()),
            })
        }

        pub fn open(pages: Vec<FetchResult<Vec<RawPhotoEntry>>>) -> Arc<Self> {
            Self::build(pages, false)
        }

        pub fn gated(pages: Vec<FetchResult<Vec<RawPhotoEntry>>>) -> Arc<Self> {
            Self::build(pages, true)
        }

        pub fn release(&self) {
            if let Some(gate) = &self.gate {
                gate.add_permits(1);
            }
        }
    }

    impl FeedFetchClient for GatedFeed {
        async fn fetch_page(&self, page: u32) -> FetchResult<Vec<RawPhotoEntry>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.pages_requested.lock().unwrap().push(page);
            if let Some(gate) = &self.gate {
                gate.acquire().await.unwrap().forget();
            }
            self.pages.lock().unwrap().pop_front().unwrap_or(Ok(Vec::new()))
        }
    }

    /// Images whose width is the length of their URL.
    pub struct GatedImages {
        gates: Option<Mutex<HashMap<String, Arc<Semaphore>>>>,
        failing: Mutex<HashSet<String>>,
        pub calls: AtomicUsize,
    }

    impl GatedImages {
        fn build(gated: bool) -> Arc<Self> {
            Arc::new(Self {
                gates: gated.then(|| Mutex::new(HashMap::new())),
                failing: Mutex::new(HashSet::new()),
                calls: AtomicUsize::new(0),
            })
        }

        pub fn open() -> Arc<Self> {
            Self::build(false)
        }

        pub fn gated() -> Arc<Self> {
            Self::build(true)
        }

        fn gate(&self, url: &str) -> Option<Arc<Semaphore>> {
            let gates = self.gates.as_ref()?;
            let mut gates = gates.lock().unwrap();
            Some(Arc::clone(
                gates
                    .entry(url.to_string())
                    .or_insert_with(|| Arc::new(Semaphore::new(0))),
            ))
        }

        pub fn release(&self, url: &str) {
            if let Some(gate) = self.gate(url) {
                gate.add_permits(1);
            }
        }

        pub fn fail(&self, url: &str) {
            self.failing.lock().unwrap().insert(url.to_string());
        }
    }

    impl ImageFetchClient for GatedImages {
        async fn fetch_image(&self, url: &str) -> FetchResult<DynamicImage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = self.gate(url) {
                gate.acquire().await.unwrap().forget();
            }
            if self.failing.lock().unwrap().contains(url) {
                return Err(FetchError::Status(404));
            }
            Ok(DynamicImage::new_rgba8(url.len() as u32, 1))
        }
    }

    /// Photo details and comments served from maps.
    #[derive(Default)]
    pub struct StaticDetails {
        pub details: Mutex<HashMap<PhotoId, PhotoDetail>>,
        pub comments: Mutex<HashMap<PhotoId, Vec<Comment>>>,
    }

    impl PhotoDetailClient for StaticDetails {
        async fn photo_detail(&self, id: PhotoId) -> FetchResult<PhotoDetail> {
            self.details
                .lock()
                .unwrap()
                .get(&id)
                .cloned()
                .ok_or(FetchError::Status(404))
        }

        async fn comments(&self, id: PhotoId, _page: u32) -> FetchResult<Vec<Comment>> {
            Ok(self
                .comments
                .lock()
                .unwrap()
                .get(&id)
                .cloned()
                .unwrap_or_default())
        }
    }

    /// Records every observer callback.
    #[derive(Default)]
    pub struct Recorder {
        pub inserted: Vec<Range<usize>>,
        pub reloads: usize,
        pub slots: Vec<SlotId>,
        pub details: Vec<PhotoId>,
        pub photo_images: usize,
        pub comments: Vec<usize>,
        pub avatars: Vec<usize>,
        pub errors: usize,
    }

    impl RenderObserver for Recorder {
        fn on_items_inserted(&mut self, range: Range<usize>) {
            self.inserted.push(range);
        }

        fn on_reloaded(&mut self) {
            self.reloads += 1;
        }

        fn on_slot_changed(&mut self, slot: SlotId) {
            self.slots.push(slot);
        }
    }

    impl ViewerObserver for Recorder {
        fn on_detail_loaded(&mut self, detail: &PhotoDetail) {
            self.details.push(detail.id);
        }

        fn on_image_changed(&mut self) {
            self.photo_images += 1;
        }

        fn on_comments_loaded(&mut self, count: usize) {
            self.comments.push(count);
        }

        fn on_avatar_changed(&mut self, row: usize) {
            self.avatars.push(row);
        }

        fn on_error(&mut self, _error: &FetchError) {
            self.errors += 1;
        }
    }
}
