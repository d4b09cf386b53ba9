//! Photo grid driver

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::api::{FeedFetchClient, ImageFetchClient};
use crate::feed::{FeedPager, OrderedPhotoSet, PageOutcome};
use crate::images::{Assignment, ImageCache, RequestSlot};

use super::async_ops::{BrowserResult, spawn_image_fetch, spawn_page_fetch};
use super::{RenderObserver, ScrollMetrics, SlotId};

/// Owns the feed pager, the image cache and the grid's slots.
///
/// All state changes happen through `&mut self`, on whichever context owns
/// the browser (usually the UI loop). Fetches run as background tasks and
/// are applied when [`PhotoBrowser::poll`] or [`PhotoBrowser::wait`] drains
/// their results.
pub struct PhotoBrowser<F, I> {
    pager: FeedPager,
    cache: ImageCache,
    slots: HashMap<SlotId, RequestSlot>,
    feed_client: Arc<F>,
    image_client: Arc<I>,
    result_tx: mpsc::UnboundedSender<BrowserResult>,
    result_rx: mpsc::UnboundedReceiver<BrowserResult>,
    scroll_threshold: f64,
}

impl<F: FeedFetchClient, I: ImageFetchClient> PhotoBrowser<F, I> {
    /// Create a browser. Nothing is fetched until the first trigger.
    pub fn new(feed_client: Arc<F>, image_client: Arc<I>, cache: ImageCache) -> Self {
        let (result_tx, result_rx) = mpsc::unbounded_channel();
        Self {
            pager: FeedPager::new(),
            cache,
            slots: HashMap::new(),
            feed_client,
            image_client,
            result_tx,
            result_rx,
            scroll_threshold: 0.8,
        }
    }

    /// Use a different fraction of the content extent as the paging trigger
    pub fn with_scroll_threshold(mut self, threshold: f64) -> Self {
        self.scroll_threshold = threshold;
        self
    }

    /// Photos loaded so far, in display order
    pub const fn photos(&self) -> &OrderedPhotoSet {
        self.pager.photos()
    }

    /// Paging state
    pub const fn pager(&self) -> &FeedPager {
        &self.pager
    }

    /// Shared image cache
    pub const fn cache(&self) -> &ImageCache {
        &self.cache
    }

    /// A grid slot, if it was ever bound
    pub fn slot(&self, slot: SlotId) -> Option<&RequestSlot> {
        self.slots.get(&slot)
    }

    /// Whether a page or image fetch is outstanding
    pub fn has_pending_work(&self) -> bool {
        self.pager.is_fetching() || self.slots.values().any(|s| s.pending().is_some())
    }

    /// Fetch the next page unless one is already in flight.
    ///
    /// Returns `true` if a request was issued.
    pub fn request_next_page(&mut self) -> bool {
        match self.pager.request_next_page() {
            Some(ticket) => {
                spawn_page_fetch(
                    Arc::clone(&self.feed_client),
                    ticket,
                    self.result_tx.clone(),
                );
                true
            }
            None => false,
        }
    }

    /// The render layer saw the scroll position pass the threshold.
    pub fn on_scroll_threshold_reached(&mut self) -> bool {
        self.request_next_page()
    }

    /// Feed a scroll position; requests the next page past the threshold.
    pub fn on_scroll(&mut self, metrics: ScrollMetrics) -> bool {
        metrics.past_threshold(self.scroll_threshold) && self.request_next_page()
    }

    /// Pull-to-refresh: drop everything loaded and start again from page 1.
    pub fn on_refresh_requested<O: RenderObserver>(&mut self, observer: &mut O) {
        tracing::info!("Refreshing feed");
        let ticket = self.pager.reset();
        observer.on_reloaded();
        if let Some(ticket) = ticket {
            spawn_page_fetch(
                Arc::clone(&self.feed_client),
                ticket,
                self.result_tx.clone(),
            );
        }
    }

    /// Memory pressure: forget every cached image.
    pub fn on_memory_warning(&mut self) {
        self.cache.purge();
    }

    /// Make `slot` display the photo at `index`.
    ///
    /// Returns `None` if the index is out of range.
    pub fn bind_slot(&mut self, slot: SlotId, index: usize) -> Option<Assignment> {
        let url = self.pager.photos().get(index)?.url().to_string();
        let client = Arc::clone(&self.image_client);
        let result_tx = self.result_tx.clone();

        let entry = self.slots.entry(slot).or_default();
        let assignment = entry.assign(&url, &self.cache, |request| {
            Some(spawn_image_fetch(
                client,
                url.clone(),
                result_tx,
                move |url, result| BrowserResult::ImageFetched {
                    slot,
                    request,
                    url,
                    result,
                },
            ))
        });
        Some(assignment)
    }

    /// The slot went off screen; cancel its fetch.
    pub fn release_slot(&mut self, slot: SlotId) {
        if let Some(mut entry) = self.slots.remove(&slot) {
            entry.clear();
        }
    }

    /// Apply every result that has already arrived. Returns how many.
    pub fn poll<O: RenderObserver>(&mut self, observer: &mut O) -> usize {
        let mut handled = 0;
        while let Ok(result) = self.result_rx.try_recv() {
            self.handle_result(result, observer);
            handled += 1;
        }
        handled
    }

    /// Wait for the next result and apply it.
    ///
    /// Only call this while [`has_pending_work`](Self::has_pending_work)
    /// holds; otherwise it waits forever.
    pub async fn wait<O: RenderObserver>(&mut self, observer: &mut O) {
        if let Some(result) = self.result_rx.recv().await {
            self.handle_result(result, observer);
        }
    }

    fn handle_result<O: RenderObserver>(&mut self, result: BrowserResult, observer: &mut O) {
        match result {
            BrowserResult::PageFetched { ticket, result } => {
                match self.pager.complete_page(ticket, result) {
                    PageOutcome::Inserted(range) => observer.on_items_inserted(range),
                    PageOutcome::NoNewItems | PageOutcome::Failed(_) | PageOutcome::Stale => {}
                }
            }
            BrowserResult::ImageFetched {
                slot,
                request,
                url,
                result,
            } => {
                let result = result.map(Arc::new);
                match &result {
                    Ok(image) => self.cache.put(&url, Arc::clone(image)),
                    Err(e) if e.is_cancelled() => tracing::debug!("Image fetch cancelled: {url}"),
                    Err(e) => tracing::warn!("Failed to load image {url}: {e}"),
                }
                if let Some(entry) = self.slots.get_mut(&slot)
                    && entry.complete(request, result)
                {
                    observer.on_slot_changed(slot);
                }
            }
        }
    }
}
