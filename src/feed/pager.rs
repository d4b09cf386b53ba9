//! Paging cursor and merge of feed pages into the photo set

use std::ops::Range;

use crate::error::FetchError;
use crate::models::{RawPhotoEntry, map_entries};

use super::OrderedPhotoSet;

/// Pager generation, bumped on every reset
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Epoch(u64);

impl Epoch {
    /// The next generation
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    /// Raw counter value
    pub const fn value(self) -> u64 {
        self.0
    }
}

/// An outstanding page request, tagged with the generation that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTicket {
    /// Page number to fetch (1-based)
    pub page: u32,
    /// Generation at issuance
    pub epoch: Epoch,
}

/// Result of applying a page completion
#[derive(Debug)]
pub enum PageOutcome {
    /// New photos were appended at this index range
    Inserted(Range<usize>),
    /// The page succeeded but contributed nothing new
    NoNewItems,
    /// The fetch failed; the same page will be requested next time
    Failed(FetchError),
    /// The pager was reset after this request was issued
    Stale,
}

impl PageOutcome {
    /// Index range to announce to the render layer, if any
    pub fn inserted(&self) -> Option<Range<usize>> {
        match self {
            Self::Inserted(range) => Some(range.clone()),
            _ => None,
        }
    }
}

/// Owns the paging cursor, the in-flight guard and the photo collection.
///
/// The pager does no I/O itself: [`FeedPager::request_next_page`] hands out a
/// [`PageTicket`] for the caller to fetch, and the caller feeds the result
/// back through [`FeedPager::complete_page`] on the same context.
#[derive(Debug)]
pub struct FeedPager {
    photos: OrderedPhotoSet,
    current_page: u32,
    is_fetching: bool,
    epoch: Epoch,
}

impl Default for FeedPager {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedPager {
    /// Create a pager positioned on page 1
    pub fn new() -> Self {
        Self {
            photos: OrderedPhotoSet::new(),
            current_page: 1,
            is_fetching: false,
            epoch: Epoch::default(),
        }
    }

    /// Accumulated photos in display order
    pub const fn photos(&self) -> &OrderedPhotoSet {
        &self.photos
    }

    /// Next page to fetch
    pub const fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Whether a page request is outstanding
    pub const fn is_fetching(&self) -> bool {
        self.is_fetching
    }

    /// Current generation
    pub const fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Start fetching the current page.
    ///
    /// Returns `None` while a request is already outstanding, so repeated
    /// triggers collapse into a single fetch.
    pub fn request_next_page(&mut self) -> Option<PageTicket> {
        if self.is_fetching {
            tracing::trace!("Page {} already in flight", self.current_page);
            return None;
        }
        self.is_fetching = true;
        tracing::debug!("Requesting page {}", self.current_page);
        Some(PageTicket {
            page: self.current_page,
            epoch: self.epoch,
        })
    }

    /// Apply the result of a page fetch.
    pub fn complete_page(
        &mut self,
        ticket: PageTicket,
        result: Result<Vec<RawPhotoEntry>, FetchError>,
    ) -> PageOutcome {
        if ticket.epoch != self.epoch {
            tracing::debug!(
                "Discarding page {} from epoch {} (now {})",
                ticket.page,
                ticket.epoch.value(),
                self.epoch.value()
            );
            return PageOutcome::Stale;
        }
        debug_assert_eq!(ticket.page, self.current_page);

        let outcome = match result {
            Ok(entries) => {
                let received = entries.len();
                let range = self.photos.extend(map_entries(entries));
                self.current_page += 1;
                tracing::debug!(
                    "Merged page {}: {} entries, {} new, {} total",
                    ticket.page,
                    received,
                    range.len(),
                    self.photos.len()
                );
                if range.is_empty() {
                    PageOutcome::NoNewItems
                } else {
                    PageOutcome::Inserted(range)
                }
            }
            Err(e) => {
                tracing::warn!("Failed to fetch page {}: {}", ticket.page, e);
                PageOutcome::Failed(e)
            }
        };

        self.is_fetching = false;
        outcome
    }

    /// Drop all photos, rewind to page 1 and request it again.
    ///
    /// A request still in flight is not cancelled; its completion carries the
    /// previous epoch and is discarded.
    pub fn reset(&mut self) -> Option<PageTicket> {
        self.photos.clear();
        self.current_page = 1;
        self.is_fetching = false;
        self.epoch = self.epoch.next();
        tracing::debug!("Pager reset to epoch {}", self.epoch.value());
        self.request_next_page()
    }
}
