//! Bounded LRU cache for decoded images, keyed by URL.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use image::DynamicImage;

/// Default number of images kept before evicting
pub const DEFAULT_CAPACITY: usize = 200;

struct CachedImage {
    image: Arc<DynamicImage>,
    last_access: u64,
}

#[derive(Default)]
struct Inner {
    entries: HashMap<String, CachedImage>,
    clock: u64,
}

impl Inner {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn evict_oldest(&mut self) {
        if let Some(oldest_key) = self
            .entries
            .iter()
            .min_by_key(|(_, v)| v.last_access)
            .map(|(k, _)| k.clone())
        {
            tracing::trace!("Evicting cached image {oldest_key}");
            self.entries.remove(&oldest_key);
        }
    }
}

/// Thread-safe image cache shared by the grid and the viewer.
///
/// Images are handed out as `Arc`s, so eviction only affects future
/// lookups; anything already displayed keeps its own reference. Callers must
/// treat a miss as always possible.
#[derive(Clone)]
pub struct ImageCache {
    inner: Arc<Mutex<Inner>>,
    capacity: usize,
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl std::fmt::Debug for ImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl ImageCache {
    /// Create a cache holding at most `capacity` images.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            capacity: capacity.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a decoded image, replacing any previous entry for the URL.
    pub fn put(&self, url: &str, image: impl Into<Arc<DynamicImage>>) {
        let mut inner = self.lock();
        if !inner.entries.contains_key(url) && inner.entries.len() >= self.capacity {
            inner.evict_oldest();
        }
        let last_access = inner.tick();
        inner.entries.insert(
            url.to_string(),
            CachedImage {
                image: image.into(),
                last_access,
            },
        );
    }

    /// Look up a decoded image.
    pub fn get(&self, url: &str) -> Option<Arc<DynamicImage>> {
        let mut inner = self.lock();
        let now = inner.tick();
        inner.entries.get_mut(url).map(|entry| {
            entry.last_access = now;
            Arc::clone(&entry.image)
        })
    }

    /// Check if an image is cached.
    pub fn contains(&self, url: &str) -> bool {
        self.lock().entries.contains_key(url)
    }

    /// Drop every entry, e.g. under memory pressure.
    pub fn purge(&self) {
        let mut inner = self.lock();
        tracing::debug!("Purging {} cached images", inner.entries.len());
        inner.entries.clear();
    }

    /// Get the number of cached images.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// Maximum number of images kept
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}
