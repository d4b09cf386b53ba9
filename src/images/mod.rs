//! Image caching and per-slot image loading.
//!
//! Decoded images live in a bounded [`ImageCache`] keyed by URL. Each
//! reusable display slot owns a [`RequestSlot`] that tracks the one fetch it
//! may have in flight, so a recycled slot never shows a late image meant for
//! its previous occupant.

mod cache;
mod loader;
mod slot;

pub use cache::{DEFAULT_CAPACITY, ImageCache};
pub use loader::HttpImageClient;
pub use slot::{Assignment, RequestId, RequestSlot, SlotContent};
