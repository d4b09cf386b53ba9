//! Paginated photo feed: cursor, in-flight guard and de-duplicated merge.

mod pager;
mod photo_set;

pub use pager::{Epoch, FeedPager, PageOutcome, PageTicket};
pub use photo_set::OrderedPhotoSet;
