//! Data models for Photomania

mod comment;
mod photo;

pub use comment::Comment;
pub use photo::{
    ImageSize, PhotoDetail, PhotoId, PhotoRecord, RawPhotoEntry, UserSummary, map_entries,
};
