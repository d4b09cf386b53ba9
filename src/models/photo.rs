//! Photo models (feed entries, records and full photo details)

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Stable photo identifier assigned by the feed source
pub type PhotoId = u64;

/// One entry of a feed page, as delivered by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPhotoEntry {
    /// Photo identifier
    pub id: PhotoId,
    /// Image URL at the requested size
    #[serde(rename = "image_url")]
    pub url: String,
    /// Flagged as not safe for display
    #[serde(default)]
    pub nsfw: bool,
}

impl RawPhotoEntry {
    /// Map into a [`PhotoRecord`], dropping entries flagged as unsafe.
    pub fn into_record(self) -> Option<PhotoRecord> {
        if self.nsfw {
            None
        } else {
            Some(PhotoRecord::new(self.id, self.url))
        }
    }
}

/// Apply the content filter and map a page of entries to records.
///
/// Filtering happens before any de-duplication, so a dropped entry never
/// counts towards an insertion range.
pub fn map_entries(entries: Vec<RawPhotoEntry>) -> Vec<PhotoRecord> {
    entries.into_iter().filter_map(RawPhotoEntry::into_record).collect()
}

/// An immutable photo reference shown in the grid.
///
/// Equality and hashing use the id only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoRecord {
    id: PhotoId,
    url: String,
}

impl PhotoRecord {
    /// Create a record
    pub fn new(id: PhotoId, url: impl Into<String>) -> Self {
        Self {
            id,
            url: url.into(),
        }
    }

    /// Photo identifier
    pub const fn id(&self) -> PhotoId {
        self.id
    }

    /// Image URL
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl PartialEq for PhotoRecord {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PhotoRecord {}

impl Hash for PhotoRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Image sizes understood by the photo service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSize {
    /// 70px square
    Tiny,
    /// 140px square
    Small,
    /// 280px square
    #[default]
    Medium,
    /// 900px on the longest edge
    Large,
    /// 1170px on the longest edge
    XLarge,
}

impl ImageSize {
    /// Numeric code used in query strings
    pub const fn code(self) -> u8 {
        match self {
            Self::Tiny => 1,
            Self::Small => 2,
            Self::Medium => 3,
            Self::Large => 4,
            Self::XLarge => 5,
        }
    }
}

/// Photographer summary attached to details and comments
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    /// Display name
    #[serde(default)]
    pub fullname: String,
    /// Avatar URL
    #[serde(default)]
    pub userpic_url: Option<String>,
}

/// Full photo details, as shown in the viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoDetail {
    /// Photo identifier
    pub id: PhotoId,
    /// Title
    #[serde(default)]
    pub name: String,
    /// Image URL at the requested size
    #[serde(rename = "image_url")]
    pub url: String,
    /// Number of comments
    #[serde(default)]
    pub comments_count: u32,
    /// Number of votes
    #[serde(default)]
    pub votes_count: u32,
    /// Number of favorites
    #[serde(default)]
    pub favorites_count: u32,
    /// Photographer
    #[serde(default)]
    pub user: UserSummary,
}

impl PhotoDetail {
    /// Whether the viewer should offer a comments panel
    pub const fn has_comments(&self) -> bool {
        self.comments_count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_equality_by_id_only() {
        let a = PhotoRecord::new(7, "https://img/a.jpg");
        let b = PhotoRecord::new(7, "https://img/other.jpg");
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(!set.insert(b));
    }

    #[test]
    fn test_nsfw_filtered_before_mapping() {
        let entries = vec![
            RawPhotoEntry {
                id: 1,
                url: "a".into(),
                nsfw: false,
            },
            RawPhotoEntry {
                id: 2,
                url: "b".into(),
                nsfw: true,
            },
        ];
        let records = map_entries(entries);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id(), 1);
        assert_eq!(records[0].url(), "a");
    }

    #[test]
    fn test_entry_from_service_json() {
        let json = r#"{"id": 42, "image_url": "https://x/42.jpg", "nsfw": false, "name": "ignored"}"#;
        let entry: RawPhotoEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id, 42);
        assert_eq!(entry.url, "https://x/42.jpg");

        let json = r#"{"id": 43, "image_url": "https://x/43.jpg"}"#;
        let entry: RawPhotoEntry = serde_json::from_str(json).unwrap();
        assert!(!entry.nsfw);
    }

    #[test]
    fn test_detail_from_service_json() {
        let json = r#"{
            "id": 9,
            "name": "Harbour",
            "image_url": "https://x/9.jpg",
            "comments_count": 3,
            "votes_count": 120,
            "favorites_count": 14,
            "user": {"fullname": "Ada", "userpic_url": "https://x/ada.png"}
        }"#;
        let detail: PhotoDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.name, "Harbour");
        assert!(detail.has_comments());
        assert_eq!(detail.user.fullname, "Ada");
    }

    #[test]
    fn test_image_size_codes() {
        assert_eq!(ImageSize::Medium.code(), 3);
        assert_eq!(ImageSize::XLarge.code(), 5);
        assert_eq!(ImageSize::default(), ImageSize::Medium);
    }
}
