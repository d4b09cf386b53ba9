//! Insertion-ordered collection of unique photos

use std::collections::HashMap;
use std::ops::Range;

use crate::models::{PhotoId, PhotoRecord};

/// Photos in display order, unique by id.
///
/// An id index sits alongside the ordered sequence so duplicate checks are
/// O(1) and an append always yields a contiguous index range.
#[derive(Debug, Clone, Default)]
pub struct OrderedPhotoSet {
    photos: Vec<PhotoRecord>,
    positions: HashMap<PhotoId, usize>,
}

impl OrderedPhotoSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Append records whose id is not present yet.
    ///
    /// Returns the index range of the newly inserted records, which is empty
    /// when everything was a duplicate.
    pub fn extend(&mut self, records: impl IntoIterator<Item = PhotoRecord>) -> Range<usize> {
        let start = self.photos.len();
        for record in records {
            if self.positions.contains_key(&record.id()) {
                continue;
            }
            self.positions.insert(record.id(), self.photos.len());
            self.photos.push(record);
        }
        start..self.photos.len()
    }

    /// Remove every record
    pub fn clear(&mut self) {
        self.photos.clear();
        self.positions.clear();
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.photos.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    /// Record at a display index
    pub fn get(&self, index: usize) -> Option<&PhotoRecord> {
        self.photos.get(index)
    }

    /// Display index of a photo id
    pub fn position(&self, id: PhotoId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    /// Whether a photo id is present
    pub fn contains(&self, id: PhotoId) -> bool {
        self.positions.contains_key(&id)
    }

    /// Iterate in display order
    pub fn iter(&self) -> std::slice::Iter<'_, PhotoRecord> {
        self.photos.iter()
    }
}

impl<'a> IntoIterator for &'a OrderedPhotoSet {
    type Item = &'a PhotoRecord;
    type IntoIter = std::slice::Iter<'a, PhotoRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.photos.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(ids: &[u64]) -> Vec<PhotoRecord> {
        ids.iter()
            .map(|id| PhotoRecord::new(*id, format!("https://img/{id}.jpg")))
            .collect()
    }

    #[test]
    fn test_extend_reports_inserted_range() {
        let mut set = OrderedPhotoSet::new();
        assert_eq!(set.extend(records(&[1, 2, 3])), 0..3);
        assert_eq!(set.extend(records(&[3, 4, 1, 5])), 3..5);
        assert_eq!(set.len(), 5);
        assert_eq!(set.position(4), Some(3));
    }

    #[test]
    fn test_duplicates_within_one_batch() {
        let mut set = OrderedPhotoSet::new();
        assert_eq!(set.extend(records(&[8, 8, 9])), 0..2);
        assert_eq!(set.get(1).map(PhotoRecord::id), Some(9));
    }

    #[test]
    fn test_all_duplicates_is_empty_range() {
        let mut set = OrderedPhotoSet::new();
        set.extend(records(&[1, 2]));
        let range = set.extend(records(&[2, 1]));
        assert!(range.is_empty());
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_existing_order_is_stable() {
        let mut set = OrderedPhotoSet::new();
        set.extend(records(&[10, 20, 30]));
        let before: Vec<_> = set.iter().map(PhotoRecord::id).collect();
        set.extend(records(&[5, 20, 40]));
        let after: Vec<_> = set.iter().map(PhotoRecord::id).collect();
        assert_eq!(&after[..3], &before[..]);
        assert_eq!(after, vec![10, 20, 30, 5, 40]);
    }

    #[test]
    fn test_clear() {
        let mut set = OrderedPhotoSet::new();
        set.extend(records(&[1, 2]));
        set.clear();
        assert!(set.is_empty());
        assert!(!set.contains(1));
        assert_eq!(set.extend(records(&[1])), 0..1);
    }
}
