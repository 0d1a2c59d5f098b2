use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{ContentItem, HistoryEntry};

/// Entries kept per session unless configured otherwise
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// A session's recently viewed items, most recent first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewHistoryManager {
    entries: Vec<HistoryEntry>,
    capacity: usize,
}

impl Default for ViewHistoryManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewHistoryManager {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// A history holding at most `capacity` entries (at least one)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Records a view of `item` now
    pub fn record(&mut self, item: &ContentItem) {
        self.record_at(item, Utc::now());
    }

    /// Records a view at `timestamp`
    ///
    /// A repeat view moves the item to the front instead of adding a second
    /// entry; the oldest entries fall off once capacity is exceeded.
    pub fn record_at(&mut self, item: &ContentItem, timestamp: DateTime<Utc>) {
        self.entries.retain(|entry| entry.content_id != item.id());
        self.entries.insert(0, HistoryEntry::from_item(item, timestamp));
        self.entries.truncate(self.capacity);
    }

    /// Up to `n` most recent entries
    pub fn recent(&self, n: usize) -> &[HistoryEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::catalog::fixtures::movie;
    use chrono::TimeZone;

    fn item(id: u64) -> ContentItem {
        movie(id, &format!("Movie {}", id), "Drama", 2020, 7.0).into()
    }

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, minute, 0).unwrap()
    }

    #[test]
    fn test_eleven_views_keep_ten_most_recent() {
        let mut history = ViewHistoryManager::new();
        for id in 1..=11u64 {
            history.record_at(&item(id), at(id as u32));
        }

        assert_eq!(history.len(), 10);
        let ids: Vec<u64> = history.recent(10).iter().map(|e| e.content_id).collect();
        assert_eq!(ids, (2..=11).rev().collect::<Vec<u64>>());
    }

    #[test]
    fn test_repeat_view_moves_to_front() {
        let mut history = ViewHistoryManager::new();
        history.record_at(&item(1), at(1));
        history.record_at(&item(2), at(2));
        history.record_at(&item(3), at(3));
        history.record_at(&item(1), at(4));

        assert_eq!(history.len(), 3);
        let recent = history.recent(3);
        assert_eq!(recent[0].content_id, 1);
        assert_eq!(recent[0].timestamp, at(4));
        assert_eq!(recent[1].content_id, 3);
        assert_eq!(recent[2].content_id, 2);
    }

    #[test]
    fn test_repeat_view_at_capacity_does_not_evict() {
        let mut history = ViewHistoryManager::new();
        for id in 1..=10u64 {
            history.record_at(&item(id), at(id as u32));
        }
        history.record_at(&item(1), at(30));

        assert_eq!(history.len(), 10);
        assert_eq!(history.recent(1)[0].content_id, 1);
        assert!(history.recent(10).iter().any(|e| e.content_id == 2));
    }

    #[test]
    fn test_recent_is_bounded_by_length() {
        let mut history = ViewHistoryManager::new();
        assert!(history.recent(5).is_empty());

        history.record(&item(1));
        assert_eq!(history.recent(5).len(), 1);
        assert_eq!(history.recent(0).len(), 0);
        assert_eq!(history.recent(1)[0].title, "Movie 1");
        assert_eq!(history.recent(1)[0].genre, "Drama");
    }

    #[test]
    fn test_custom_capacity() {
        let mut history = ViewHistoryManager::with_capacity(0);
        assert_eq!(history.capacity(), 1);
        history.record(&item(1));
        history.record(&item(2));
        assert_eq!(history.len(), 1);
        assert_eq!(history.recent(5)[0].content_id, 2);
    }
}
