use serde::{Deserialize, Serialize};

use crate::{
    models::{ContentId, ContentItem, ContentKey, ContentType, WatchlistEntry},
    services::catalog::CatalogStore,
};

/// A session's saved items: a set of `(id, type)` keys in the order added
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WatchlistManager {
    entries: Vec<WatchlistEntry>,
}

impl WatchlistManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Saves an item; returns `false` if it was already saved
    pub fn add(&mut self, id: ContentId, content_type: ContentType) -> bool {
        if self.contains(id, content_type) {
            return false;
        }
        self.entries
            .push(WatchlistEntry::new(ContentKey::new(id, content_type)));
        true
    }

    /// Drops an item; returns `false` if it was not saved
    pub fn remove(&mut self, id: ContentId, content_type: ContentType) -> bool {
        let key = ContentKey::new(id, content_type);
        let before = self.entries.len();
        self.entries.retain(|entry| entry.key != key);
        self.entries.len() != before
    }

    pub fn contains(&self, id: ContentId, content_type: ContentType) -> bool {
        let key = ContentKey::new(id, content_type);
        self.entries.iter().any(|entry| entry.key == key)
    }

    pub fn entries(&self) -> &[WatchlistEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maps saved keys back to catalog records
    ///
    /// Entries whose item is no longer in the catalog are skipped.
    pub fn resolve<'a>(&self, catalog: &'a CatalogStore) -> Vec<&'a ContentItem> {
        self.entries
            .iter()
            .filter_map(|entry| {
                let item = catalog.get(entry.key.content_id, entry.key.content_type);
                if item.is_none() {
                    tracing::debug!(key = %entry.key, "Watchlist entry no longer in catalog");
                }
                item
            })
            .collect()
    }
}
