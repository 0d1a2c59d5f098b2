use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    models::{ContentItem, ContentKey},
    services::{history::ViewHistoryManager, watchlist::WatchlistManager},
};

/// Per-session viewer state
///
/// Each session owns its watchlist, history and current selection; nothing
/// here is shared between sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Session {
    pub watchlist: WatchlistManager,
    pub history: ViewHistoryManager,
    /// Item most recently opened for playback
    pub now_playing: Option<ContentKey>,
    /// Last time the owner of this session changed it
    pub last_seen: DateTime<Utc>,
}

impl Session {
    pub fn new(history_capacity: usize) -> Self {
        Self::started_at(history_capacity, Utc::now())
    }

    pub fn started_at(history_capacity: usize, now: DateTime<Utc>) -> Self {
        Self {
            watchlist: WatchlistManager::new(),
            history: ViewHistoryManager::with_capacity(history_capacity),
            now_playing: None,
            last_seen: now,
        }
    }

    /// Whether the session has gone untouched for longer than `idle_timeout`
    pub fn is_idle(&self, now: DateTime<Utc>, idle_timeout: chrono::Duration) -> bool {
        now - self.last_seen > idle_timeout
    }

    /// Marks `item` as playing and records the view
    pub fn watch(&mut self, item: &ContentItem) {
        self.now_playing = Some(item.key());
        self.history.record(item);
    }
}
