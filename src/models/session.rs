use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ContentId, ContentItem, ContentKey, ContentType};

/// A saved reference in a session's watchlist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    #[serde(flatten)]
    pub key: ContentKey,
    pub added_at: DateTime<Utc>,
}

impl WatchlistEntry {
    pub fn new(key: ContentKey) -> Self {
        Self {
            key,
            added_at: Utc::now(),
        }
    }
}

/// One viewing event, unique by `content_id` within a history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub content_id: ContentId,
    pub content_type: ContentType,
    pub title: String,
    pub genre: String,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn from_item(item: &ContentItem, timestamp: DateTime<Utc>) -> Self {
        Self {
            content_id: item.id(),
            content_type: item.content_type(),
            title: item.title().to_string(),
            genre: item.genre().to_string(),
            timestamp,
        }
    }
}
