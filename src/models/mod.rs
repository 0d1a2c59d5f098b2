pub mod content;
pub mod session;

pub use content::{
    CatalogData, ContentId, ContentInfo, ContentItem, ContentKey, ContentType, Episode, Movie,
    Series, SeriesStatus,
};
pub use session::{HistoryEntry, WatchlistEntry};
