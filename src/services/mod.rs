pub mod analytics;
pub mod catalog;
pub mod filter;
pub mod history;
pub mod search;
pub mod session;
pub mod sort;
pub mod trending;
pub mod watchlist;

pub use catalog::{
    load_catalog, CatalogLoadError, CatalogSource, CatalogStore, FileCatalogSource,
    StaticCatalogSource,
};
pub use filter::{FilterCriteria, ALL_GENRES};
pub use history::ViewHistoryManager;
pub use search::SearchScope;
pub use session::Session;
pub use sort::{SortKey, SortOrder};
pub use watchlist::WatchlistManager;
