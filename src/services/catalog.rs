use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::{
    error::{AppError, AppResult},
    models::{CatalogData, ContentId, ContentItem, ContentKey, ContentType},
};

/// Failures while reading or validating a catalog source
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("catalog source not found: {path}")]
    Missing { path: String },

    #[error("failed to read catalog source {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed catalog: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("duplicate content id {id}")]
    DuplicateId { id: ContentId },

    #[error("content {id} has rating {rating} outside 0-10")]
    RatingOutOfRange { id: ContentId, rating: f64 },

    #[error("series {series_id} lists S{season}E{episode} more than once")]
    DuplicateEpisode {
        series_id: ContentId,
        season: u32,
        episode: u32,
    },
}

/// Where catalog records come from
///
/// The store never reads files itself; a source hands it already-parsed
/// records and the store validates them.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch and parse the catalog records
    async fn load(&self) -> Result<CatalogData, CatalogLoadError>;

    /// Human-readable origin for logging
    fn describe(&self) -> String;
}

/// Reads a `content_database.json` style file
#[derive(Debug, Clone)]
pub struct FileCatalogSource {
    path: PathBuf,
}

impl FileCatalogSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait::async_trait]
impl CatalogSource for FileCatalogSource {
    async fn load(&self) -> Result<CatalogData, CatalogLoadError> {
        let path = self.path.display().to_string();
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => CatalogLoadError::Missing { path: path.clone() },
                _ => CatalogLoadError::Io {
                    path: path.clone(),
                    source: e,
                },
            })?;

        Ok(serde_json::from_str(&raw)?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Serves records already held in memory
#[derive(Debug, Clone, Default)]
pub struct StaticCatalogSource {
    data: CatalogData,
}

impl StaticCatalogSource {
    pub fn new(data: CatalogData) -> Self {
        Self { data }
    }
}

#[async_trait::async_trait]
impl CatalogSource for StaticCatalogSource {
    async fn load(&self) -> Result<CatalogData, CatalogLoadError> {
        Ok(self.data.clone())
    }

    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}

/// Immutable set of content items for the lifetime of a process
///
/// Movies come first, then series, each in source order. A reload builds a
/// new store; nothing mutates one after construction, so it can be shared
/// across sessions behind an `Arc` without locking.
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    items: Vec<ContentItem>,
    movie_count: usize,
    index: HashMap<ContentKey, usize>,
}

impl CatalogStore {
    /// A store with no items, used when the source cannot be loaded
    pub fn empty() -> Self {
        Self::default()
    }

    /// Validates parsed records and builds the lookup index
    pub fn from_data(data: CatalogData) -> Result<Self, CatalogLoadError> {
        let movie_count = data.movies.len();
        let items: Vec<ContentItem> = data
            .movies
            .into_iter()
            .map(ContentItem::from)
            .chain(data.tv_shows.into_iter().map(ContentItem::from))
            .collect();

        let mut seen_ids = HashSet::new();
        let mut index = HashMap::with_capacity(items.len());

        for (position, item) in items.iter().enumerate() {
            if !seen_ids.insert(item.id()) {
                return Err(CatalogLoadError::DuplicateId { id: item.id() });
            }

            let rating = item.rating();
            if !(0.0..=10.0).contains(&rating) {
                return Err(CatalogLoadError::RatingOutOfRange {
                    id: item.id(),
                    rating,
                });
            }

            if let Some(series) = item.as_series() {
                let mut episodes = HashSet::new();
                for episode in &series.episodes {
                    if !episodes.insert((episode.season, episode.episode)) {
                        return Err(CatalogLoadError::DuplicateEpisode {
                            series_id: item.id(),
                            season: episode.season,
                            episode: episode.episode,
                        });
                    }
                }
            }

            index.insert(item.key(), position);
        }

        Ok(Self {
            items,
            movie_count,
            index,
        })
    }

    /// Loads and validates a catalog from `source`
    pub async fn load(source: &dyn CatalogSource) -> Result<Self, CatalogLoadError> {
        let data = source.load().await?;
        let store = Self::from_data(data)?;

        tracing::info!(
            source = %source.describe(),
            movies = store.movies().len(),
            tv_shows = store.series().len(),
            "Catalog loaded"
        );

        Ok(store)
    }

    /// Loads a catalog, degrading to an empty one on failure
    ///
    /// The error is handed back alongside the empty store so the caller can
    /// surface it as a warning.
    pub async fn load_or_empty(source: &dyn CatalogSource) -> (Self, Option<CatalogLoadError>) {
        match Self::load(source).await {
            Ok(store) => (store, None),
            Err(e) => {
                tracing::warn!(
                    source = %source.describe(),
                    error = %e,
                    "Catalog unavailable, continuing with an empty catalog"
                );
                (Self::empty(), Some(e))
            }
        }
    }

    /// Every item: movies first, then series
    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn movies(&self) -> &[ContentItem] {
        &self.items[..self.movie_count]
    }

    pub fn series(&self) -> &[ContentItem] {
        &self.items[self.movie_count..]
    }

    pub fn items_of(&self, content_type: ContentType) -> &[ContentItem] {
        match content_type {
            ContentType::Movie => self.movies(),
            ContentType::TvShow => self.series(),
        }
    }

    pub fn get(&self, id: ContentId, content_type: ContentType) -> Option<&ContentItem> {
        self.index
            .get(&ContentKey::new(id, content_type))
            .map(|&position| &self.items[position])
    }

    /// Looks up an item by id and type
    pub fn lookup(&self, id: ContentId, content_type: ContentType) -> AppResult<&ContentItem> {
        self.get(id, content_type).ok_or_else(|| {
            AppError::NotFound(format!("{} not in catalog", ContentKey::new(id, content_type)))
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Builds a [`CatalogStore`] from a source
pub async fn load_catalog(source: &dyn CatalogSource) -> Result<CatalogStore, CatalogLoadError> {
    CatalogStore::load(source).await
}
