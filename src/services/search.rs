//! Weighted free-text search over catalog items.
//!
//! A query is matched case-insensitively as a substring of several fields.
//! Each matching field adds its weight; the fields are independent, so a
//! query found in both title and genre earns both weights.
//!
//! | Field              | Weight |
//! |--------------------|--------|
//! | title              | 0.40   |
//! | description        | 0.20   |
//! | genre              | 0.20   |
//! | any cast member    | 0.15   |
//! | director / creator | 0.10   |
//!
//! Weights are kept as integer points (hundredths) and divided once, so a
//! title+genre hit is exactly `0.6` rather than an accumulated float sum.
//! The reported score is capped at `1.0`; ranking uses the uncapped points.

use serde::{Deserialize, Serialize};

use crate::{
    models::ContentItem,
    services::catalog::CatalogStore,
};

const TITLE_POINTS: u32 = 40;
const DESCRIPTION_POINTS: u32 = 20;
const GENRE_POINTS: u32 = 20;
const CAST_POINTS: u32 = 15;
const DIRECTOR_POINTS: u32 = 10;

/// Which part of the catalog a search covers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchScope {
    #[default]
    All,
    Movies,
    #[serde(alias = "series")]
    TvShows,
}

/// Which weighted fields a query matched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MatchBreakdown {
    pub title: bool,
    pub description: bool,
    pub genre: bool,
    pub cast: bool,
    pub director: bool,
}

impl MatchBreakdown {
    /// Sum of matched weights in hundredths
    pub fn points(&self) -> u32 {
        [
            (self.title, TITLE_POINTS),
            (self.description, DESCRIPTION_POINTS),
            (self.genre, GENRE_POINTS),
            (self.cast, CAST_POINTS),
            (self.director, DIRECTOR_POINTS),
        ]
        .iter()
        .filter(|(matched, _)| *matched)
        .map(|(_, points)| points)
        .sum()
    }

    /// Relevance in `[0, 1]`
    pub fn score(&self) -> f64 {
        (f64::from(self.points()) / 100.0).min(1.0)
    }

    pub fn is_match(&self) -> bool {
        self.points() > 0
    }
}

/// A search hit with its relevance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredItem<'a> {
    pub item: &'a ContentItem,
    pub score: f64,
    pub matched: MatchBreakdown,
}

/// Reports which fields of `item` contain `query`
///
/// Cast and director only contribute when the item has them; an absent field
/// is no bonus rather than a mismatch.
pub fn explain(item: &ContentItem, query: &str) -> MatchBreakdown {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return MatchBreakdown::default();
    }
    let contains = |field: &str| field.to_lowercase().contains(&needle);

    MatchBreakdown {
        title: contains(item.title()),
        description: contains(item.description()),
        genre: contains(item.genre()),
        cast: item.cast().iter().any(|name| contains(name)),
        director: item.director().is_some_and(|name| contains(name)),
    }
}

/// Relevance of `item` for `query`, in `[0, 1]`
pub fn score(item: &ContentItem, query: &str) -> f64 {
    explain(item, query).score()
}

/// Scores every item, drops non-matches and orders by descending relevance
///
/// Ties keep input order. An empty query returns nothing. The query is used
/// exactly as given, so every hit carries `score(item, query)`.
pub fn search<'a, I>(items: I, query: &str) -> Vec<ScoredItem<'a>>
where
    I: IntoIterator<Item = &'a ContentItem>,
{
    if query.is_empty() {
        return Vec::new();
    }

    let mut hits: Vec<(u32, ScoredItem<'a>)> = items
        .into_iter()
        .filter_map(|item| {
            let matched = explain(item, query);
            matched.is_match().then(|| {
                (
                    matched.points(),
                    ScoredItem {
                        item,
                        score: matched.score(),
                        matched,
                    },
                )
            })
        })
        .collect();

    hits.sort_by(|(a, _), (b, _)| b.cmp(a));

    tracing::debug!(query = %query, hits = hits.len(), "Search completed");

    hits.into_iter().map(|(_, hit)| hit).collect()
}

/// Searches the part of `catalog` selected by `scope`
pub fn search_scoped<'a>(
    catalog: &'a CatalogStore,
    query: &str,
    scope: SearchScope,
) -> Vec<ScoredItem<'a>> {
    match scope {
        SearchScope::All => search(catalog.items(), query),
        SearchScope::Movies => search(catalog.movies(), query),
        SearchScope::TvShows => search(catalog.series(), query),
    }
}
