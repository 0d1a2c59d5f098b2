use std::collections::BTreeSet;

use serde::Serialize;

use crate::models::ContentItem;

/// Genre value that disables genre filtering
pub const ALL_GENRES: &str = "All";

/// Narrowing criteria for a content listing
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    /// Exact genre name, or [`ALL_GENRES`]
    pub genre: String,
    /// Inclusive `(min, max)` release year bounds
    pub year_range: (i32, i32),
    pub min_rating: f64,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            genre: ALL_GENRES.to_string(),
            year_range: (i32::MIN, i32::MAX),
            min_rating: 0.0,
        }
    }
}

impl FilterCriteria {
    pub fn new(genre: impl Into<String>, year_range: (i32, i32), min_rating: f64) -> Self {
        Self {
            genre: genre.into(),
            year_range,
            min_rating,
        }
    }

    pub fn matches(&self, item: &ContentItem) -> bool {
        let (min_year, max_year) = self.year_range;
        (self.genre == ALL_GENRES || item.genre() == self.genre)
            && (min_year..=max_year).contains(&item.year())
            && item.rating() >= self.min_rating
    }
}

/// Keeps the items matching `criteria`, preserving input order
pub fn filter<'a, I>(items: I, criteria: &FilterCriteria) -> Vec<&'a ContentItem>
where
    I: IntoIterator<Item = &'a ContentItem>,
{
    items
        .into_iter()
        .filter(|item| criteria.matches(item))
        .collect()
}

/// Values available to build filter controls for a set of items
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Facets {
    /// Distinct genres, sorted
    pub genres: Vec<String>,
    /// Earliest and latest release year, `None` for an empty set
    pub year_bounds: Option<(i32, i32)>,
}

impl Facets {
    /// Criteria covering every item these facets were computed from
    pub fn full_range(&self) -> FilterCriteria {
        FilterCriteria {
            year_range: self.year_bounds.unwrap_or((i32::MIN, i32::MAX)),
            ..FilterCriteria::default()
        }
    }
}

pub fn facets<'a, I>(items: I) -> Facets
where
    I: IntoIterator<Item = &'a ContentItem>,
{
    let mut genres = BTreeSet::new();
    let mut year_bounds: Option<(i32, i32)> = None;

    for item in items {
        genres.insert(item.genre().to_string());
        let year = item.year();
        year_bounds = Some(match year_bounds {
            Some((min, max)) => (min.min(year), max.max(year)),
            None => (year, year),
        });
    }

    Facets {
        genres: genres.into_iter().collect(),
        year_bounds,
    }
}

/// Items shown per genre when browsing by category
pub const CATEGORY_PREVIEW_LIMIT: usize = 4;

/// Items of one genre for a browse-by-category view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreGroup<'a> {
    pub genre: &'a str,
    /// Items of this genre in the whole input, not only the preview
    pub total: usize,
    /// First `per_genre` items of this genre, in input order
    pub items: Vec<&'a ContentItem>,
}

/// Groups items by genre
///
/// Genres appear in the order they are first met, and each group keeps at
/// most `per_genre` items.
pub fn by_genre<'a, I>(items: I, per_genre: usize) -> Vec<GenreGroup<'a>>
where
    I: IntoIterator<Item = &'a ContentItem>,
{
    let mut groups: Vec<GenreGroup<'a>> = Vec::new();

    for item in items {
        let position = groups.iter().position(|group| group.genre == item.genre());
        let group = match position {
            Some(index) => &mut groups[index],
            None => {
                groups.push(GenreGroup {
                    genre: item.genre(),
                    total: 0,
                    items: Vec::new(),
                });
                let last = groups.len() - 1;
                &mut groups[last]
            }
        };
        group.total += 1;
        if group.items.len() < per_genre {
            group.items.push(item);
        }
    }

    groups
}
