use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    models::ContentItem,
    services::{catalog::CatalogStore, sort},
};

/// Number of items listed in [`CatalogStats::top_rated`]
pub const TOP_RATED_LIMIT: usize = 10;

/// Equal-width bins spanning the 0 to 10 rating scale
pub const RATING_BINS: usize = 20;

const MAX_RATING: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreCount {
    pub genre: String,
    pub count: usize,
}

/// Ratings falling in `[lower, upper)`; the last bin also holds `upper`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Summary figures for a catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogStats<'a> {
    pub movie_count: usize,
    pub series_count: usize,
    /// Sum of the declared `total_episodes` of every series
    pub total_episodes: u64,
    /// Mean rating over all items, 0 for an empty catalog
    pub average_rating: f64,
    pub total_views: u64,
    pub total_likes: u64,
    /// Items per genre, ordered by genre name
    pub genre_distribution: Vec<GenreCount>,
    /// Rating counts over [`RATING_BINS`] bins, lowest first
    pub rating_histogram: Vec<RatingBin>,
    pub top_rated: Vec<&'a ContentItem>,
}

pub fn catalog_stats(catalog: &CatalogStore, top_n: usize) -> CatalogStats<'_> {
    let items = catalog.items();

    let total_episodes = catalog
        .series()
        .iter()
        .filter_map(ContentItem::as_series)
        .map(|series| u64::from(series.total_episodes))
        .sum();

    let average_rating = if items.is_empty() {
        0.0
    } else {
        items.iter().map(ContentItem::rating).sum::<f64>() / items.len() as f64
    };

    let mut genres: BTreeMap<&str, usize> = BTreeMap::new();
    for item in items {
        *genres.entry(item.genre()).or_default() += 1;
    }

    let mut histogram = vec![0usize; RATING_BINS];
    for item in items {
        histogram[rating_bin(item.rating())] += 1;
    }

    let mut top_rated = sort::sort(items, sort::SortKey::Rating, true);
    top_rated.truncate(top_n);

    CatalogStats {
        movie_count: catalog.movies().len(),
        series_count: catalog.series().len(),
        total_episodes,
        average_rating,
        total_views: items.iter().map(ContentItem::views).sum(),
        total_likes: items.iter().map(ContentItem::likes).sum(),
        genre_distribution: genres
            .into_iter()
            .map(|(genre, count)| GenreCount {
                genre: genre.to_string(),
                count,
            })
            .collect(),
        rating_histogram: histogram
            .into_iter()
            .enumerate()
            .map(|(bin, count)| RatingBin {
                lower: bin_edge(bin),
                upper: bin_edge(bin + 1),
                count,
            })
            .collect(),
        top_rated,
    }
}

fn bin_edge(bin: usize) -> f64 {
    MAX_RATING * bin as f64 / RATING_BINS as f64
}

fn rating_bin(rating: f64) -> usize {
    let bin = (rating * RATING_BINS as f64 / MAX_RATING).floor();
    (bin.max(0.0) as usize).min(RATING_BINS - 1)
}

/// The highest-rated movie, the earliest one on a tie
pub fn featured(catalog: &CatalogStore) -> Option<&ContentItem> {
    catalog
        .movies()
        .iter()
        .reduce(|best, item| if item.rating() > best.rating() { item } else { best })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CatalogData;
    use crate::services::catalog::fixtures::{movie, series};

    #[test]
    fn test_stats_for_sample_catalog() {
        let mut guardians = series(101, "Galaxy Guardians", "Sci-Fi", 2024, 9.5);
        guardians.total_episodes = 36;
        let mut shadows = series(102, "Corporate Shadows", "Drama", 2023, 8.8);
        shadows.total_episodes = 20;

        let mut cyber = movie(1, "Cyber Revolution", "Sci-Fi", 2024, 9.2);
        cyber.info.views = 1_250_000;
        cyber.info.likes = 89_750;
        guardians.info.views = 2_100_000;
        guardians.info.likes = 425_000;

        let store = CatalogStore::from_data(CatalogData {
            movies: vec![
                cyber,
                movie(2, "Ocean Depths", "Adventure", 2023, 8.7),
                movie(3, "Mind Games", "Thriller", 2024, 8.9),
            ],
            tv_shows: vec![guardians, shadows],
        })
        .unwrap();

        let stats = catalog_stats(&store, 3);
        assert_eq!(stats.movie_count, 3);
        assert_eq!(stats.series_count, 2);
        assert_eq!(stats.total_episodes, 56);
        assert!((stats.average_rating - 9.02).abs() < 1e-9);
        assert_eq!(
            stats.genre_distribution,
            vec![
                GenreCount { genre: "Adventure".to_string(), count: 1 },
                GenreCount { genre: "Drama".to_string(), count: 1 },
                GenreCount { genre: "Sci-Fi".to_string(), count: 2 },
                GenreCount { genre: "Thriller".to_string(), count: 1 },
            ]
        );
        let top: Vec<u64> = stats.top_rated.iter().map(|i| i.id()).collect();
        assert_eq!(top, vec![101, 1, 3]);
        assert_eq!(stats.total_views, 3_350_000);
        assert_eq!(stats.total_likes, 514_750);

        // 8.7, 8.8 and 8.9 land in [8.5, 9.0)
        let counts: Vec<usize> = stats.rating_histogram.iter().map(|b| b.count).collect();
        let mut expected = vec![0; RATING_BINS];
        expected[17] = 3;
        expected[18] = 1;
        expected[19] = 1;
        assert_eq!(counts, expected);
        assert_eq!(stats.rating_histogram[17].lower, 8.5);
        assert_eq!(stats.rating_histogram[19].upper, 10.0);
    }

    #[test]
    fn test_rating_bin_edges() {
        assert_eq!(rating_bin(0.0), 0);
        assert_eq!(rating_bin(0.49), 0);
        assert_eq!(rating_bin(0.5), 1);
        assert_eq!(rating_bin(7.8), 15);
        assert_eq!(rating_bin(10.0), RATING_BINS - 1);
    }

    #[test]
    fn test_featured_is_first_highest_rated_movie() {
        let store = CatalogStore::from_data(CatalogData {
            movies: vec![
                movie(1, "Ocean Depths", "Adventure", 2023, 8.7),
                movie(2, "Cyber Revolution", "Sci-Fi", 2024, 9.2),
                movie(3, "Mind Games", "Thriller", 2024, 9.2),
            ],
            tv_shows: vec![series(101, "Galaxy Guardians", "Sci-Fi", 2024, 9.5)],
        })
        .unwrap();

        assert_eq!(featured(&store).map(ContentItem::id), Some(2));
        assert_eq!(featured(&CatalogStore::empty()), None);
    }

    #[test]
    fn test_stats_for_empty_catalog() {
        let store = CatalogStore::empty();
        let stats = catalog_stats(&store, TOP_RATED_LIMIT);
        assert_eq!(stats.average_rating, 0.0);
        assert_eq!(stats.total_episodes, 0);
        assert!(stats.genre_distribution.is_empty());
        assert!(stats.top_rated.is_empty());
        assert_eq!(stats.rating_histogram.len(), RATING_BINS);
        assert!(stats.rating_histogram.iter().all(|b| b.count == 0));
    }
}
