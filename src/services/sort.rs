use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::models::ContentItem;

/// Field a listing is ordered by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Rating,
    Year,
    Views,
    Title,
}

/// Direction requested by the caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Descending,
    Ascending,
}

impl SortOrder {
    pub fn is_descending(self) -> bool {
        self == SortOrder::Descending
    }
}

/// Orders items by `key`
///
/// The sort is stable, so equal keys keep their input order. Numeric keys
/// follow `descending` directly. [`SortKey::Title`] reads the flag the other
/// way round: `descending = true` yields A to Z, which is how the listing UI
/// has always labelled its default order.
pub fn sort<'a, I>(items: I, key: SortKey, descending: bool) -> Vec<&'a ContentItem>
where
    I: IntoIterator<Item = &'a ContentItem>,
{
    let mut sorted: Vec<&ContentItem> = items.into_iter().collect();

    let reverse = match key {
        SortKey::Title => !descending,
        _ => descending,
    };

    sorted.sort_by(|a, b| {
        let ordering = compare(a, b, key);
        if reverse {
            ordering.reverse()
        } else {
            ordering
        }
    });

    sorted
}

fn compare(a: &ContentItem, b: &ContentItem, key: SortKey) -> Ordering {
    match key {
        SortKey::Rating => a.rating().total_cmp(&b.rating()),
        SortKey::Year => a.year().cmp(&b.year()),
        SortKey::Views => a.views().cmp(&b.views()),
        SortKey::Title => a.title().cmp(b.title()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::catalog::fixtures::movie;

    fn sample() -> Vec<ContentItem> {
        let mut a = movie(1, "Mind Games", "Thriller", 2024, 8.9);
        a.info.views = 2_100_000;
        let mut b = movie(2, "Ocean Depths", "Adventure", 2023, 8.7);
        b.info.views = 980_000;
        let c = movie(3, "Cyber Revolution", "Sci-Fi", 2024, 9.2);
        let mut d = movie(4, "Arcade", "Comedy", 2023, 8.7);
        d.info.views = 980_000;
        vec![a.into(), b.into(), c.into(), d.into()]
    }

    fn ids(items: &[&ContentItem]) -> Vec<u64> {
        items.iter().map(|i| i.id()).collect()
    }

    #[test]
    fn test_rating_descending_keeps_ties_in_input_order() {
        let items = sample();
        let sorted = sort(&items, SortKey::Rating, true);
        assert_eq!(ids(&sorted), vec![3, 1, 2, 4]);
    }

    #[test]
    fn test_rating_ascending_keeps_ties_in_input_order() {
        let items = sample();
        let sorted = sort(&items, SortKey::Rating, false);
        assert_eq!(ids(&sorted), vec![2, 4, 1, 3]);
    }

    #[test]
    fn test_year_sort() {
        let items = sample();
        let sorted = sort(&items, SortKey::Year, true);
        assert_eq!(ids(&sorted), vec![1, 3, 2, 4]);
    }

    #[test]
    fn test_missing_views_sort_as_zero() {
        let items = sample();
        let sorted = sort(&items, SortKey::Views, true);
        assert_eq!(ids(&sorted), vec![1, 2, 4, 3]);

        let sorted = sort(&items, SortKey::Views, false);
        assert_eq!(ids(&sorted), vec![3, 2, 4, 1]);
    }

    #[test]
    fn test_title_descending_flag_sorts_a_to_z() {
        let items = sample();
        let sorted = sort(&items, SortKey::Title, true);
        let titles: Vec<&str> = sorted.iter().map(|i| i.title()).collect();
        assert_eq!(
            titles,
            vec!["Arcade", "Cyber Revolution", "Mind Games", "Ocean Depths"]
        );
    }

    #[test]
    fn test_title_ascending_flag_sorts_z_to_a() {
        let items = sample();
        let sorted = sort(&items, SortKey::Title, false);
        assert_eq!(ids(&sorted), vec![2, 1, 3, 4]);
    }

    #[test]
    fn test_sort_accepts_filtered_listing() {
        let items = sample();
        let subset: Vec<&ContentItem> = items.iter().filter(|i| i.year() == 2023).collect();
        let sorted = sort(subset, SortKey::Title, true);
        assert_eq!(ids(&sorted), vec![4, 2]);
    }

    #[test]
    fn test_sort_params_deserialize() {
        let key: SortKey = serde_json::from_str("\"views\"").unwrap();
        assert_eq!(key, SortKey::Views);
        let order: SortOrder = serde_json::from_str("\"ascending\"").unwrap();
        assert!(!order.is_descending());
    }
}
