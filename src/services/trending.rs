use serde::Serialize;

use crate::models::ContentItem;

/// An item with its computed trend score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendingItem<'a> {
    pub item: &'a ContentItem,
    pub trend_score: f64,
}

/// Popularity weighted by quality: `views * rating / 1000`
///
/// Not time-decayed. Items without a view count score 0.
pub fn trend_score(item: &ContentItem) -> f64 {
    item.views() as f64 * item.rating() / 1000.0
}

/// Items with their trend scores, highest first; ties keep input order
pub fn rank_scored<'a, I>(items: I) -> Vec<TrendingItem<'a>>
where
    I: IntoIterator<Item = &'a ContentItem>,
{
    let mut ranked: Vec<TrendingItem<'a>> = items
        .into_iter()
        .map(|item| TrendingItem {
            item,
            trend_score: trend_score(item),
        })
        .collect();

    ranked.sort_by(|a, b| b.trend_score.total_cmp(&a.trend_score));
    ranked
}

/// Items ordered by descending trend score
pub fn rank<'a, I>(items: I) -> Vec<&'a ContentItem>
where
    I: IntoIterator<Item = &'a ContentItem>,
{
    rank_scored(items).into_iter().map(|t| t.item).collect()
}
