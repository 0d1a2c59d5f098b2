use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use std::{collections::BTreeSet, fmt::Display, str::FromStr};

/// Identifier shared by movies and series in one id-space
pub type ContentId = u64;

/// Tag distinguishing the two content variants in lookups and references
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Movie,
    TvShow,
}

impl Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentType::Movie => write!(f, "movie"),
            ContentType::TvShow => write!(f, "tv_show"),
        }
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" | "movies" => Ok(ContentType::Movie),
            "tv_show" | "tv_shows" | "tv-show" | "tv-shows" => Ok(ContentType::TvShow),
            other => Err(format!("unknown content type: {}", other)),
        }
    }
}

/// Stable reference to a catalog item: id plus its content type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentKey {
    pub content_id: ContentId,
    pub content_type: ContentType,
}

impl ContentKey {
    pub fn new(content_id: ContentId, content_type: ContentType) -> Self {
        Self {
            content_id,
            content_type,
        }
    }
}

impl Display for ContentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.content_type, self.content_id)
    }
}

/// Fields every catalog record carries, whatever its variant.
///
/// `id`, `title`, `genre`, `year`, `rating`, `description` and `thumbnail` are
/// required. The remaining fields are optional and fall back to their default
/// when absent or malformed, so one bad `views` value never rejects a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentInfo {
    pub id: ContentId,
    pub title: String,
    pub genre: String,
    pub year: i32,
    /// Rating on a 0.0 to 10.0 scale
    pub rating: f64,
    pub description: String,
    pub thumbnail: String,
    #[serde(default, deserialize_with = "lenient")]
    pub views: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub likes: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub cast: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub languages: BTreeSet<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub quality: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    #[serde(flatten)]
    pub info: ContentInfo,
    #[serde(default, deserialize_with = "lenient")]
    pub director: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub video_url: String,
    #[serde(default, deserialize_with = "lenient")]
    pub duration: String,
    #[serde(default, deserialize_with = "lenient")]
    pub release_date: String,
}

/// Airing status of a series
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeriesStatus {
    #[default]
    Ongoing,
    Completed,
}

/// A single episode, unique within its series by `(season, episode)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub season: u32,
    pub episode: u32,
    pub title: String,
    #[serde(default, deserialize_with = "lenient")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient")]
    pub video_url: String,
    #[serde(default, deserialize_with = "lenient")]
    pub duration: String,
    #[serde(default, deserialize_with = "lenient")]
    pub air_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    #[serde(flatten)]
    pub info: ContentInfo,
    #[serde(default, deserialize_with = "lenient")]
    pub creator: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub seasons: u32,
    #[serde(default, deserialize_with = "lenient")]
    pub total_episodes: u32,
    #[serde(default, deserialize_with = "lenient")]
    pub status: SeriesStatus,
    #[serde(default, deserialize_with = "lenient")]
    pub episodes: Vec<Episode>,
}

impl Series {
    /// Finds an episode by its `(season, episode)` key
    pub fn episode(&self, season: u32, episode: u32) -> Option<&Episode> {
        self.episodes
            .iter()
            .find(|e| e.season == season && e.episode == episode)
    }

    /// Episodes of one season, in catalog order
    pub fn season(&self, season: u32) -> impl Iterator<Item = &Episode> {
        self.episodes.iter().filter(move |e| e.season == season)
    }
}

/// A movie or a series as served to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "content_type", rename_all = "snake_case")]
pub enum ContentItem {
    Movie(Movie),
    #[serde(rename = "tv_show")]
    Series(Series),
}

impl ContentItem {
    pub fn info(&self) -> &ContentInfo {
        match self {
            ContentItem::Movie(movie) => &movie.info,
            ContentItem::Series(series) => &series.info,
        }
    }

    pub fn content_type(&self) -> ContentType {
        match self {
            ContentItem::Movie(_) => ContentType::Movie,
            ContentItem::Series(_) => ContentType::TvShow,
        }
    }

    pub fn key(&self) -> ContentKey {
        ContentKey::new(self.id(), self.content_type())
    }

    pub fn id(&self) -> ContentId {
        self.info().id
    }

    pub fn title(&self) -> &str {
        &self.info().title
    }

    pub fn genre(&self) -> &str {
        &self.info().genre
    }

    pub fn year(&self) -> i32 {
        self.info().year
    }

    pub fn rating(&self) -> f64 {
        self.info().rating
    }

    pub fn views(&self) -> u64 {
        self.info().views
    }

    pub fn likes(&self) -> u64 {
        self.info().likes
    }

    pub fn description(&self) -> &str {
        &self.info().description
    }

    pub fn cast(&self) -> &[String] {
        &self.info().cast
    }

    /// Director for movies, creator for series
    pub fn director(&self) -> Option<&str> {
        match self {
            ContentItem::Movie(movie) => movie.director.as_deref(),
            ContentItem::Series(series) => series.creator.as_deref(),
        }
    }

    pub fn as_series(&self) -> Option<&Series> {
        match self {
            ContentItem::Series(series) => Some(series),
            ContentItem::Movie(_) => None,
        }
    }
}

impl From<Movie> for ContentItem {
    fn from(movie: Movie) -> Self {
        ContentItem::Movie(movie)
    }
}

impl From<Series> for ContentItem {
    fn from(series: Series) -> Self {
        ContentItem::Series(series)
    }
}

/// Catalog source record: the `content_database.json` layout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogData {
    #[serde(default)]
    pub movies: Vec<Movie>,
    #[serde(default)]
    pub tv_shows: Vec<Series>,
}

/// Deserializes an optional field, substituting the default when the value
/// has the wrong shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}
