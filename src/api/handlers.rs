use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::middleware::SessionId;
use crate::models::{ContentId, ContentItem, ContentKey, ContentType, HistoryEntry};
use crate::services::{
    analytics::{self, TOP_RATED_LIMIT},
    filter::{self, Facets, GenreGroup, CATEGORY_PREVIEW_LIMIT},
    search::{self, MatchBreakdown},
    sort, trending, FilterCriteria, SearchScope, SortKey, SortOrder, ALL_GENRES,
};

use super::AppState;

// Request/Response types

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub genre: Option<String>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    pub min_rating: Option<f64>,
    #[serde(default)]
    pub sort: SortKey,
    #[serde(default)]
    pub order: SortOrder,
}

impl ListQuery {
    fn criteria(&self) -> AppResult<FilterCriteria> {
        let year_range = (
            self.min_year.unwrap_or(i32::MIN),
            self.max_year.unwrap_or(i32::MAX),
        );
        if year_range.0 > year_range.1 {
            return Err(AppError::InvalidInput(format!(
                "min_year {} is after max_year {}",
                year_range.0, year_range.1
            )));
        }

        let min_rating = self.min_rating.unwrap_or(0.0);
        if !(0.0..=10.0).contains(&min_rating) {
            return Err(AppError::InvalidInput(format!(
                "min_rating {} outside 0-10",
                min_rating
            )));
        }

        Ok(FilterCriteria::new(
            self.genre.as_deref().unwrap_or(ALL_GENRES),
            year_range,
            min_rating,
        ))
    }
}

#[derive(Debug, Deserialize)]
pub struct FacetsQuery {
    pub content_type: Option<ContentType>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub scope: SearchScope,
}

#[derive(Debug, Serialize)]
pub struct SearchHit {
    pub content: ContentItem,
    pub score: f64,
    pub matched: MatchBreakdown,
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct TrendingHit {
    pub content: ContentItem,
    pub trend_score: f64,
}

/// Items listed under "continue watching" on the home view
pub const CONTINUE_WATCHING_LIMIT: usize = 3;

#[derive(Debug, Serialize)]
pub struct HomeResponse<'a> {
    pub featured: Option<&'a ContentItem>,
    pub continue_watching: Vec<HistoryEntry>,
    pub categories: Vec<GenreGroup<'a>>,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: SessionId,
    pub now_playing: Option<ContentItem>,
    pub watchlist_count: usize,
    pub history_count: usize,
}

// Handlers

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "catalog_items": state.catalog.len(),
            "catalog_warning": state.catalog_warning.as_deref(),
        })),
    )
}

/// Featured pick, the caller's recent views and genre previews
pub async fn get_home(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
) -> AppResult<Json<Value>> {
    let continue_watching = state
        .inner
        .read()
        .await
        .active_session(&session_id, &state.session_limits, Utc::now())
        .map(|session| session.history.recent(CONTINUE_WATCHING_LIMIT).to_vec())
        .unwrap_or_default();

    let home = HomeResponse {
        featured: analytics::featured(&state.catalog),
        continue_watching,
        categories: filter::by_genre(state.catalog.items(), CATEGORY_PREVIEW_LIMIT),
    };
    let body = serde_json::to_value(&home)
        .map_err(|e| AppError::Internal(format!("Home serialization error: {}", e)))?;
    Ok(Json(body))
}

/// Filtered, sorted movie listing
pub async fn list_movies(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<ContentItem>>> {
    list_content(&state, ContentType::Movie, &query)
}

/// Filtered, sorted series listing
pub async fn list_tv_shows(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<ContentItem>>> {
    list_content(&state, ContentType::TvShow, &query)
}

fn list_content(
    state: &AppState,
    content_type: ContentType,
    query: &ListQuery,
) -> AppResult<Json<Vec<ContentItem>>> {
    let criteria = query.criteria()?;
    let filtered = filter::filter(state.catalog.items_of(content_type), &criteria);
    let sorted = sort::sort(filtered, query.sort, query.order.is_descending());

    tracing::debug!(
        content_type = %content_type,
        genre = %criteria.genre,
        results = sorted.len(),
        "Listing content"
    );

    Ok(Json(sorted.into_iter().cloned().collect()))
}

/// Single catalog item
pub async fn get_content(
    State(state): State<AppState>,
    Path((content_type, id)): Path<(String, ContentId)>,
) -> AppResult<Json<ContentItem>> {
    let content_type: ContentType = content_type.parse().map_err(AppError::InvalidInput)?;
    let item = state.catalog.lookup(id, content_type)?;
    Ok(Json(item.clone()))
}

/// Genres and year bounds for building filter controls
pub async fn get_facets(
    State(state): State<AppState>,
    Query(query): Query<FacetsQuery>,
) -> Json<Facets> {
    let items = match query.content_type {
        Some(content_type) => state.catalog.items_of(content_type),
        None => state.catalog.items(),
    };
    Json(filter::facets(items))
}

/// Weighted free-text search
pub async fn search_content(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
    Query(params): Query<SearchQuery>,
) -> Json<Vec<SearchHit>> {
    let hits: Vec<SearchHit> = search::search_scoped(&state.catalog, &params.q, params.scope)
        .into_iter()
        .map(|hit| SearchHit {
            content: hit.item.clone(),
            score: hit.score,
            matched: hit.matched,
        })
        .collect();

    tracing::info!(
        session_id = %session_id,
        query = %params.q,
        results = hits.len(),
        "Search"
    );

    Json(hits)
}

/// Catalog ranked by trend score
pub async fn get_trending(
    State(state): State<AppState>,
    Query(params): Query<LimitQuery>,
) -> Json<Vec<TrendingHit>> {
    let limit = params.limit.unwrap_or(usize::MAX);
    let hits = trending::rank_scored(state.catalog.items())
        .into_iter()
        .take(limit)
        .map(|t| TrendingHit {
            content: t.item.clone(),
            trend_score: t.trend_score,
        })
        .collect();
    Json(hits)
}

/// Catalog summary figures
pub async fn get_analytics(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let stats = analytics::catalog_stats(&state.catalog, TOP_RATED_LIMIT);
    let body = serde_json::to_value(&stats)
        .map_err(|e| AppError::Internal(format!("Analytics serialization error: {}", e)))?;
    Ok(Json(body))
}

/// The caller's session summary
pub async fn get_session(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
) -> Json<SessionResponse> {
    let inner = state.inner.read().await;
    let session = inner.active_session(&session_id, &state.session_limits, Utc::now());

    let now_playing = session
        .and_then(|s| s.now_playing)
        .and_then(|key| state.catalog.get(key.content_id, key.content_type))
        .cloned();

    Json(SessionResponse {
        session_id,
        now_playing,
        watchlist_count: session.map_or(0, |s| s.watchlist.len()),
        history_count: session.map_or(0, |s| s.history.len()),
    })
}

/// Ends the caller's session, discarding its watchlist and history
pub async fn end_session(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
) -> StatusCode {
    let ended = state.inner.write().await.end_session(&session_id);
    tracing::info!(session_id = %session_id, ended, "Session ended");
    StatusCode::NO_CONTENT
}

/// Watchlist resolved to full catalog records
pub async fn get_watchlist(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
) -> Json<Vec<ContentItem>> {
    let inner = state.inner.read().await;
    let items: Vec<ContentItem> = inner
        .active_session(&session_id, &state.session_limits, Utc::now())
        .map(|session| {
            session
                .watchlist
                .resolve(&state.catalog)
                .into_iter()
                .cloned()
                .collect()
        })
        .unwrap_or_default();
    Json(items)
}

/// Save an item to the watchlist
pub async fn add_to_watchlist(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
    Json(key): Json<ContentKey>,
) -> AppResult<StatusCode> {
    state.catalog.lookup(key.content_id, key.content_type)?;

    let mut inner = state.inner.write().await;
    let added = inner
        .session_mut(session_id, &state.session_limits)
        .watchlist
        .add(key.content_id, key.content_type);

    tracing::info!(session_id = %session_id, key = %key, added, "Watchlist add");

    Ok(if added {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    })
}

/// Drop an item from the watchlist
pub async fn remove_from_watchlist(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
    Path((content_type, id)): Path<(String, ContentId)>,
) -> AppResult<StatusCode> {
    let content_type: ContentType = content_type.parse().map_err(AppError::InvalidInput)?;

    let now = Utc::now();
    let mut inner = state.inner.write().await;
    inner.prune_idle(now, state.session_limits.idle_timeout);
    if let Some(session) = inner.sessions.get_mut(&session_id) {
        session.last_seen = now;
        let removed = session.watchlist.remove(id, content_type);
        tracing::info!(session_id = %session_id, id, removed, "Watchlist remove");
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Most recent views, newest first
pub async fn get_history(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
    Query(params): Query<LimitQuery>,
) -> Json<Vec<HistoryEntry>> {
    let limit = params
        .limit
        .unwrap_or(state.session_limits.history_capacity);
    let inner = state.inner.read().await;
    let entries = inner
        .active_session(&session_id, &state.session_limits, Utc::now())
        .map(|session| session.history.recent(limit).to_vec())
        .unwrap_or_default();
    Json(entries)
}

/// Record that the caller started watching an item
pub async fn record_view(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
    Json(key): Json<ContentKey>,
) -> AppResult<(StatusCode, Json<HistoryEntry>)> {
    let item = state.catalog.lookup(key.content_id, key.content_type)?;

    let mut inner = state.inner.write().await;
    let session = inner.session_mut(session_id, &state.session_limits);
    session.watch(item);

    let entry = session
        .history
        .recent(1)
        .first()
        .cloned()
        .ok_or_else(|| AppError::Internal("history empty after recording".to_string()))?;

    tracing::info!(session_id = %session_id, key = %key, "Recorded view");

    Ok((StatusCode::CREATED, Json(entry)))
}
