use axum::{
    middleware,
    routing::{delete, get},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{session_id::make_span_with_session_id, session_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/home", get(handlers::get_home))
        // Catalog browsing
        .route("/catalog/movies", get(handlers::list_movies))
        .route("/catalog/tv-shows", get(handlers::list_tv_shows))
        .route("/catalog/facets", get(handlers::get_facets))
        .route("/catalog/:content_type/:id", get(handlers::get_content))
        .route("/search", get(handlers::search_content))
        .route("/trending", get(handlers::get_trending))
        .route("/analytics", get(handlers::get_analytics))
        // Per-session state
        .route(
            "/session",
            get(handlers::get_session).delete(handlers::end_session),
        )
        .route(
            "/watchlist",
            get(handlers::get_watchlist).post(handlers::add_to_watchlist),
        )
        .route(
            "/watchlist/:content_type/:id",
            delete(handlers::remove_from_watchlist),
        )
        .route(
            "/history",
            get(handlers::get_history).post(handlers::record_view),
        )
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(session_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_session_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
