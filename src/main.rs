use streamflix_catalog::{
    api::{create_router, AppState},
    config::Config,
    services::{CatalogStore, FileCatalogSource},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .init();

    // A missing or broken catalog is not fatal: serve an empty one and report why
    let source = FileCatalogSource::new(&config.catalog_path);
    let (catalog, load_error) = CatalogStore::load_or_empty(&source).await;

    let state = AppState::new(catalog)
        .with_history_capacity(config.history_capacity)
        .with_session_idle_timeout(config.session_idle_timeout())
        .with_max_sessions(config.max_sessions)
        .with_catalog_warning(load_error.map(|e| e.to_string()));

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %config.bind_addr(), "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
