pub mod error;
pub mod routes;
pub mod state;

use axum::Router;
use botstate_core::BotStore;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Build the Axum application router.
pub fn build_router(store: Arc<dyn BotStore>) -> Router {
    let app_state = Arc::new(state::AppState::new(store));

    Router::new()
        .merge(routes::api_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Start the API server.
pub async fn start_server(store: Arc<dyn BotStore>, bind_addr: &str) -> anyhow::Result<()> {
    let app = build_router(store);
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("API server listening on {}", bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
