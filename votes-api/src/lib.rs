pub mod negotiation;
pub mod payload;
pub mod renderer;
pub mod routes;
pub mod state;
pub mod templates;

use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use votes_errors::AppError;

pub use state::AppState;

/// Builds the full HTTP application around an already-connected state.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::create_votes_router())
        .fallback(|| async { AppError::NotFound })
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
