pub mod dto;
pub mod problem;
pub mod routes;
pub mod state;
pub mod trace;

use axum::Router;
use state::AppState;

/// Assemble the full HTTP application.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::webhook::router())
        .merge(routes::capture::router())
        .merge(routes::live::router())
        .layer(axum::middleware::from_fn(trace::trace_middleware))
        .with_state(state)
}
