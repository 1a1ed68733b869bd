pub mod audit;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::Router;
use tower::ServiceBuilder;

use crate::state::AppState;

/// The full application: every route group plus tracing, CORS and body limits.
pub fn build_app(state: AppState) -> Router {
    routes::build_router(state).layer(
        ServiceBuilder::new()
            .layer(middleware::request_tracing::trace_layer())
            .layer(middleware::cors::cors_layer())
            .layer(tower_http::map_response_body::MapResponseBodyLayer::new(axum::body::Body::new))
            .layer(middleware::body_limit::body_limit_layer()),
    )
}
