use axum::{extract::State, routing::get, Json, Router};
use frostpage_core::site_config::StreamSettings;

use crate::state::AppState;

/// Public configuration the frontend needs.
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/config/stream", get(stream))
}

async fn stream(State(state): State<AppState>) -> Json<StreamSettings> {
    Json(state.site_config().current().await.stream.clone())
}
