pub mod admin;
pub mod auth;
pub mod chat;
pub mod config;
pub mod content;
pub mod health;
pub mod pages;

use axum::Router;

use crate::state::AppState;

/// Assemble the full router with all route groups.
pub fn build_router(state: AppState) -> Router {
    let frontend_dir = state.config().frontend_dir.clone();
    let images_dir = state.content().store().layout().images_dir();

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(admin::routes())
        .merge(content::routes())
        .merge(config::routes())
        .merge(chat::routes())
        .merge(pages::routes(&frontend_dir, &images_dir))
        .with_state(state)
}
