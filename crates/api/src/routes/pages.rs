use std::path::Path;

use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

use crate::state::AppState;

/// Static frontend and uploaded images.
pub fn routes(frontend_dir: &Path, images_dir: &Path) -> Router<AppState> {
    let admin_dir = frontend_dir.join("admin");
    Router::new()
        .route_service("/", ServeFile::new(frontend_dir.join("index.html")))
        .route_service("/admin", ServeFile::new(admin_dir.join("index.html")))
        .route_service("/admin/login", ServeFile::new(admin_dir.join("login.html")))
        .nest_service("/css", ServeDir::new(frontend_dir.join("css")))
        .nest_service("/js", ServeDir::new(frontend_dir.join("js")))
        .nest_service("/pages", ServeDir::new(frontend_dir.join("pages")))
        .nest_service("/admin-static", ServeDir::new(admin_dir))
        .nest_service("/images", ServeDir::new(frontend_dir.join("images")))
        .nest_service("/media/images", ServeDir::new(images_dir))
}
