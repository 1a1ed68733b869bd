use tower_http::cors::{Any, CorsLayer};

/// Build the CORS layer. The site's API is public; admin routes are guarded by bearer tokens.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
