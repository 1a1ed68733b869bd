use tower_http::limit::RequestBodyLimitLayer;

/// Posts are small JSON documents; anything bigger is refused with 413.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

pub fn body_limit_layer() -> RequestBodyLimitLayer {
    RequestBodyLimitLayer::new(MAX_BODY_BYTES)
}
