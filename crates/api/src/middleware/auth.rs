use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use frostpage_core::auth::verify_token;

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated admin. Adding this extractor to a handler makes the
/// route require `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub username: String,
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::Unauthorized)?;

        let config = state.site_config().current().await;
        let claims = verify_token(&config.jwt, bearer.token())?;
        // Tokens issued before a username change stop working.
        if claims.sub != config.admin.username {
            return Err(ApiError::Unauthorized);
        }

        Ok(AdminUser {
            username: claims.sub,
        })
    }
}
