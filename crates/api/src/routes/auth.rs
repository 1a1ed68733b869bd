use axum::{extract::State, routing::{get, post}, Json, Router};
use frostpage_core::auth::{issue_token, verify_admin, AuthError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::middleware::auth::AdminUser;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/verify", get(verify))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let config = state.site_config().current().await;
    if !verify_admin(&config, &payload.username, &payload.password) {
        tracing::warn!(username = %payload.username, "failed admin login");
        return Err(AuthError::InvalidCredentials.into());
    }

    let access_token = issue_token(&config.jwt, &payload.username)?;
    tracing::info!(username = %payload.username, "admin logged in");
    Ok(Json(LoginResponse {
        access_token,
        token_type: "bearer",
    }))
}

async fn verify(admin: AdminUser) -> Json<Value> {
    Json(json!({ "valid": true, "username": admin.username }))
}
