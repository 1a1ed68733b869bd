use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use frostpage_core::images::{CleanupReport, ScanReport};
use frostpage_core::{ContentType, Post};
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::middleware::auth::AdminUser;
use crate::state::AppState;

/// Admin-only content management. Every handler takes [`AdminUser`].
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/cleanup/scan", get(scan_images))
        .route("/api/admin/cleanup/execute", post(execute_cleanup))
        .route("/api/admin/config/reload", post(reload_config))
        .route("/api/admin/{content_type}", get(list_drafts).post(save_post))
        .route("/api/admin/{content_type}/{post_id}", delete(delete_post))
        .route("/api/admin/{content_type}/{post_id}/publish", post(publish_post))
        .route("/api/admin/{content_type}/{post_id}/edit", post(edit_post))
}

#[derive(Debug, Serialize)]
struct ActionResponse {
    success: bool,
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    post: Option<Post>,
}

impl ActionResponse {
    fn ok(message: &'static str, post: Option<Post>) -> Json<Self> {
        Json(Self {
            success: true,
            message,
            post,
        })
    }
}

async fn list_drafts(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(content_type): Path<String>,
) -> ApiResult<Json<Vec<Post>>> {
    let content_type: ContentType = content_type.parse()?;
    Ok(Json(state.content().list_drafts(content_type).await?))
}

async fn save_post(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(content_type): Path<String>,
    Json(post): Json<Post>,
) -> ApiResult<Json<Post>> {
    let content_type: ContentType = content_type.parse()?;
    Ok(Json(state.content().save(content_type, post).await?))
}

async fn publish_post(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path((content_type, post_id)): Path<(String, String)>,
) -> ApiResult<Json<ActionResponse>> {
    let content_type: ContentType = content_type.parse()?;
    let post = state.content().publish(content_type, &post_id).await?;
    Ok(ActionResponse::ok("published", Some(post)))
}

async fn edit_post(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path((content_type, post_id)): Path<(String, String)>,
) -> ApiResult<Json<ActionResponse>> {
    let content_type: ContentType = content_type.parse()?;
    let post = state.content().edit(content_type, &post_id).await?;
    Ok(ActionResponse::ok(
        "reopened for editing; removed from public view",
        Some(post),
    ))
}

async fn delete_post(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path((content_type, post_id)): Path<(String, String)>,
) -> ApiResult<Json<ActionResponse>> {
    let content_type: ContentType = content_type.parse()?;
    state.content().delete(content_type, &post_id).await?;
    Ok(ActionResponse::ok("deleted", None))
}

async fn scan_images(_admin: AdminUser, State(state): State<AppState>) -> ApiResult<Json<ScanReport>> {
    Ok(Json(state.cleanup().scan().await?))
}

#[derive(Debug, Serialize)]
struct CleanupResponse {
    success: bool,
    #[serde(flatten)]
    report: CleanupReport,
}

async fn execute_cleanup(
    admin: AdminUser,
    State(state): State<AppState>,
) -> ApiResult<Json<CleanupResponse>> {
    let report = state.cleanup().execute().await?;
    tracing::info!(username = %admin.username, deleted = report.deleted_count, "image cleanup run");
    Ok(Json(CleanupResponse {
        success: true,
        report,
    }))
}

async fn reload_config(_admin: AdminUser, State(state): State<AppState>) -> ApiResult<Json<Value>> {
    state.site_config().reload().await?;
    Ok(Json(json!({ "success": true })))
}
