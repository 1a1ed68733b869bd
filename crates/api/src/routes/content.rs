use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use frostpage_core::content::announcement::AnnouncementView;
use frostpage_core::{ContentType, Post};

use crate::error::ApiResult;
use crate::state::AppState;

/// Public, unauthenticated views of published content.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/content/{content_type}", get(list_published))
        .route("/api/content/{content_type}/{post_id}", get(get_published))
        .route("/api/announcement", get(announcement))
}

async fn list_published(
    State(state): State<AppState>,
    Path(content_type): Path<String>,
) -> ApiResult<Json<Vec<Post>>> {
    let content_type: ContentType = content_type.parse()?;
    Ok(Json(state.content().list_published(content_type).await?))
}

async fn get_published(
    State(state): State<AppState>,
    Path((content_type, post_id)): Path<(String, String)>,
) -> ApiResult<Json<Post>> {
    let content_type: ContentType = content_type.parse()?;
    Ok(Json(
        state.content().get_published(content_type, &post_id).await?,
    ))
}

async fn announcement(State(state): State<AppState>) -> ApiResult<Json<AnnouncementView>> {
    let posts = state
        .content()
        .list_published(ContentType::Announcement)
        .await?;
    Ok(Json(AnnouncementView::from_published(&posts)))
}
