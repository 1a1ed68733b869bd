use axum::{
    extract::{Path, Query, State},
    routing::{delete, get},
    Json, Router,
};
use frostpage_core::chat::ChatMessage;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::middleware::auth::AdminUser;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/chat/messages",
            get(list_messages)
                .post(send_message)
                .delete(clear_messages),
        )
        .route("/api/chat/messages/{message_id}", delete(delete_message))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    50
}

#[derive(Debug, Serialize)]
pub struct MessagesResponse {
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
pub struct SendMessage {
    pub user: String,
    pub text: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

async fn list_messages(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<MessagesResponse>> {
    let messages = state.chat().list(query.limit).await?;
    Ok(Json(MessagesResponse { messages }))
}

async fn send_message(
    State(state): State<AppState>,
    Json(payload): Json<SendMessage>,
) -> ApiResult<Json<Value>> {
    let message = state
        .chat()
        .post(&payload.user, &payload.text, payload.timestamp)
        .await?;
    Ok(Json(json!({ "success": true, "message": message })))
}

async fn delete_message(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(message_id): Path<String>,
) -> ApiResult<Json<Value>> {
    state.chat().delete(&message_id).await?;
    Ok(Json(json!({ "success": true })))
}

async fn clear_messages(_admin: AdminUser, State(state): State<AppState>) -> ApiResult<Json<Value>> {
    state.chat().clear().await?;
    Ok(Json(json!({ "success": true })))
}
