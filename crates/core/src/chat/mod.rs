//! Public chat log, persisted as `{ "messages": [...] }`, oldest first.

use std::path::PathBuf;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::StorageError;
use crate::store::document::{read_json, write_json};

/// Only the newest messages are kept.
pub const MAX_MESSAGES: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub user: String,
    pub text: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatDocument {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("message {0} not found")]
    NotFound(String),
    #[error("{0} cannot be empty")]
    Empty(&'static str),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug)]
pub struct ChatLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl ChatLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// The last `limit` messages; all of them when `limit` is zero.
    pub async fn list(&self, limit: usize) -> Result<Vec<ChatMessage>, ChatError> {
        let mut messages = self.load().await?;
        if limit > 0 && messages.len() > limit {
            messages.drain(..messages.len() - limit);
        }
        Ok(messages)
    }

    pub async fn post(
        &self,
        user: &str,
        text: &str,
        timestamp: Option<String>,
    ) -> Result<ChatMessage, ChatError> {
        if user.trim().is_empty() {
            return Err(ChatError::Empty("user"));
        }
        if text.trim().is_empty() {
            return Err(ChatError::Empty("text"));
        }

        let message = ChatMessage {
            id: Uuid::new_v4().to_string(),
            user: user.to_string(),
            text: text.to_string(),
            timestamp: timestamp
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| Utc::now().to_rfc3339()),
        };

        let _guard = self.write_lock.lock().await;
        let mut messages = self.load().await?;
        messages.push(message.clone());
        if messages.len() > MAX_MESSAGES {
            messages.drain(..messages.len() - MAX_MESSAGES);
        }
        self.store(messages).await?;
        Ok(message)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ChatError> {
        let _guard = self.write_lock.lock().await;
        let mut messages = self.load().await?;
        let before = messages.len();
        messages.retain(|m| m.id != id);
        if messages.len() == before {
            return Err(ChatError::NotFound(id.to_string()));
        }
        self.store(messages).await?;
        Ok(())
    }

    pub async fn clear(&self) -> Result<(), ChatError> {
        let _guard = self.write_lock.lock().await;
        self.store(Vec::new()).await?;
        tracing::info!("chat log cleared");
        Ok(())
    }

    async fn load(&self) -> Result<Vec<ChatMessage>, ChatError> {
        let doc: Option<ChatDocument> = read_json(&self.path).await?;
        Ok(doc.unwrap_or_default().messages)
    }

    async fn store(&self, messages: Vec<ChatMessage>) -> Result<(), ChatError> {
        write_json(&self.path, &ChatDocument { messages }).await?;
        Ok(())
    }
}
