use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;

use crate::error::StorageError;
use crate::store::document::{read_json, write_json};

/// Site configuration stored in `admin_data/config.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    pub admin: AdminCredentials,
    pub jwt: JwtSettings,
    #[serde(default)]
    pub stream: StreamSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminCredentials {
    pub username: String,
    /// Plaintext, or an argon2 PHC string (`$argon2id$...`).
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JwtSettings {
    pub secret_key: String,
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    #[serde(default = "default_expire_minutes")]
    pub access_token_expire_minutes: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamSettings {
    pub url: String,
    pub name: String,
}

fn default_algorithm() -> String {
    "HS256".to_string()
}

fn default_expire_minutes() -> i64 {
    1440
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            url: "https://n10as.radiocult.fm/stream".to_string(),
            name: "RadioCult.fm".to_string(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            admin: AdminCredentials {
                username: "admin".to_string(),
                password: "password".to_string(),
            },
            jwt: JwtSettings {
                secret_key: "your-secret-key-change-in-production".to_string(),
                algorithm: default_algorithm(),
                access_token_expire_minutes: default_expire_minutes(),
            },
            stream: StreamSettings::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SiteConfigError {
    #[error("site config not found: {}", path.display())]
    Missing { path: PathBuf },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl SiteConfig {
    /// Load the config, writing the defaults first if the file is missing.
    pub async fn load_or_init(path: &Path) -> Result<Self, SiteConfigError> {
        if let Some(config) = read_json(path).await? {
            return Ok(config);
        }
        let config = SiteConfig::default();
        write_json(path, &config).await?;
        tracing::warn!(
            path = %path.display(),
            "site config created with default credentials; change them"
        );
        Ok(config)
    }
}

/// Shared, load-once view of the site config. Changes on disk take effect
/// only through [`SiteConfigHandle::reload`].
#[derive(Debug, Clone)]
pub struct SiteConfigHandle {
    path: PathBuf,
    current: Arc<RwLock<Arc<SiteConfig>>>,
}

impl SiteConfigHandle {
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, SiteConfigError> {
        let path = path.into();
        let config = SiteConfig::load_or_init(&path).await?;
        Ok(Self {
            path,
            current: Arc::new(RwLock::new(Arc::new(config))),
        })
    }

    pub async fn current(&self) -> Arc<SiteConfig> {
        self.current.read().await.clone()
    }

    /// Re-read the file. On failure the previous config stays in effect;
    /// a missing file is a failure, never a reset to the defaults.
    pub async fn reload(&self) -> Result<Arc<SiteConfig>, SiteConfigError> {
        let config = read_json::<SiteConfig>(&self.path)
            .await?
            .ok_or_else(|| SiteConfigError::Missing {
                path: self.path.clone(),
            })?;
        let config = Arc::new(config);
        *self.current.write().await = config.clone();
        tracing::info!(path = %self.path.display(), "site config reloaded");
        Ok(config)
    }
}
