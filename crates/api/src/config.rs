use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use frostpage_core::store::RecoveryPolicy;

/// Process configuration loaded from environment variables.
///
/// Admin credentials, JWT settings and the stream URL are not here; they live
/// in the site config document under the data directory.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server host to bind to.
    pub host: String,
    /// Server port to bind to.
    pub port: u16,
    /// Root holding `admin_data/` and `user_data/`.
    pub data_dir: PathBuf,
    /// Static frontend (index.html, css/, js/, pages/, admin/, images/).
    pub frontend_dir: PathBuf,
    /// Event bus channel capacity.
    pub event_bus_capacity: usize,
    /// What to do with a content document that fails to parse.
    pub storage_recovery: RecoveryPolicy,
    /// Log level (e.g., "info", "debug", "trace").
    pub log_level: String,
}

#[derive(Debug, thiserror::Error)]
#[error("{name} is invalid: {message}")]
pub struct ConfigError {
    name: &'static str,
    message: String,
}

impl AppConfig {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parsed("PORT", 8000)?,
            data_dir: env::var("DATA_DIR").unwrap_or_else(|_| ".".to_string()).into(),
            frontend_dir: env::var("FRONTEND_DIR")
                .unwrap_or_else(|_| "frontend".to_string())
                .into(),
            event_bus_capacity: parsed("EVENT_BUS_CAPACITY", 1024)?,
            storage_recovery: parsed("STORAGE_RECOVERY", RecoveryPolicy::Empty)?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Defaults rooted at `data_dir`, without consulting the environment.
    pub fn for_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            frontend_dir: data_dir.join("frontend"),
            data_dir,
            event_bus_capacity: 1024,
            storage_recovery: RecoveryPolicy::Empty,
            log_level: "info".to_string(),
        }
    }

    /// Build the socket address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parsed<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError {
            name,
            message: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}
