use std::sync::Arc;

use frostpage_core::chat::ChatLog;
use frostpage_core::events::EventBus;
use frostpage_core::images::CleanupScanner;
use frostpage_core::lifecycle::ContentService;
use frostpage_core::site_config::SiteConfigHandle;
use frostpage_core::Site;

use crate::config::AppConfig;

/// Shared application state, passed to all handlers via Axum's `State` extractor.
/// Wrapped in `Arc` so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    config: AppConfig,
    site: Site,
    site_config: SiteConfigHandle,
}

impl AppState {
    pub fn new(config: AppConfig, site: Site, site_config: SiteConfigHandle) -> Self {
        Self {
            inner: Arc::new(InnerState {
                config,
                site,
                site_config,
            }),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn content(&self) -> &ContentService {
        &self.inner.site.content
    }

    pub fn cleanup(&self) -> &CleanupScanner {
        &self.inner.site.cleanup
    }

    pub fn chat(&self) -> &ChatLog {
        &self.inner.site.chat
    }

    pub fn site_config(&self) -> &SiteConfigHandle {
        &self.inner.site_config
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.inner.site.events
    }
}
