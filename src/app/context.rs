//! Shared clients and cache-first list loading.

use anyhow::{Context, Result};
use log::{debug, warn};

use crate::api::ApiClient;
use crate::cache::{FileStore, SessionCache, SystemClock};
use crate::checko::CheckoClient;
use crate::config::Config;
use crate::error_handling::{ApiError, CheckoError};
use crate::initialization::init_client;
use crate::models::{BlacklistEntry, SupplierRecord};

/// Everything a command needs: configuration, clients and the session cache.
pub struct AppContext {
    pub config: Config,
    pub http: reqwest::Client,
    pub api: ApiClient,
    pub cache: SessionCache<FileStore, SystemClock>,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let http = init_client(&config).context("Failed to initialize HTTP client")?;
        let api = ApiClient::new(&config.api_base_url, http.clone())
            .context("Failed to initialize backend client")?;
        let cache = SessionCache::from_config(&config);
        Ok(Self {
            config,
            http,
            api,
            cache,
        })
    }

    /// Registry client; fails without an API key.
    pub fn checko(&self) -> Result<CheckoClient, CheckoError> {
        CheckoClient::from_config(&self.config, self.http.clone())
    }

    /// Suppliers from the cache, or from the backend on a miss.
    pub async fn suppliers(&self) -> Result<Vec<SupplierRecord>, ApiError> {
        if let Some(cached) = self.cache.get_cached_suppliers() {
            debug!("Using {} cached suppliers", cached.len());
            return Ok(cached);
        }
        let suppliers = self.api.list_suppliers().await?;
        if let Err(e) = self.cache.set_cached_suppliers(&suppliers) {
            warn!("Suppliers not cached: {}", e);
        }
        Ok(suppliers)
    }

    /// Blacklist from the cache, or from the backend on a miss.
    pub async fn blacklist(&self) -> Result<Vec<BlacklistEntry>, ApiError> {
        if let Some(cached) = self.cache.get_cached_blacklist() {
            debug!("Using {} cached blacklist entries", cached.len());
            return Ok(cached);
        }
        let blacklist = self.api.list_blacklist().await?;
        if let Err(e) = self.cache.set_cached_blacklist(&blacklist) {
            warn!("Blacklist not cached: {}", e);
        }
        Ok(blacklist)
    }
}
