//! Storefront configuration
//!
//! Every field has a default, so an empty (or missing) `storefront.yaml`
//! yields the stock storefront behaviour.
//!
//! Resolution order:
//! 1. Explicit path (`--config`); it must exist
//! 2. `storefront.yaml` in the current directory
//! 3. `storefront.yaml` in the platform config directory
//! 4. Built-in defaults
//!
//! `STOREFRONT_FEED` overrides the feed location from any of the above.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::catalog::{
    source_for, FeedSource, DEFAULT_FEED_PATH, DEFAULT_RATING, DEFAULT_VARIANT,
};
use crate::catalog::query::{DEFAULT_FEATURED_LIMIT, DEFAULT_RELATED_LIMIT};
use crate::error::{Result, StorefrontError};
use crate::render::RenderOptions;
use crate::search::{MIN_QUERY_LEN, RESULT_LIMIT};

pub const CONFIG_FILE_NAME: &str = "storefront.yaml";
pub const FEED_ENV_VAR: &str = "STOREFRONT_FEED";

/// Ids of the page containers the controller writes into
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementIds {
    pub grid: String,
    pub search_results: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            grid: "productGrid".to_string(),
            search_results: "searchResults".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Quiet period after the last keystroke before searching
    pub debounce_ms: u64,
    pub min_query_len: usize,
    pub result_limit: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            min_query_len: MIN_QUERY_LEN,
            result_limit: RESULT_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    pub related_limit: usize,
    pub featured_limit: usize,
    pub default_rating: f64,
    pub default_variant: String,
    pub currency_symbol: String,
    pub fallback_icon: String,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            related_limit: DEFAULT_RELATED_LIMIT,
            featured_limit: DEFAULT_FEATURED_LIMIT,
            default_rating: DEFAULT_RATING,
            default_variant: DEFAULT_VARIANT.to_string(),
            currency_symbol: "₹".to_string(),
            fallback_icon: "fa-leaf".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorefrontConfig {
    /// Feed location: file path or `http(s)://` URL
    pub feed: String,
    pub elements: ElementIds,
    pub search: SearchSettings,
    pub catalog: CatalogSettings,
    pub detail_page: String,
    pub http_timeout_secs: u64,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            feed: DEFAULT_FEED_PATH.to_string(),
            elements: ElementIds::default(),
            search: SearchSettings::default(),
            catalog: CatalogSettings::default(),
            detail_page: "product-detail.html".to_string(),
            http_timeout_secs: 30,
        }
    }
}

impl StorefrontConfig {
    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to an empty map
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml_ng::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            StorefrontError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::from_yaml(&content)?;
        info!("Loaded storefront config from {}", path.display());
        Ok(config)
    }

    /// Resolve the configuration and apply environment overrides
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        let config = Self::discover_in(explicit, &Self::candidate_paths())?;
        Ok(config.with_env_overrides())
    }

    /// First match among `explicit` and `candidates`, else defaults
    pub fn discover_in(explicit: Option<&Path>, candidates: &[PathBuf]) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(StorefrontError::Config(format!(
                    "Config file does not exist: {}",
                    path.display()
                )));
            }
            return Self::load_from_path(path);
        }

        for candidate in candidates {
            if candidate.is_file() {
                return Self::load_from_path(candidate);
            }
            debug!("No config at {}", candidate.display());
        }

        debug!("Using default storefront config");
        Ok(Self::default())
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
        if let Some(dirs) = directories::ProjectDirs::from("", "", "storefront") {
            paths.push(dirs.config_dir().join(CONFIG_FILE_NAME));
        }
        paths
    }

    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(feed) = std::env::var(FEED_ENV_VAR) {
            if !feed.trim().is_empty() {
                debug!("Feed location overridden by {}: {}", FEED_ENV_VAR, feed);
                self.feed = feed;
            }
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.feed.trim().is_empty() {
            return Err(StorefrontError::Config("feed must not be empty".into()));
        }
        if self.elements.grid.is_empty() || self.elements.search_results.is_empty() {
            return Err(StorefrontError::Config(
                "element ids must not be empty".into(),
            ));
        }
        if self.search.result_limit == 0 {
            return Err(StorefrontError::Config(
                "search.result_limit must be at least 1".into(),
            ));
        }
        let rating = self.catalog.default_rating;
        if !(0.0..=5.0).contains(&rating) {
            return Err(StorefrontError::Config(format!(
                "catalog.default_rating must be between 0 and 5 (got {rating})"
            )));
        }
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.search.debounce_ms)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            currency_symbol: self.catalog.currency_symbol.clone(),
            default_rating: self.catalog.default_rating,
            default_variant: self.catalog.default_variant.clone(),
            fallback_icon: self.catalog.fallback_icon.clone(),
            detail_page: self.detail_page.clone(),
        }
    }

    pub fn feed_source(&self) -> Arc<dyn FeedSource> {
        Arc::from(source_for(&self.feed, self.http_timeout()))
    }
}
