//! Feed sources - where the product feed is read from
//!
//! - File (the static `data/products.json` next to the site)
//! - HTTP (the same file served by the storefront host, `http` feature)
//! - Static (in-memory body, for tests and embedding)

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::FeedError;

/// Default relative path of the product feed
pub const DEFAULT_FEED_PATH: &str = "data/products.json";

/// Something that can produce the raw feed body
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Read the whole feed body
    async fn fetch(&self) -> Result<String, FeedError>;

    /// Human-readable location for logs
    fn describe(&self) -> String;
}

/// Feed read from the local filesystem
#[derive(Debug, Clone)]
pub struct FileFeed {
    path: PathBuf,
}

impl FileFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl FeedSource for FileFeed {
    async fn fetch(&self) -> Result<String, FeedError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| FeedError::Io {
                path: self.path.display().to_string(),
                source,
            })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Feed served over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpFeed {
    url: String,
    #[cfg_attr(not(feature = "http"), allow(dead_code))]
    timeout: Duration,
}

impl HttpFeed {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl FeedSource for HttpFeed {
    async fn fetch(&self) -> Result<String, FeedError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("storefront/", env!("CARGO_PKG_VERSION")))
            .timeout(self.timeout)
            .build()
            .map_err(|e| FeedError::Transport(format!("failed to create HTTP client: {e}")))?;

        let response = client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| FeedError::Transport(format!("failed to fetch {}: {e}", self.url)))?;

        if !response.status().is_success() {
            return Err(FeedError::HttpStatus {
                status: response.status().as_u16(),
                url: self.url.clone(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| FeedError::Transport(format!("failed to read response body: {e}")))
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Stub for when the http feature is disabled
#[cfg(not(feature = "http"))]
#[async_trait]
impl FeedSource for HttpFeed {
    async fn fetch(&self) -> Result<String, FeedError> {
        Err(FeedError::Unsupported(format!(
            "{} (remote feeds need the 'http' feature)",
            self.url
        )))
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Feed body held in memory
#[derive(Debug, Clone)]
pub struct StaticFeed {
    body: String,
}

impl StaticFeed {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }
}

#[async_trait]
impl FeedSource for StaticFeed {
    async fn fetch(&self) -> Result<String, FeedError> {
        Ok(self.body.clone())
    }

    fn describe(&self) -> String {
        "<inline feed>".to_string()
    }
}

/// Pick a source for a location string: `http(s)://` URLs go over the
/// network, anything else is a file path.
pub fn source_for(location: &str, timeout: Duration) -> Box<dyn FeedSource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Box::new(HttpFeed::new(location, timeout))
    } else {
        Box::new(FileFeed::new(location))
    }
}
