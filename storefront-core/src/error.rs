use thiserror::Error;

use crate::catalog::ProductId;

/// Failures while fetching or validating a product feed.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("IO error reading feed {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Feed request failed: HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Feed transport error: {0}")]
    Transport(String),

    #[error("Feed JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Feed record {index} is malformed: {source}")]
    Record {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Duplicate product id '{0}' in feed")]
    DuplicateId(ProductId),

    #[error("Product '{id}' is invalid: {reason}")]
    InvalidProduct { id: ProductId, reason: String },

    #[error("Feed source not supported: {0}")]
    Unsupported(String),
}

#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generic error: {0}")]
    Generic(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, StorefrontError>;
