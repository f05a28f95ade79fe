//! Storefront catalog library exports

pub mod catalog;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod events;
pub mod page;
pub mod render;
pub mod search;

pub use config::StorefrontConfig;
pub use controller::PageController;
pub use error::{FeedError, Result, StorefrontError};
pub use events::{CatalogEvent, EventBus};
pub use page::{MemoryPage, Page, PriceDisplay};
