//! Storefront catalog - the product list and everything derived from it
//!
//! # Overview
//!
//! The catalog is loaded once per page view from a static JSON feed and is
//! read-only afterwards. Filtering, sorting, and search all produce derived
//! views over that one list.
//!
//! # Architecture
//!
//! ```text
//! data/products.json (file or HTTP)
//!     │
//!     ▼
//! FeedSource ──► parse_feed ──► CatalogStore (loaded once)
//!                                   │
//!                   ┌───────────────┼────────────────┐
//!                   ▼               ▼                ▼
//!             query (filter/   search (substring   render (HTML
//!             sort/related)    + highlight)        fragments)
//! ```

mod feed;
mod product;
pub mod query;
mod source;
mod store;

pub use feed::{parse_feed, FeedSnapshot};
pub use product::{
    discount_percentage, format_amount, Product, ProductId, VariantPrice, DEFAULT_RATING,
    DEFAULT_VARIANT,
};
pub use query::{
    featured_products, filter_by_category, product_by_id, products_by_category, related_products,
    sort, FeaturedProduct, SortKey, ALL_CATEGORIES,
};
pub use source::{source_for, FeedSource, FileFeed, HttpFeed, StaticFeed, DEFAULT_FEED_PATH};
pub use store::{CatalogStore, LoadOutcome, LoadState, StoreStatus};
