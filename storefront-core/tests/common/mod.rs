//! Test helpers shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Once};
use std::time::Duration;

use storefront_core::catalog::{FeedSource, StaticFeed};
use storefront_core::{FeedError, MemoryPage, PageController, StorefrontConfig};

/// Initialize logging for tests (only once per test run)
static INIT: Once = Once::new();

pub fn init_test_logging() {
    INIT.call_once(|| {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_test_writer()
                    .with_target(true)
                    .with_level(true),
            )
            .with(tracing_subscriber::filter::EnvFilter::from_default_env())
            .try_init();
    });
}

/// The two-product feed used by the worked examples
pub const REFERENCE_FEED: &str = r#"[
  {"id": 1, "name": "Moringa Powder", "category": "leaf", "price": 199, "originalPrice": 249},
  {"id": 2, "name": "Ashwagandha", "category": "root", "price": 299}
]"#;

/// A fuller feed: images, variants, an inactive record, and a product with
/// neither images nor icon
pub const SHOP_FEED: &str = r#"[
  {
    "id": 1,
    "name": "Moringa Powder",
    "category": "leaf",
    "price": 199,
    "originalPrice": 249,
    "images": ["img/moringa-1.jpg", "img/moringa-2.jpg"],
    "variants": ["250g", "500g", "1kg"],
    "variantPricing": {
      "250g": {"price": 119, "originalPrice": 149},
      "1kg": {"price": 379}
    },
    "rating": 4.7,
    "reviews": 128,
    "benefits": ["Rich in iron", "Supports immunity"],
    "description": "Shade-dried moringa leaves, stone ground."
  },
  {
    "id": 2,
    "name": "Ashwagandha",
    "category": "root",
    "price": 299,
    "icon": "fa-seedling",
    "description": "Traditional adaptogen root powder."
  },
  {
    "id": 3,
    "name": "Tulsi Tea",
    "category": "leaf",
    "price": 149,
    "originalPrice": 199,
    "active": false
  },
  {
    "id": 4,
    "name": "Beetroot Powder",
    "category": "root",
    "price": 179,
    "originalPrice": 179
  },
  {
    "id": 5,
    "name": "Curry Leaf Powder",
    "category": "leaf",
    "price": 99,
    "originalPrice": 150,
    "benefits": ["Aids digestion"]
  }
]"#;

/// Controller over an in-memory page with the given containers
pub fn controller_with(feed: &str, containers: &[&str]) -> PageController<MemoryPage> {
    PageController::with_source(
        MemoryPage::with_containers(containers.iter().copied()),
        StorefrontConfig::default(),
        Arc::new(StaticFeed::new(feed)),
    )
}

/// Feed that answers after `delay`, like a slow network
pub struct SlowFeed {
    pub body: String,
    pub delay: Duration,
}

#[async_trait]
impl FeedSource for SlowFeed {
    async fn fetch(&self) -> Result<String, FeedError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.body.clone())
    }

    fn describe(&self) -> String {
        "slow feed".to_string()
    }
}

/// Like [`controller_with`], but the feed takes `delay` to arrive
pub fn slow_controller_with(
    feed: &str,
    delay: Duration,
    containers: &[&str],
) -> PageController<MemoryPage> {
    PageController::with_source(
        MemoryPage::with_containers(containers.iter().copied()),
        StorefrontConfig::default(),
        Arc::new(SlowFeed {
            body: feed.to_string(),
            delay,
        }),
    )
}

/// Write `feed` to `data/products.json` under `root`
pub fn write_feed(root: &Path, feed: &str) -> PathBuf {
    let data_dir = root.join("data");
    std::fs::create_dir_all(&data_dir).unwrap();
    let path = data_dir.join("products.json");
    std::fs::write(&path, feed).unwrap();
    path
}

/// Product ids in the order their cards appear in `html`
pub fn card_ids(html: &str) -> Vec<String> {
    let marker = "class=\"product-card\" data-product-id=\"";
    html.match_indices(marker)
        .map(|(start, _)| {
            let rest = &html[start + marker.len()..];
            rest[..rest.find('"').unwrap()].to_string()
        })
        .collect()
}
