//! Catalog store - the one in-memory product list of a page view
//!
//! The store starts empty, is filled by exactly one load (or `set`), and is
//! read-only afterwards. Any later load attempt, including one issued while
//! the first is still in flight or after it failed, is a no-op. Readers that
//! need the real list rather than the empty placeholder can wait for the
//! in-flight load with [`CatalogStore::settled`].

use chrono::{DateTime, Utc};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::watch;
use tracing::{debug, error, info};

use super::feed::{parse_feed, FeedSnapshot};
use super::product::{Product, ProductId};
use super::source::FeedSource;
use crate::error::FeedError;

/// Lifecycle of the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    Failed,
}

/// What a call to [`CatalogStore::load`] did
#[derive(Debug)]
pub enum LoadOutcome {
    /// Feed fetched and installed
    Loaded { count: usize, inactive: usize },
    /// A load already ran or is running; nothing was fetched
    Skipped(LoadState),
    /// Fetch or validation failed; the store stays empty
    Failed(FeedError),
}

impl LoadOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, LoadOutcome::Failed(_))
    }
}

/// Point-in-time view of the store for diagnostics
#[derive(Debug, Clone)]
pub struct StoreStatus {
    pub state: LoadState,
    pub count: usize,
    pub loaded_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

#[derive(Debug)]
struct Inner {
    state: LoadState,
    products: Arc<[Product]>,
    loaded_at: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

#[derive(Debug)]
pub struct CatalogStore {
    inner: RwLock<Inner>,
    state_tx: watch::Sender<LoadState>,
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogStore {
    /// Create an empty, unloaded store
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                state: LoadState::Idle,
                products: Arc::from(Vec::new()),
                loaded_at: None,
                last_error: None,
            }),
            state_tx: watch::Sender::new(LoadState::Idle),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Claim the single load slot; returns the current state when taken
    fn begin(&self) -> Result<(), LoadState> {
        let mut inner = self.write();
        if inner.state != LoadState::Idle {
            return Err(inner.state);
        }
        inner.state = LoadState::Loading;
        self.state_tx.send_replace(LoadState::Loading);
        Ok(())
    }

    /// Fetch the feed once and install its active products
    pub async fn load(&self, source: &dyn FeedSource) -> LoadOutcome {
        if let Err(state) = self.begin() {
            debug!(?state, "Catalog already loading or loaded, skipping fetch");
            return LoadOutcome::Skipped(state);
        }

        let location = source.describe();
        debug!("Fetching product feed from {}", location);

        let result = match source.fetch().await {
            Ok(body) => parse_feed(&body),
            Err(e) => Err(e),
        };

        match result {
            Ok(snapshot) => {
                info!(
                    "Loaded {} products from {} ({} inactive skipped)",
                    snapshot.products.len(),
                    location,
                    snapshot.inactive
                );
                self.install(snapshot)
            }
            Err(e) => {
                error!("Error loading products from {}: {}", location, e);
                self.fail(e)
            }
        }
    }

    /// Install a list directly; counts as the store's one load
    pub fn set(&self, products: Vec<Product>) -> LoadOutcome {
        if let Err(state) = self.begin() {
            debug!(?state, "Catalog already populated, ignoring set");
            return LoadOutcome::Skipped(state);
        }
        match FeedSnapshot::from_products(products) {
            Ok(snapshot) => self.install(snapshot),
            Err(e) => {
                error!("Rejected product list: {}", e);
                self.fail(e)
            }
        }
    }

    fn install(&self, snapshot: FeedSnapshot) -> LoadOutcome {
        let count = snapshot.products.len();
        let mut inner = self.write();
        inner.products = Arc::from(snapshot.products);
        inner.state = LoadState::Ready;
        inner.loaded_at = Some(Utc::now());
        self.state_tx.send_replace(LoadState::Ready);
        LoadOutcome::Loaded {
            count,
            inactive: snapshot.inactive,
        }
    }

    fn fail(&self, err: FeedError) -> LoadOutcome {
        let mut inner = self.write();
        inner.state = LoadState::Failed;
        inner.last_error = Some(err.to_string());
        self.state_tx.send_replace(LoadState::Failed);
        LoadOutcome::Failed(err)
    }

    /// Current product list; empty until a load succeeds
    pub fn all(&self) -> Arc<[Product]> {
        Arc::clone(&self.read().products)
    }

    pub fn get(&self, id: &ProductId) -> Option<Product> {
        self.read().products.iter().find(|p| &p.id == id).cloned()
    }

    pub fn state(&self) -> LoadState {
        self.read().state
    }

    /// Wait out a load in flight and return the resulting state
    ///
    /// Returns at once when no load is running, including `Idle`.
    pub async fn settled(&self) -> LoadState {
        let mut rx = self.state_tx.subscribe();
        let settled = match rx.wait_for(|state| *state != LoadState::Loading).await {
            Ok(state) => *state,
            Err(_) => self.state(),
        };
        settled
    }

    pub fn len(&self) -> usize {
        self.read().products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn status(&self) -> StoreStatus {
        let inner = self.read();
        StoreStatus {
            state: inner.state,
            count: inner.products.len(),
            loaded_at: inner.loaded_at,
            last_error: inner.last_error.clone(),
        }
    }
}
