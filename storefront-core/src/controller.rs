//! Page controller - binds page events to the catalog
//!
//! One controller serves every page template. Each handler first checks
//! that the container it writes into exists and quietly does nothing when
//! it does not, so pages without a grid or a search box need no special
//! casing.
//!
//! The page sits behind a mutex shared with debounced search tasks; the
//! lock is never held across an await. Search results are only written
//! while holding it and only if no newer search or clear arrived since the
//! search started, so a slow search never overwrites a newer state.

use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

use crate::catalog::query::sort_refs;
use crate::catalog::{
    filter_by_category, CatalogStore, FeedSource, LoadOutcome, LoadState, ProductId, SortKey,
};
use crate::config::StorefrontConfig;
use crate::debounce::Debouncer;
use crate::events::{CatalogEvent, EventBus};
use crate::page::{Page, PriceDisplay};
use crate::render::{
    detail_url, render_grid, render_load_error, render_search_error, render_search_results,
    RenderOptions,
};
use crate::search::{search_limited, SearchQuery};

/// Category and sort currently applied to the grid
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridView {
    pub category: Option<String>,
    pub sort: SortKey,
}

pub struct PageController<P: Page + 'static> {
    store: Arc<CatalogStore>,
    page: Arc<Mutex<P>>,
    source: Arc<dyn FeedSource>,
    debouncer: Arc<Debouncer>,
    events: EventBus,
    view: Arc<Mutex<GridView>>,
    config: Arc<StorefrontConfig>,
    options: Arc<RenderOptions>,
}

impl<P: Page + 'static> Clone for PageController<P> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            page: Arc::clone(&self.page),
            source: Arc::clone(&self.source),
            debouncer: Arc::clone(&self.debouncer),
            events: self.events.clone(),
            view: Arc::clone(&self.view),
            config: Arc::clone(&self.config),
            options: Arc::clone(&self.options),
        }
    }
}

impl<P: Page + 'static> PageController<P> {
    /// Controller reading the feed named in `config`
    pub fn new(page: P, config: StorefrontConfig) -> Self {
        let source = config.feed_source();
        Self::with_source(page, config, source)
    }

    pub fn with_source(page: P, config: StorefrontConfig, source: Arc<dyn FeedSource>) -> Self {
        Self {
            store: Arc::new(CatalogStore::new()),
            page: Arc::new(Mutex::new(page)),
            source,
            debouncer: Arc::new(Debouncer::new(config.debounce())),
            events: EventBus::new(),
            view: Arc::new(Mutex::new(GridView::default())),
            options: Arc::new(config.render_options()),
            config: Arc::new(config),
        }
    }

    /// Share an existing store (and its single load) with this controller
    pub fn with_store(mut self, store: Arc<CatalogStore>) -> Self {
        self.store = store;
        self
    }

    pub fn store(&self) -> &Arc<CatalogStore> {
        &self.store
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    pub fn view(&self) -> GridView {
        lock(&self.view).clone()
    }

    /// Exclusive access to the page, e.g. to inspect rendered markup
    pub fn page(&self) -> MutexGuard<'_, P> {
        lock(&self.page)
    }

    /// Wait for a debounced search, if any, to run or be skipped
    pub async fn settle(&self) {
        self.debouncer.settle().await;
    }

    /// Page loaded: fetch the catalog and paint the grid
    ///
    /// Returns `None` when the page has no grid container.
    pub async fn on_ready(&self) -> Option<LoadOutcome> {
        if !self.page().has_container(&self.config.elements.grid) {
            debug!("No product grid on this page, skipping catalog load");
            return None;
        }
        let outcome = self.store.load(self.source.as_ref()).await;
        self.refresh_grid();
        Some(outcome)
    }

    /// Show only `category` (`None`, empty, or "all" shows everything)
    pub fn on_filter(&self, category: Option<&str>) {
        {
            let mut view = lock(&self.view);
            view.category = category.map(str::to_string);
        }
        self.refresh_grid();
    }

    /// Reorder the grid; unknown keys restore catalog order
    pub fn on_sort(&self, key: &str) {
        let sort = key.parse::<SortKey>().unwrap_or_else(|e| {
            warn!("{}, keeping catalog order", e);
            SortKey::Original
        });
        lock(&self.view).sort = sort;
        self.refresh_grid();
    }

    /// Search box input: debounce runnable queries, clear on short ones
    pub fn on_search_input(&self, raw: &str) {
        let container = &self.config.elements.search_results;
        if !self.page().has_container(container) {
            return;
        }

        match SearchQuery::parse(raw, self.config.search.min_query_len) {
            SearchQuery::TooShort => {
                let mut page = self.page();
                self.debouncer.cancel();
                page.replace_content(container, "");
            }
            SearchQuery::Ready(query) => {
                let this = self.clone();
                self.debouncer.schedule_with(move |generation| async move {
                    this.search_as_of(&query, generation).await;
                });
            }
        }
    }

    /// Enter in the search box: search now, dropping any pending search
    pub async fn on_search_submit(&self, raw: &str) {
        if let SearchQuery::Ready(query) = SearchQuery::parse(raw, self.config.search.min_query_len)
        {
            self.debouncer.cancel();
            self.perform_search(&query).await;
        }
    }

    /// Run `query` and paint the results container
    ///
    /// Searches the loaded catalog, starting the load on pages that never
    /// ran it and waiting for one already in flight. Results are dropped
    /// when another search was scheduled or the box was cleared meanwhile.
    pub async fn perform_search(&self, query: &str) {
        let generation = self.debouncer.generation();
        self.search_as_of(query, generation).await;
    }

    /// Search whose results only count while the debouncer is still at
    /// `generation`
    async fn search_as_of(&self, query: &str, generation: u64) {
        let container = &self.config.elements.search_results;
        if !self.page().has_container(container) {
            return;
        }

        // Pages without a grid never ran the load
        if self.store.state() == LoadState::Idle {
            let outcome = self.store.load(self.source.as_ref()).await;
            if !matches!(outcome, LoadOutcome::Skipped(_)) {
                self.refresh_grid();
            }
        }
        let state = self.store.settled().await;

        let html = if state == LoadState::Failed {
            render_search_error()
        } else {
            let products = self.store.all();
            let results = search_limited(&products, query, self.config.search.result_limit);
            debug!(
                query,
                shown = results.shown.len(),
                total = results.total,
                "Search results"
            );
            render_search_results(&results, &self.options)
        };

        let mut page = self.page();
        if !self.debouncer.is_current(generation) {
            debug!(query, "Search superseded, dropping results");
            return;
        }
        page.replace_content(container, &html);
    }

    /// Variant select changed: show that variant's price on the card
    ///
    /// Returns whether the card was updated.
    pub fn on_variant_change(&self, product_id: &ProductId, variant: &str) -> bool {
        let Some(product) = self.store.get(product_id) else {
            debug!("Variant change for unknown product {}", product_id);
            return false;
        };
        let Some(pricing) = product.variant_price(variant) else {
            debug!(
                "Product {} has no pricing for variant '{}'",
                product_id, variant
            );
            return false;
        };
        let display = PriceDisplay::from(pricing);
        self.page().patch_card_price(product_id, &display)
    }

    /// Search result clicked: open the product's detail page
    pub fn on_result_click(&self, product_id: &ProductId) {
        let url = detail_url(&self.config.detail_page, product_id);
        debug!("Navigating to {}", url);
        self.page().navigate(&url);
    }

    /// Repaint the grid for the current store state and view
    fn refresh_grid(&self) {
        let grid = &self.config.elements.grid;
        match self.store.state() {
            LoadState::Ready => {
                let view = self.view();
                let products = self.store.all();
                let mut shown = filter_by_category(&products, view.category.as_deref());
                sort_refs(&mut shown, view.sort);
                let count = shown.len();
                let html = render_grid(shown, &self.options);

                if self.page().replace_content(grid, &html) {
                    info!("Rendered {} products into #{}", count, grid);
                    self.events.publish(CatalogEvent::ProductsUpdated {
                        container: grid.clone(),
                        count,
                    });
                }
            }
            LoadState::Failed => {
                self.page().replace_content(grid, &render_load_error());
            }
            // Whoever is loading paints when it finishes
            LoadState::Idle | LoadState::Loading => {}
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Product, StaticFeed};
    use crate::page::MemoryPage;

    fn controller(page: MemoryPage, feed: &str) -> PageController<MemoryPage> {
        PageController::with_source(
            page,
            StorefrontConfig::default(),
            Arc::new(StaticFeed::new(feed)),
        )
    }

    #[tokio::test]
    async fn test_ready_without_grid_is_noop() {
        let ctrl = controller(MemoryPage::with_containers(["searchResults"]), "[]");
        assert!(ctrl.on_ready().await.is_none());
        assert_eq!(ctrl.store().state(), LoadState::Idle);
    }

    #[tokio::test]
    async fn test_load_failure_shows_error_and_no_event() {
        let ctrl = controller(MemoryPage::with_containers(["productGrid"]), "not json");
        let mut events = ctrl.events().subscribe();

        let outcome = ctrl.on_ready().await.unwrap();
        assert!(outcome.is_failure());
        assert_eq!(
            ctrl.page().content("productGrid"),
            Some(render_load_error().as_str())
        );
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_filter_before_load_paints_nothing() {
        let ctrl = controller(MemoryPage::with_containers(["productGrid"]), "[]");
        ctrl.on_filter(Some("leaf"));
        assert_eq!(ctrl.page().content("productGrid"), Some(""));
        assert_eq!(ctrl.view().category.as_deref(), Some("leaf"));
    }

    #[test]
    fn test_variant_change_on_unknown_product_is_silent() {
        let ctrl = controller(MemoryPage::with_containers(["productGrid"]), "[]");
        ctrl.store().set(vec![Product::new(1, "Moringa", 10.0)]);
        assert!(!ctrl.on_variant_change(&ProductId::from("99"), "1kg"));
        assert!(!ctrl.on_variant_change(&ProductId::from("1"), "1kg"));
    }

    #[test]
    fn test_result_click_navigates() {
        let ctrl = controller(MemoryPage::new(), "[]");
        ctrl.on_result_click(&ProductId::from("12"));
        assert_eq!(
            ctrl.page().location(),
            Some("product-detail.html?id=12")
        );
    }
}
