//! End-to-end controller flows over an in-memory page

mod common;

use common::{
    card_ids, controller_with, init_test_logging, slow_controller_with, REFERENCE_FEED, SHOP_FEED,
};
use pretty_assertions::assert_eq;
use std::time::Duration;
use storefront_core::catalog::{LoadState, ProductId};
use storefront_core::render::{render_load_error, render_search_error};
use storefront_core::{CatalogEvent, Page, PriceDisplay};

const GRID: &str = "productGrid";
const RESULTS: &str = "searchResults";

#[tokio::test]
async fn test_ready_paints_active_products_and_notifies() {
    init_test_logging();
    let ctrl = controller_with(SHOP_FEED, &[GRID, RESULTS]);
    let mut events = ctrl.events().subscribe();

    let outcome = ctrl.on_ready().await.unwrap();
    assert!(!outcome.is_failure());

    let html = ctrl.page().content(GRID).unwrap().to_string();
    assert_eq!(card_ids(&html), vec!["1", "2", "4", "5"]);
    assert!(!html.contains("Tulsi Tea"));

    assert_eq!(
        events.try_recv().unwrap(),
        CatalogEvent::ProductsUpdated {
            container: GRID.to_string(),
            count: 4,
        }
    );
}

#[tokio::test]
async fn test_filter_and_sort_compose() {
    init_test_logging();
    let ctrl = controller_with(SHOP_FEED, &[GRID]);
    ctrl.on_ready().await;

    ctrl.on_filter(Some("leaf"));
    assert_eq!(card_ids(ctrl.page().content(GRID).unwrap()), vec!["1", "5"]);

    ctrl.on_sort("price-low");
    assert_eq!(card_ids(ctrl.page().content(GRID).unwrap()), vec!["5", "1"]);

    ctrl.on_filter(Some("all"));
    assert_eq!(
        card_ids(ctrl.page().content(GRID).unwrap()),
        vec!["5", "4", "1", "2"]
    );

    ctrl.on_sort("bogus");
    assert_eq!(
        card_ids(ctrl.page().content(GRID).unwrap()),
        vec!["1", "2", "4", "5"]
    );
}

#[tokio::test]
async fn test_every_grid_render_publishes() {
    let ctrl = controller_with(SHOP_FEED, &[GRID]);
    let mut events = ctrl.events().subscribe();
    ctrl.on_ready().await;
    ctrl.on_filter(Some("root"));
    ctrl.on_sort("discount");

    let counts: Vec<usize> = std::iter::from_fn(|| events.try_recv().ok())
        .map(|CatalogEvent::ProductsUpdated { count, .. }| count)
        .collect();
    assert_eq!(counts, vec![4, 2, 2]);
}

#[tokio::test]
async fn test_reference_feed_examples() {
    let ctrl = controller_with(REFERENCE_FEED, &[GRID, RESULTS]);
    ctrl.on_ready().await;

    ctrl.on_filter(Some("leaf"));
    assert_eq!(card_ids(ctrl.page().content(GRID).unwrap()), vec!["1"]);

    ctrl.on_filter(None);
    ctrl.on_sort("price-low");
    assert_eq!(card_ids(ctrl.page().content(GRID).unwrap()), vec!["1", "2"]);

    ctrl.on_search_submit("ash").await;
    let results = ctrl.page().content(RESULTS).unwrap().to_string();
    assert!(results.contains("<strong>Ash</strong>wagandha"));
    assert!(results.contains("data-product-id=\"2\""));
    assert!(!results.contains("data-product-id=\"1\""));
}

#[tokio::test]
async fn test_product_without_media_renders_placeholder() {
    let ctrl = controller_with(SHOP_FEED, &[GRID]);
    ctrl.on_ready().await;
    let html = ctrl.page().content(GRID).unwrap().to_string();
    // Beetroot and Curry Leaf have neither images nor icon
    assert_eq!(
        html.matches("<div class=\"image-placeholder\"><i class=\"fas fa-leaf\"></i></div>")
            .count(),
        2
    );
    assert!(html.contains("<i class=\"fas fa-seedling\"></i>"));
}

#[tokio::test]
async fn test_empty_feed_shows_message() {
    let ctrl = controller_with("[]", &[GRID]);
    ctrl.on_ready().await;
    assert_eq!(
        ctrl.page().content(GRID),
        Some("<div class=\"error\"><p>No products found.</p></div>")
    );
}

#[tokio::test]
async fn test_duplicate_ids_fail_the_load() {
    init_test_logging();
    let feed = r#"[{"id":1,"name":"A","price":1},{"id":"1","name":"B","price":2}]"#;
    let ctrl = controller_with(feed, &[GRID, RESULTS]);

    assert!(ctrl.on_ready().await.unwrap().is_failure());
    assert_eq!(ctrl.store().state(), LoadState::Failed);
    assert_eq!(
        ctrl.page().content(GRID),
        Some(render_load_error().as_str())
    );

    ctrl.on_filter(Some("leaf"));
    assert_eq!(
        ctrl.page().content(GRID),
        Some(render_load_error().as_str())
    );

    ctrl.on_search_submit("abc").await;
    assert_eq!(
        ctrl.page().content(RESULTS),
        Some(render_search_error().as_str())
    );
}

#[tokio::test(start_paused = true)]
async fn test_debounced_input_runs_last_query_only() {
    init_test_logging();
    let ctrl = controller_with(SHOP_FEED, &[GRID, RESULTS]);
    ctrl.on_ready().await;

    ctrl.on_search_input("mo");
    tokio::time::sleep(Duration::from_millis(100)).await;
    ctrl.on_search_input("root");
    tokio::time::sleep(Duration::from_millis(299)).await;
    assert_eq!(ctrl.page().content(RESULTS), Some(""));

    tokio::time::sleep(Duration::from_millis(2)).await;
    let results = ctrl.page().content(RESULTS).unwrap().to_string();
    assert!(results.contains("Ashwagandha"));
    assert!(results.contains("Beet<strong>root</strong> Powder"));
    assert!(!results.contains("Moringa"));
}

#[tokio::test(start_paused = true)]
async fn test_short_query_clears_and_cancels() {
    let ctrl = controller_with(SHOP_FEED, &[GRID, RESULTS]);
    ctrl.on_ready().await;
    ctrl.page().replace_content(RESULTS, "<p>stale</p>");

    ctrl.on_search_input("powder");
    ctrl.on_search_input(" a ");
    assert_eq!(ctrl.page().content(RESULTS), Some(""));

    ctrl.settle().await;
    assert_eq!(ctrl.page().content(RESULTS), Some(""));
}

#[tokio::test(start_paused = true)]
async fn test_clear_while_search_loads_stays_clear() {
    init_test_logging();
    let ctrl = slow_controller_with(SHOP_FEED, Duration::from_secs(1), &[RESULTS]);

    ctrl.on_search_input("ash");
    tokio::time::sleep(Duration::from_millis(400)).await;
    // The search is past its quiet period and waiting on the feed
    assert_eq!(ctrl.store().state(), LoadState::Loading);

    ctrl.on_search_input("a");
    assert_eq!(ctrl.page().content(RESULTS), Some(""));

    ctrl.settle().await;
    assert_eq!(ctrl.store().state(), LoadState::Ready);
    assert_eq!(ctrl.page().content(RESULTS), Some(""));
}

#[tokio::test(start_paused = true)]
async fn test_submit_overrides_search_waiting_on_feed() {
    let ctrl = slow_controller_with(SHOP_FEED, Duration::from_secs(1), &[RESULTS]);

    ctrl.on_search_input("ash");
    tokio::time::sleep(Duration::from_millis(400)).await;
    ctrl.on_search_submit("moringa").await;
    ctrl.settle().await;

    let results = ctrl.page().content(RESULTS).unwrap().to_string();
    assert!(results.contains("<strong>Moringa</strong> Powder"));
    assert!(!results.contains("Ashwagandha"));
    assert!(!results.contains("No products found"));
}

#[tokio::test(start_paused = true)]
async fn test_search_waits_for_load_in_flight() {
    let ctrl = slow_controller_with(SHOP_FEED, Duration::from_secs(1), &[GRID, RESULTS]);

    let ready = tokio::spawn({
        let ctrl = ctrl.clone();
        async move { ctrl.on_ready().await }
    });
    tokio::task::yield_now().await;
    assert_eq!(ctrl.store().state(), LoadState::Loading);

    ctrl.on_search_submit("moringa").await;
    let results = ctrl.page().content(RESULTS).unwrap().to_string();
    assert!(results.contains("<strong>Moringa</strong> Powder"));

    assert!(!ready.await.unwrap().unwrap().is_failure());
    assert_eq!(card_ids(ctrl.page().content(GRID).unwrap()), vec!["1", "2", "4", "5"]);
}

#[tokio::test]
async fn test_submit_ignores_short_query() {
    let ctrl = controller_with(SHOP_FEED, &[RESULTS]);
    ctrl.page().replace_content(RESULTS, "<p>kept</p>");
    ctrl.on_search_submit("p").await;
    assert_eq!(ctrl.page().content(RESULTS), Some("<p>kept</p>"));
    assert_eq!(ctrl.store().state(), LoadState::Idle);
}

#[tokio::test]
async fn test_search_only_page_loads_store_once() {
    let ctrl = controller_with(SHOP_FEED, &[RESULTS]);
    ctrl.on_search_submit("powder").await;
    assert_eq!(ctrl.store().state(), LoadState::Ready);

    let results = ctrl.page().content(RESULTS).unwrap().to_string();
    assert!(results.contains("Moringa"));
    assert!(results.contains("Curry Leaf"));
    assert!(!results.contains("search-results-footer"));
}

#[tokio::test]
async fn test_results_are_truncated_with_footer() {
    let feed: String = format!(
        "[{}]",
        (1..=8)
            .map(|i| format!(r#"{{"id":{i},"name":"Herb Blend {i}","price":{}}}"#, 100 + i))
            .collect::<Vec<_>>()
            .join(",")
    );
    let ctrl = controller_with(&feed, &[RESULTS]);
    ctrl.on_search_submit("blend").await;

    let results = ctrl.page().content(RESULTS).unwrap().to_string();
    assert_eq!(results.matches("class=\"search-result-item\"").count(), 5);
    assert!(results.contains("Showing 5 of 8 results"));
}

#[tokio::test]
async fn test_no_results_message_escapes_query() {
    let ctrl = controller_with(SHOP_FEED, &[RESULTS]);
    ctrl.on_search_submit("<b>zz").await;
    assert_eq!(
        ctrl.page().content(RESULTS),
        Some("<div class=\"no-results\"><p>No products found for \"&lt;b&gt;zz\"</p></div>")
    );
}

#[tokio::test]
async fn test_variant_change_patches_card_price() {
    let ctrl = controller_with(SHOP_FEED, &[GRID]);
    ctrl.on_ready().await;
    let id = ProductId::from("1");

    assert!(ctrl.on_variant_change(&id, "250g"));
    assert_eq!(
        ctrl.page().card_price(&id).copied(),
        Some(PriceDisplay::new(119.0, Some(149.0)))
    );

    assert!(ctrl.on_variant_change(&id, "1kg"));
    let price = ctrl.page().card_price(&id).copied().unwrap();
    assert_eq!(price.original, None);
    assert_eq!(price.current_text("₹"), "₹ 379");

    // No pricing entry for the default variant: display unchanged
    assert!(!ctrl.on_variant_change(&id, "500g"));
    assert_eq!(ctrl.page().card_price(&id).unwrap().current, 379.0);
}

#[tokio::test]
async fn test_repaint_resets_variant_prices() {
    let ctrl = controller_with(SHOP_FEED, &[GRID]);
    ctrl.on_ready().await;
    let id = ProductId::from("1");

    assert!(ctrl.on_variant_change(&id, "250g"));
    ctrl.on_sort("price-high");
    assert_eq!(ctrl.page().card_price(&id), None);
    assert!(ctrl
        .page()
        .content(GRID)
        .unwrap()
        .contains("<span class=\"current-price\">₹ 199</span>"));
}

#[tokio::test]
async fn test_result_click_goes_to_detail_page() {
    let ctrl = controller_with(SHOP_FEED, &[RESULTS]);
    ctrl.on_result_click(&ProductId::from("5"));
    assert_eq!(ctrl.page().location(), Some("product-detail.html?id=5"));
}
