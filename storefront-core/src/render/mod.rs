//! Catalog renderer - product records to HTML fragments
//!
//! Rendering is pure: functions take products (and a query for search rows)
//! and return markup. Inserting it into the page and notifying listeners is
//! the controller's job.

mod card;
mod html;
mod search;

pub use card::{price_text, rating_text, render_product_card, render_stars, StarCounts, STAR_SLOTS};
pub use html::escape_html;
pub use search::{detail_url, render_search_item, render_search_results};

use crate::catalog::{Product, DEFAULT_RATING, DEFAULT_VARIANT};

pub const LOAD_ERROR_MESSAGE: &str = "Unable to load products. Please try again later.";
pub const EMPTY_GRID_MESSAGE: &str = "No products found.";
pub const SEARCH_ERROR_MESSAGE: &str = "Error performing search";

/// Display settings shared by every renderer
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub currency_symbol: String,
    pub default_rating: f64,
    pub default_variant: String,
    /// Icon used when a product has neither images nor an icon
    pub fallback_icon: String,
    pub detail_page: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            currency_symbol: "₹".to_string(),
            default_rating: DEFAULT_RATING,
            default_variant: DEFAULT_VARIANT.to_string(),
            fallback_icon: "fa-leaf".to_string(),
            detail_page: "product-detail.html".to_string(),
        }
    }
}

/// Grid markup for a sequence of products
///
/// An empty sequence renders the "no products" message so the container
/// never ends up blank.
pub fn render_grid<'a, I>(products: I, options: &RenderOptions) -> String
where
    I: IntoIterator<Item = &'a Product>,
{
    let cards: String = products
        .into_iter()
        .map(|product| render_product_card(product, options))
        .collect();

    if cards.is_empty() {
        render_empty_grid()
    } else {
        cards
    }
}

pub fn render_empty_grid() -> String {
    format!("<div class=\"error\"><p>{EMPTY_GRID_MESSAGE}</p></div>")
}

pub fn render_load_error() -> String {
    format!("<div class=\"error\"><p>{LOAD_ERROR_MESSAGE}</p></div>")
}

pub fn render_search_error() -> String {
    format!("<div class=\"search-error\">{SEARCH_ERROR_MESSAGE}</div>")
}
