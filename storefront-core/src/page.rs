//! Page contract - the parts of the document the catalog touches
//!
//! The same controller runs on every page template, so every operation
//! tolerates a missing element: it reports `false` and changes nothing.

use std::collections::BTreeMap;

use crate::catalog::{format_amount, ProductId, VariantPrice};

/// Price pair shown on a product card
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceDisplay {
    pub current: f64,
    /// Only set when it is above `current`
    pub original: Option<f64>,
}

impl PriceDisplay {
    pub fn new(current: f64, original: Option<f64>) -> Self {
        Self {
            current,
            original: original.filter(|o| *o > current),
        }
    }

    pub fn current_text(&self, symbol: &str) -> String {
        format!("{symbol} {}", format_amount(self.current))
    }

    pub fn original_text(&self, symbol: &str) -> Option<String> {
        self.original
            .map(|original| format!("{symbol} {}", format_amount(original)))
    }
}

impl From<&VariantPrice> for PriceDisplay {
    fn from(pricing: &VariantPrice) -> Self {
        Self::new(pricing.price, pricing.original_price)
    }
}

/// Document operations used by the page controller
pub trait Page: Send {
    fn has_container(&self, id: &str) -> bool;

    /// Replace the content of container `id`; false when it does not exist
    fn replace_content(&mut self, id: &str, html: &str) -> bool;

    fn content(&self, id: &str) -> Option<&str>;

    /// Update the price line of the card for `product_id`; false when the
    /// card is not on the page
    fn patch_card_price(&mut self, product_id: &ProductId, price: &PriceDisplay) -> bool;

    /// Move to another page
    fn navigate(&mut self, url: &str);
}

/// Document held in memory: containers by id plus card price overrides
#[derive(Debug, Clone, Default)]
pub struct MemoryPage {
    containers: BTreeMap<String, String>,
    card_prices: BTreeMap<ProductId, PriceDisplay>,
    location: Option<String>,
}

impl MemoryPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Page with the given (empty) containers
    pub fn with_containers<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut page = Self::new();
        for id in ids {
            page.containers.insert(id.into(), String::new());
        }
        page
    }

    /// Price currently shown on a card, if a variant change patched it
    pub fn card_price(&self, product_id: &ProductId) -> Option<&PriceDisplay> {
        self.card_prices.get(product_id)
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    fn has_card(&self, product_id: &ProductId) -> bool {
        let marker = card_marker(product_id);
        self.containers.values().any(|html| html.contains(&marker))
    }
}

fn card_marker(product_id: &ProductId) -> String {
    format!(
        "class=\"product-card\" data-product-id=\"{}\"",
        crate::render::escape_html(product_id.as_str())
    )
}

impl Page for MemoryPage {
    fn has_container(&self, id: &str) -> bool {
        self.containers.contains_key(id)
    }

    fn replace_content(&mut self, id: &str, html: &str) -> bool {
        let Some(content) = self.containers.get_mut(id) else {
            return false;
        };
        let old = std::mem::replace(content, html.to_string());
        // Cards in the old markup are gone, and so are their patched prices
        self.card_prices
            .retain(|product_id, _| !old.contains(&card_marker(product_id)));
        true
    }

    fn content(&self, id: &str) -> Option<&str> {
        self.containers.get(id).map(String::as_str)
    }

    fn patch_card_price(&mut self, product_id: &ProductId, price: &PriceDisplay) -> bool {
        if !self.has_card(product_id) {
            return false;
        }
        self.card_prices.insert(product_id.clone(), *price);
        true
    }

    fn navigate(&mut self, url: &str) {
        self.location = Some(url.to_string());
    }
}
