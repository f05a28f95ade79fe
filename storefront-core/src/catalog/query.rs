//! Filtering and ordering over the catalog list
//!
//! Every function here borrows the canonical list and returns a derived
//! view of references; none of them reorder or modify the input.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::product::{Product, ProductId};

/// Category value that disables category filtering
pub const ALL_CATEGORIES: &str = "all";

pub const DEFAULT_RELATED_LIMIT: usize = 4;
pub const DEFAULT_FEATURED_LIMIT: usize = 6;

/// Grid ordering selected by the sort dropdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Feed order
    #[default]
    Original,
    PriceLow,
    PriceHigh,
    NameAsc,
    NameDesc,
    Discount,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Original => "default",
            SortKey::PriceLow => "price-low",
            SortKey::PriceHigh => "price-high",
            SortKey::NameAsc => "name-asc",
            SortKey::NameDesc => "name-desc",
            SortKey::Discount => "discount",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "price-low" => Ok(SortKey::PriceLow),
            "price-high" => Ok(SortKey::PriceHigh),
            "name-asc" => Ok(SortKey::NameAsc),
            "name-desc" => Ok(SortKey::NameDesc),
            "discount" => Ok(SortKey::Discount),
            "" | "default" => Ok(SortKey::Original),
            other => Err(format!("Unknown sort key: {other}")),
        }
    }
}

/// A product paired with its computed discount
#[derive(Debug, Clone, Copy)]
pub struct FeaturedProduct<'a> {
    pub product: &'a Product,
    pub discount: u8,
}

/// Exact category match; `None`, empty, or `"all"` keeps everything
pub fn filter_by_category<'a>(list: &'a [Product], category: Option<&str>) -> Vec<&'a Product> {
    match category.map(str::trim) {
        None | Some("") | Some(ALL_CATEGORIES) => list.iter().collect(),
        Some(wanted) => list
            .iter()
            .filter(|p| p.category() == Some(wanted))
            .collect(),
    }
}

/// Exact category match without the `"all"` alias
pub fn products_by_category<'a>(list: &'a [Product], category: Option<&str>) -> Vec<&'a Product> {
    match category {
        None | Some("") => list.iter().collect(),
        Some(wanted) => list
            .iter()
            .filter(|p| p.category() == Some(wanted))
            .collect(),
    }
}

/// Stable sort into a new sequence
pub fn sort<'a>(list: &'a [Product], key: SortKey) -> Vec<&'a Product> {
    let mut sorted: Vec<&Product> = list.iter().collect();
    sort_refs(&mut sorted, key);
    sorted
}

/// Sort an already-derived view in place (stable)
pub fn sort_refs(items: &mut [&Product], key: SortKey) {
    match key {
        SortKey::Original => {}
        SortKey::PriceLow => items.sort_by(|a, b| a.price.total_cmp(&b.price)),
        SortKey::PriceHigh => items.sort_by(|a, b| b.price.total_cmp(&a.price)),
        SortKey::NameAsc => items.sort_by(|a, b| compare_names(&a.name, &b.name)),
        SortKey::NameDesc => items.sort_by(|a, b| compare_names(&b.name, &a.name)),
        SortKey::Discount => {
            items.sort_by(|a, b| b.discount_percent().cmp(&a.discount_percent()))
        }
    }
}

/// Case-insensitive first, then by raw text so the order is total
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Same-category products other than `id`, in catalog order
pub fn related_products<'a>(
    list: &'a [Product],
    id: &ProductId,
    category: Option<&str>,
    limit: usize,
) -> Vec<&'a Product> {
    list.iter()
        .filter(|p| p.category() == category && &p.id != id)
        .take(limit)
        .collect()
}

/// Best discounts first
pub fn featured_products(list: &[Product], limit: usize) -> Vec<FeaturedProduct<'_>> {
    let mut featured: Vec<FeaturedProduct<'_>> = list
        .iter()
        .map(|product| FeaturedProduct {
            product,
            discount: product.discount_percent(),
        })
        .collect();
    featured.sort_by(|a, b| b.discount.cmp(&a.discount));
    featured.truncate(limit);
    featured
}

pub fn product_by_id<'a>(list: &'a [Product], id: &ProductId) -> Option<&'a Product> {
    list.iter().find(|p| &p.id == id)
}
