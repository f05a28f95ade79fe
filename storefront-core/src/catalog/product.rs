//! Product records as they appear in the storefront feed
//!
//! Feed records are loosely shaped: most fields are optional and several
//! carry implicit defaults. This module gives them an explicit type and
//! applies the defaults in one place instead of at every read site.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Rating shown when a product has none (or a zero rating)
pub const DEFAULT_RATING: f64 = 4.5;

/// Variant label used when a product declares no variants
pub const DEFAULT_VARIANT: &str = "500g";

/// Opaque product identifier
///
/// Feeds carry ids either as JSON numbers or strings. Both are normalized to
/// their textual form, so `1` and `"1"` name the same product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<u64> for ProductId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<i32> for ProductId {
    fn from(value: i32) -> Self {
        Self(value.to_string())
    }
}

impl Serialize for ProductId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ProductIdVisitor;

        impl<'de> Visitor<'de> for ProductIdVisitor {
            type Value = ProductId;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a product id as a string or number")
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(ProductId(value.to_string()))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(ProductId(value.to_string()))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(ProductId(format_amount(value)))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(ProductId(value.to_string()))
            }
        }

        deserializer.deserialize_any(ProductIdVisitor)
    }
}

/// Price pair attached to a single variant label
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantPrice {
    pub price: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
}

/// A single product from the feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,

    pub name: String,

    /// Filter tag; some feed variants omit it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    pub price: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,

    /// Legacy single-image field, used when `images` is empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Font Awesome class for the placeholder glyph
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variants: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub variant_pricing: BTreeMap<String, VariantPrice>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<u64>,

    /// Only an explicit `false` hides the product
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub benefits: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Call-to-action target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amazon_link: Option<String>,
}

impl Product {
    /// Minimal product, mostly useful for tests and fixtures
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: None,
            price,
            original_price: None,
            images: Vec::new(),
            image: None,
            icon: None,
            variants: None,
            variant_pricing: BTreeMap::new(),
            rating: None,
            reviews: None,
            active: None,
            benefits: Vec::new(),
            description: None,
            amazon_link: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_original_price(mut self, original_price: f64) -> Self {
        self.original_price = Some(original_price);
        self
    }

    pub fn is_active(&self) -> bool {
        self.active != Some(false)
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Discount against `originalPrice`, in whole percent
    pub fn discount_percent(&self) -> u8 {
        discount_percentage(self.original_price, self.price)
    }

    pub fn is_discounted(&self) -> bool {
        matches!(self.original_price, Some(original) if original > self.price)
    }

    /// Image URLs to render, `images` first, then the legacy `image` field
    ///
    /// Blank entries are skipped; an empty result means the placeholder is used.
    pub fn image_urls(&self) -> Vec<&str> {
        let images: Vec<&str> = self
            .images
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();
        if !images.is_empty() {
            return images;
        }
        self.image
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .into_iter()
            .collect()
    }

    /// Variant labels in feed order, or the single default label
    pub fn variant_labels<'a>(&'a self, default_variant: &'a str) -> Vec<&'a str> {
        match &self.variants {
            Some(variants) if !variants.is_empty() => variants.iter().map(String::as_str).collect(),
            _ => vec![default_variant],
        }
    }

    pub fn variant_price(&self, label: &str) -> Option<&VariantPrice> {
        self.variant_pricing.get(label)
    }

    /// Rating, treating a missing or zero rating as `default`
    pub fn rating_or(&self, default: f64) -> f64 {
        match self.rating {
            Some(r) if r > 0.0 => r,
            _ => default,
        }
    }

    pub fn review_count(&self) -> u64 {
        self.reviews.unwrap_or(0)
    }
}

/// `round((original - price) / original * 100)` when discounted, else 0
///
/// Result is clamped into `0..=100` so a negative price can't produce an
/// out-of-range badge.
pub fn discount_percentage(original_price: Option<f64>, price: f64) -> u8 {
    let Some(original) = original_price else {
        return 0;
    };
    if original <= 0.0 || original <= price || !original.is_finite() || !price.is_finite() {
        return 0;
    }
    let pct = ((original - price) / original * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}

/// Format a price or rating the way the storefront prints numbers:
/// whole values without a fractional part, everything else as-is.
pub fn format_amount(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
