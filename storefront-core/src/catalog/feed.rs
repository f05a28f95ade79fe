//! Feed parsing and integrity checks
//!
//! The feed is a JSON array of product records. Parsing is strict about
//! shape (every record must deserialize) and about integrity: ids must be
//! unique and prices must be usable. Inactive records are validated too but
//! dropped from the resulting snapshot.

use serde_json::Value;
use std::collections::BTreeSet;
use tracing::{debug, trace};

use super::product::{Product, VariantPrice};
use crate::error::FeedError;

/// Active products from one feed plus the counts the loader reports
#[derive(Debug, Clone)]
pub struct FeedSnapshot {
    pub products: Vec<Product>,
    pub total: usize,
    pub inactive: usize,
}

impl FeedSnapshot {
    /// Build a snapshot from already-typed records, applying the same checks
    pub fn from_products(records: Vec<Product>) -> Result<Self, FeedError> {
        validate_records(&records)?;
        let total = records.len();
        let products: Vec<Product> = records.into_iter().filter(Product::is_active).collect();
        let inactive = total - products.len();
        debug!(total, inactive, "Feed snapshot built");
        Ok(Self {
            products,
            total,
            inactive,
        })
    }
}

/// Parse the raw feed body into a validated snapshot
pub fn parse_feed(content: &str) -> Result<FeedSnapshot, FeedError> {
    let value: Value = serde_json::from_str(content.trim())?;

    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(FeedError::Json(serde::de::Error::custom(format!(
                "expected a JSON array of products, found {}",
                json_kind(&other)
            ))))
        }
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let product: Product = serde_json::from_value(item)
            .map_err(|source| FeedError::Record { index, source })?;
        trace!(id = %product.id, "Parsed feed record");
        records.push(product);
    }

    FeedSnapshot::from_products(records)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn validate_records(records: &[Product]) -> Result<(), FeedError> {
    let mut seen = BTreeSet::new();
    for product in records {
        if product.id.as_str().trim().is_empty() {
            return Err(FeedError::InvalidProduct {
                id: product.id.clone(),
                reason: "id must not be empty".to_string(),
            });
        }
        if !seen.insert(product.id.clone()) {
            return Err(FeedError::DuplicateId(product.id.clone()));
        }
        validate_product(product)?;
    }
    Ok(())
}

fn validate_product(product: &Product) -> Result<(), FeedError> {
    let invalid = |reason: String| FeedError::InvalidProduct {
        id: product.id.clone(),
        reason,
    };

    if product.name.trim().is_empty() {
        return Err(invalid("name must not be empty".to_string()));
    }
    check_amount("price", product.price).map_err(invalid)?;
    if let Some(original) = product.original_price {
        check_amount("originalPrice", original).map_err(invalid)?;
    }
    if let Some(rating) = product.rating {
        if !(0.0..=5.0).contains(&rating) {
            return Err(invalid(format!("rating {rating} is outside 0-5")));
        }
    }
    for (label, VariantPrice { price, original_price }) in &product.variant_pricing {
        check_amount(&format!("variantPricing.{label}.price"), *price).map_err(invalid)?;
        if let Some(original) = original_price {
            check_amount(&format!("variantPricing.{label}.originalPrice"), *original)
                .map_err(invalid)?;
        }
    }
    Ok(())
}

fn check_amount(field: &str, value: f64) -> Result<(), String> {
    if !value.is_finite() || value < 0.0 {
        return Err(format!("{field} must be a non-negative number, got {value}"));
    }
    Ok(())
}
