//! Product search - case-insensitive substring matching with highlighting
//!
//! Matching runs over the name, category, description, and every benefit of
//! a product. Results keep catalog order; there is no relevance ranking.

use regex::RegexBuilder;
use tracing::trace;

use crate::catalog::Product;
use crate::render::escape_html;

/// Queries shorter than this (after trimming) never run
pub const MIN_QUERY_LEN: usize = 2;

/// Number of results shown in the dropdown
pub const RESULT_LIMIT: usize = 5;

/// Classified search box input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    /// Too short to search; the results area should be cleared
    TooShort,
    /// Trimmed query ready to run
    Ready(String),
}

impl SearchQuery {
    /// Trim `raw` and decide whether it is long enough to search
    pub fn parse(raw: &str, min_len: usize) -> Self {
        let trimmed = raw.trim();
        if trimmed.chars().count() < min_len {
            SearchQuery::TooShort
        } else {
            SearchQuery::Ready(trimmed.to_string())
        }
    }
}

/// Matches truncated for display, with the untruncated count
#[derive(Debug, Clone)]
pub struct SearchResults<'a> {
    pub query: String,
    pub shown: Vec<&'a Product>,
    pub total: usize,
}

impl SearchResults<'_> {
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn is_truncated(&self) -> bool {
        self.total > self.shown.len()
    }
}

fn field_contains(field: Option<&str>, needle: &str) -> bool {
    field.is_some_and(|text| text.to_lowercase().contains(needle))
}

/// Whether any searchable field of `product` contains the lowercased query
pub fn matches(product: &Product, query: &str) -> bool {
    let needle = query.to_lowercase();
    field_contains(Some(product.name.as_str()), &needle)
        || field_contains(product.category(), &needle)
        || field_contains(product.description.as_deref(), &needle)
        || product
            .benefits
            .iter()
            .any(|benefit| field_contains(Some(benefit.as_str()), &needle))
}

/// All matching products in catalog order
pub fn search<'a, I>(list: I, query: &str) -> Vec<&'a Product>
where
    I: IntoIterator<Item = &'a Product>,
{
    let results: Vec<&Product> = list.into_iter().filter(|p| matches(p, query)).collect();
    trace!(query, matched = results.len(), "Search finished");
    results
}

/// Search and truncate to `limit` for display
pub fn search_limited<'a>(list: &'a [Product], query: &str, limit: usize) -> SearchResults<'a> {
    let mut shown = search(list, query);
    let total = shown.len();
    shown.truncate(limit);
    SearchResults {
        query: query.to_string(),
        shown,
        total,
    }
}

/// Escape `text` and wrap every case-insensitive occurrence of `query` in
/// `<strong>` tags, keeping the original casing of the matched text
pub fn highlight(text: &str, query: &str) -> String {
    if query.is_empty() {
        return escape_html(text);
    }
    let Ok(pattern) = RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
    else {
        return escape_html(text);
    };

    let mut out = String::with_capacity(text.len() + 16);
    let mut cursor = 0;
    for found in pattern.find_iter(text) {
        out.push_str(&escape_html(&text[cursor..found.start()]));
        out.push_str("<strong>");
        out.push_str(&escape_html(found.as_str()));
        out.push_str("</strong>");
        cursor = found.end();
    }
    out.push_str(&escape_html(&text[cursor..]));
    out
}
