//! Search dropdown markup

use super::card::icon_class;
use super::html::{element, escape_html};
use super::RenderOptions;
use crate::catalog::{format_amount, Product, ProductId};
use crate::search::{highlight, SearchResults};

/// Detail page link for a product, e.g. `product-detail.html?id=7`
pub fn detail_url(detail_page: &str, id: &ProductId) -> String {
    format!("{}?id={}", detail_page, urlencoding::encode(id.as_str()))
}

/// Compact result row with the matched part of the name emphasized
pub fn render_search_item(product: &Product, query: &str, options: &RenderOptions) -> String {
    let discount = product.discount_percent();

    let mut price = element(
        "span",
        "price",
        &escape_html(&format!(
            "{}{}",
            options.currency_symbol,
            format_amount(product.price)
        )),
    );
    if discount > 0 {
        price.push_str(&element("span", "discount", &format!("{discount}% off")));
    }

    let info = format!(
        "{}{}",
        element("div", "search-result-name", &highlight(&product.name, query)),
        element("div", "search-result-price", &price)
    );

    format!(
        "<div class=\"search-result-item\" data-product-id=\"{}\" data-href=\"{}\">{}{}{}</div>",
        escape_html(product.id.as_str()),
        escape_html(&detail_url(&options.detail_page, &product.id)),
        element(
            "div",
            "search-result-icon",
            &format!(
                "<i class=\"fas {}\"></i>",
                escape_html(icon_class(product, options))
            )
        ),
        element("div", "search-result-info", &info),
        element(
            "div",
            "search-result-arrow",
            "<i class=\"fas fa-chevron-right\"></i>"
        )
    )
}

/// Result list, footer when truncated, or the no-results message
pub fn render_search_results(results: &SearchResults<'_>, options: &RenderOptions) -> String {
    if results.is_empty() {
        return format!(
            "<div class=\"no-results\"><p>No products found for \"{}\"</p></div>",
            escape_html(&results.query)
        );
    }

    let mut items: String = results
        .shown
        .iter()
        .map(|product| render_search_item(product, &results.query, options))
        .collect();

    if results.is_truncated() {
        items.push_str(&format!(
            "<div class=\"search-results-footer\"><p>Showing {} of {} results</p></div>",
            results.shown.len(),
            results.total
        ));
    }

    element("div", "search-results-list", &items)
}
