//! Product grid cards

use super::html::{element, escape_html};
use super::RenderOptions;
use crate::catalog::{format_amount, Product};

/// Number of glyphs in a rating row
pub const STAR_SLOTS: u8 = 5;

/// Full, half, and empty star counts; always sums to [`STAR_SLOTS`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StarCounts {
    pub full: u8,
    pub half: u8,
    pub empty: u8,
}

impl StarCounts {
    pub fn for_rating(rating: f64) -> Self {
        let rating = if rating.is_finite() {
            rating.clamp(0.0, f64::from(STAR_SLOTS))
        } else {
            0.0
        };
        let full = rating.floor() as u8;
        let half = u8::from(full < STAR_SLOTS && rating.fract() >= 0.5);
        Self {
            full,
            half,
            empty: STAR_SLOTS - full - half,
        }
    }
}

pub fn render_stars(rating: f64) -> String {
    let counts = StarCounts::for_rating(rating);
    let mut out = String::new();
    for _ in 0..counts.full {
        out.push_str("<i class=\"fas fa-star\"></i>");
    }
    for _ in 0..counts.half {
        out.push_str("<i class=\"fas fa-star-half-alt\"></i>");
    }
    for _ in 0..counts.empty {
        out.push_str("<i class=\"far fa-star\"></i>");
    }
    out
}

/// `(4.5/5 Star · 12 Reviews)`, review suffix only when there are reviews
pub fn rating_text(rating: f64, reviews: u64) -> String {
    if reviews > 0 {
        format!("({}/5 Star · {} Reviews)", format_amount(rating), reviews)
    } else {
        format!("({}/5 Star)", format_amount(rating))
    }
}

/// Price line text, e.g. `₹ 199`
pub fn price_text(symbol: &str, amount: f64) -> String {
    format!("{symbol} {}", format_amount(amount))
}

pub(crate) fn icon_class<'a>(product: &'a Product, options: &'a RenderOptions) -> &'a str {
    product
        .icon
        .as_deref()
        .map(str::trim)
        .filter(|icon| !icon.is_empty())
        .unwrap_or(options.fallback_icon.as_str())
}

fn render_media(product: &Product, options: &RenderOptions) -> String {
    let images = product.image_urls();
    if images.is_empty() {
        return format!(
            "<div class=\"image-placeholder\"><i class=\"fas {}\"></i></div>",
            escape_html(icon_class(product, options))
        );
    }

    let id = escape_html(product.id.as_str());
    let name = escape_html(&product.name);
    let mut slides = String::new();
    for (index, src) in images.iter().enumerate() {
        let active = if index == 0 { " active" } else { "" };
        slides.push_str(&format!(
            "<img src=\"{}\" alt=\"{} - Image {}\" class=\"slider-image{}\" loading=\"lazy\">",
            escape_html(src),
            name,
            index + 1,
            active
        ));
    }
    let mut out = format!("<div class=\"product-image-slider\" data-product-id=\"{id}\">{slides}</div>");

    if images.len() > 1 {
        let mut indicators = String::new();
        for index in 0..images.len() {
            let active = if index == 0 { " active" } else { "" };
            indicators.push_str(&format!(
                "<span class=\"indicator{active}\" data-index=\"{index}\"></span>"
            ));
        }
        out.push_str(&element("div", "slider-indicators", &indicators));
    }
    out
}

fn render_price(product: &Product, options: &RenderOptions) -> String {
    let mut content = element(
        "span",
        "current-price",
        &escape_html(&price_text(&options.currency_symbol, product.price)),
    );
    if let (true, Some(original)) = (product.is_discounted(), product.original_price) {
        content.push_str(&element(
            "span",
            "original-price",
            &escape_html(&price_text(&options.currency_symbol, original)),
        ));
    }
    element("div", "product-price", &content)
}

fn render_variant_select(product: &Product, options: &RenderOptions) -> String {
    let mut select = format!(
        "<select class=\"variant-select\" data-product-id=\"{}\">",
        escape_html(product.id.as_str())
    );
    for label in product.variant_labels(&options.default_variant) {
        let label = escape_html(label);
        select.push_str(&format!("<option value=\"{label}\">{label}</option>"));
    }
    select.push_str("</select>");
    select
}

/// Full grid card for one product
pub fn render_product_card(product: &Product, options: &RenderOptions) -> String {
    let rating = product.rating_or(options.default_rating);
    let image = render_media(product, options);

    let rating_row = format!(
        "{}{}",
        element("span", "stars", &render_stars(rating)),
        element(
            "span",
            "rating-text",
            &escape_html(&rating_text(rating, product.review_count()))
        )
    );

    let link = product.amazon_link.as_deref().unwrap_or("#");
    let actions = format!(
        "{}<a href=\"{}\" target=\"_blank\" class=\"btn btn-add-cart\">ADD TO CART</a>",
        render_variant_select(product, options),
        escape_html(link)
    );

    let details = format!(
        "{}{}{}{}",
        element("h3", "product-name", &escape_html(&product.name)),
        element("div", "product-rating", &rating_row),
        render_price(product, options),
        element("div", "product-actions", &actions)
    );

    format!(
        "<div class=\"product-card\" data-product-id=\"{}\">{}{}</div>",
        escape_html(product.id.as_str()),
        element("div", "product-image", &image),
        element("div", "product-details", &details)
    )
}
