//! Storefront catalog CLI commands
//!
//! Renders and inspects the product catalog from the terminal, using the
//! same feed, configuration, and markup as the live storefront.

use anyhow::{bail, Context, Result};
use clap::{Subcommand, ValueEnum};
use std::collections::BTreeMap;
use std::sync::Arc;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};
use tracing::{debug, info};

use storefront_core::catalog::{
    featured_products, format_amount, parse_feed, product_by_id, related_products, CatalogStore,
    LoadOutcome, Product, ProductId, SortKey,
};
use storefront_core::search::{search_limited, SearchQuery};
use storefront_core::{MemoryPage, Page, PageController, StorefrontConfig};

/// Output format for search results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The dropdown fragment the storefront shows
    Html,
    Table,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum CatalogCommand {
    /// Render the product grid as HTML
    Render {
        /// Only show this category ("all" shows everything)
        #[clap(long)]
        category: Option<String>,

        /// Sort order (price-low, price-high, name-asc, name-desc, discount)
        #[clap(long)]
        sort: Option<SortKey>,
    },

    /// Search products by name, category, description, and benefits
    Search {
        /// Search query
        query: String,

        /// Output format
        #[clap(long, value_enum, default_value = "html")]
        format: OutputFormat,

        /// Maximum results for table/json output (defaults to the configured limit)
        #[clap(long)]
        limit: Option<usize>,
    },

    /// List the best-discounted products
    Featured {
        /// Number of products to show
        #[clap(long)]
        limit: Option<usize>,

        /// Output as JSON
        #[clap(long)]
        json: bool,
    },

    /// List products in the same category as a product
    Related {
        /// Product id
        id: String,

        /// Output as JSON
        #[clap(long)]
        json: bool,
    },

    /// Show detailed information about a product
    Show {
        /// Product id
        id: String,

        /// Output as JSON
        #[clap(long)]
        json: bool,
    },

    /// Check the feed for integrity problems and summarize it
    Validate {
        /// Output results as JSON
        #[clap(long)]
        json: bool,
    },
}

impl CatalogCommand {
    pub async fn execute(self, config: StorefrontConfig) -> Result<()> {
        match self {
            CatalogCommand::Render { category, sort } => {
                execute_render(config, category.as_deref(), sort).await
            }
            CatalogCommand::Search {
                query,
                format,
                limit,
            } => execute_search(config, &query, format, limit).await,
            CatalogCommand::Featured { limit, json } => {
                execute_featured(&config, limit, json).await
            }
            CatalogCommand::Related { id, json } => execute_related(&config, &id, json).await,
            CatalogCommand::Show { id, json } => execute_show(&config, &id, json).await,
            CatalogCommand::Validate { json } => execute_validate(&config, json).await,
        }
    }
}

/// Load the configured feed into a fresh store
async fn load_catalog(config: &StorefrontConfig) -> Result<Arc<[Product]>> {
    let store = CatalogStore::new();
    let source = config.feed_source();
    match store.load(source.as_ref()).await {
        LoadOutcome::Failed(e) => Err(e)
            .with_context(|| format!("Failed to load product feed from {}", source.describe())),
        outcome => {
            debug!(?outcome, "Catalog ready");
            Ok(store.all())
        }
    }
}

fn find_product<'a>(products: &'a [Product], id: &str) -> Result<&'a Product> {
    product_by_id(products, &ProductId::from(id))
        .with_context(|| format!("Product '{id}' not found in catalog"))
}

/// Table row for product listings
#[derive(Tabled)]
struct ProductRow {
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Discount")]
    discount: String,
}

impl ProductRow {
    fn new(product: &Product, currency: &str) -> Self {
        let name = if product.name.chars().count() > 40 {
            format!("{}...", product.name.chars().take(37).collect::<String>())
        } else {
            product.name.clone()
        };
        let discount = product.discount_percent();
        Self {
            id: product.id.to_string(),
            name,
            category: product.category().unwrap_or("-").to_string(),
            price: format!("{} {}", currency, format_amount(product.price)),
            discount: if discount > 0 {
                format!("{discount}%")
            } else {
                "-".to_string()
            },
        }
    }
}

fn product_json(product: &Product) -> serde_json::Value {
    serde_json::json!({
        "id": product.id,
        "name": product.name,
        "category": product.category,
        "price": product.price,
        "originalPrice": product.original_price,
        "discount": product.discount_percent(),
    })
}

fn print_table(products: &[&Product], currency: &str) {
    let rows: Vec<ProductRow> = products
        .iter()
        .map(|product| ProductRow::new(product, currency))
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .to_string();

    println!("{table}");
}

async fn execute_render(
    config: StorefrontConfig,
    category: Option<&str>,
    sort: Option<SortKey>,
) -> Result<()> {
    let grid = config.elements.grid.clone();
    let ctrl = PageController::new(MemoryPage::with_containers([grid.as_str()]), config);

    if let Some(LoadOutcome::Failed(e)) = ctrl.on_ready().await {
        return Err(e).context("Failed to load product feed");
    }
    if category.is_some() {
        ctrl.on_filter(category);
    }
    if let Some(sort) = sort {
        ctrl.on_sort(sort.as_str());
    }

    let page = ctrl.page();
    println!("{}", page.content(&grid).unwrap_or_default());
    Ok(())
}

async fn execute_search(
    config: StorefrontConfig,
    query: &str,
    format: OutputFormat,
    limit: Option<usize>,
) -> Result<()> {
    let query = match SearchQuery::parse(query, config.search.min_query_len) {
        SearchQuery::Ready(query) => query,
        SearchQuery::TooShort => bail!(
            "Search query must be at least {} characters",
            config.search.min_query_len
        ),
    };

    if format == OutputFormat::Html {
        let container = config.elements.search_results.clone();
        let ctrl =
            PageController::new(MemoryPage::with_containers([container.as_str()]), config);
        ctrl.on_search_submit(&query).await;
        let page = ctrl.page();
        println!("{}", page.content(&container).unwrap_or_default());
        return Ok(());
    }

    let products = load_catalog(&config).await?;
    let limit = limit.unwrap_or(config.search.result_limit);
    let results = search_limited(&products, &query, limit);

    if format == OutputFormat::Json {
        let output = serde_json::json!({
            "query": results.query,
            "total": results.total,
            "results": results.shown.iter().map(|p| product_json(p)).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("\nNo products found for \"{}\".", results.query);
        return Ok(());
    }

    println!("\nFound {} product(s):\n", results.total);
    print_table(&results.shown, &config.catalog.currency_symbol);
    if results.is_truncated() {
        println!(
            "Showing {} of {} results",
            results.shown.len(),
            results.total
        );
    }
    Ok(())
}

async fn execute_featured(
    config: &StorefrontConfig,
    limit: Option<usize>,
    json_output: bool,
) -> Result<()> {
    let products = load_catalog(config).await?;
    let featured = featured_products(&products, limit.unwrap_or(config.catalog.featured_limit));

    if json_output {
        let output: Vec<serde_json::Value> = featured
            .iter()
            .map(|entry| product_json(entry.product))
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if featured.is_empty() {
        println!("\nNo products found.");
        return Ok(());
    }

    let shown: Vec<&Product> = featured.iter().map(|entry| entry.product).collect();
    println!("\nFeatured products:\n");
    print_table(&shown, &config.catalog.currency_symbol);
    Ok(())
}

async fn execute_related(config: &StorefrontConfig, id: &str, json_output: bool) -> Result<()> {
    let products = load_catalog(config).await?;
    let product = find_product(&products, id)?;
    let related = related_products(
        &products,
        &product.id,
        product.category(),
        config.catalog.related_limit,
    );

    if json_output {
        let output: Vec<serde_json::Value> = related.iter().map(|p| product_json(p)).collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if related.is_empty() {
        println!("\nNo related products for '{}'.", product.name);
        return Ok(());
    }

    println!("\nRelated to {}:\n", product.name);
    print_table(&related, &config.catalog.currency_symbol);
    Ok(())
}

async fn execute_show(config: &StorefrontConfig, id: &str, json_output: bool) -> Result<()> {
    let products = load_catalog(config).await?;
    let product = find_product(&products, id)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(product)?);
        return Ok(());
    }

    let currency = &config.catalog.currency_symbol;
    println!();
    println!("Product:  {} ({})", product.name, product.id);
    println!("Category: {}", product.category().unwrap_or("-"));
    match product.original_price.filter(|_| product.is_discounted()) {
        Some(original) => println!(
            "Price:    {} {} (was {} {}, {}% off)",
            currency,
            format_amount(product.price),
            currency,
            format_amount(original),
            product.discount_percent()
        ),
        None => println!("Price:    {} {}", currency, format_amount(product.price)),
    }
    println!(
        "Rating:   {}/5 ({} reviews)",
        product.rating_or(config.catalog.default_rating),
        product.review_count()
    );

    let variants = product.variant_labels(&config.catalog.default_variant);
    println!("Variants:");
    for label in variants {
        match product.variant_price(label) {
            Some(pricing) => println!(
                "  {label}: {} {}",
                currency,
                format_amount(pricing.price)
            ),
            None => println!("  {label}"),
        }
    }

    if !product.benefits.is_empty() {
        println!();
        println!("Benefits:");
        for benefit in &product.benefits {
            println!("  - {benefit}");
        }
    }

    if let Some(description) = &product.description {
        println!();
        println!("Description:");
        for line in description.lines() {
            println!("  {line}");
        }
    }

    let images = product.image_urls();
    if !images.is_empty() {
        println!();
        println!("Images:");
        for image in images {
            println!("  {image}");
        }
    }

    Ok(())
}

/// Table row for the per-category summary
#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Products")]
    products: usize,
    #[tabled(rename = "Discounted")]
    discounted: usize,
}

async fn execute_validate(config: &StorefrontConfig, json_output: bool) -> Result<()> {
    let source = config.feed_source();
    info!("Validating feed at {}", source.describe());

    let body = source
        .fetch()
        .await
        .with_context(|| format!("Failed to read feed from {}", source.describe()))?;

    let snapshot = match parse_feed(&body) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            if json_output {
                let output = serde_json::json!({
                    "feed": source.describe(),
                    "valid": false,
                    "error": e.to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("\nFeed {} is invalid:", source.describe());
                println!("  {e}");
            }
            bail!("Feed validation failed");
        }
    };

    let mut categories: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    for product in &snapshot.products {
        let entry = categories
            .entry(product.category().unwrap_or("(none)").to_string())
            .or_default();
        entry.0 += 1;
        if product.is_discounted() {
            entry.1 += 1;
        }
    }

    if json_output {
        let output = serde_json::json!({
            "feed": source.describe(),
            "valid": true,
            "total": snapshot.total,
            "active": snapshot.products.len(),
            "inactive": snapshot.inactive,
            "categories": categories
                .iter()
                .map(|(name, (count, _))| (name.clone(), *count))
                .collect::<BTreeMap<_, _>>(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("\nFeed {} is valid.", source.describe());
    println!(
        "  {} products ({} active, {} inactive)\n",
        snapshot.total,
        snapshot.products.len(),
        snapshot.inactive
    );

    if !categories.is_empty() {
        let rows: Vec<CategoryRow> = categories
            .into_iter()
            .map(|(category, (products, discounted))| CategoryRow {
                category,
                products,
                discounted,
            })
            .collect();
        let table = Table::new(&rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()))
            .to_string();
        println!("{table}");
    }
    Ok(())
}
