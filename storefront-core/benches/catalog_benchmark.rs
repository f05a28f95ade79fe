//! Performance benchmarks for catalog queries
//! Target: a few thousand products searched and sorted well under a frame

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use storefront_core::catalog::{parse_feed, sort, Product, SortKey};
use storefront_core::render::{render_grid, RenderOptions};
use storefront_core::search::{search_limited, RESULT_LIMIT};

const CATEGORIES: &[&str] = &["leaf", "root", "seed", "flower", "bark"];

fn synthetic_catalog(size: usize) -> Vec<Product> {
    let feed: Vec<serde_json::Value> = (0..size)
        .map(|i| {
            serde_json::json!({
                "id": i,
                "name": format!("Herb {i} {}", CATEGORIES[i % CATEGORIES.len()]),
                "category": CATEGORIES[i % CATEGORIES.len()],
                "price": 50 + (i * 37) % 900,
                "originalPrice": 100 + (i * 53) % 1000,
                "description": "Small-batch powder, sun dried and stone ground.",
                "benefits": ["Supports digestion", "Rich in antioxidants"],
                "images": [format!("img/herb-{i}.jpg")]
            })
        })
        .collect();
    let body = serde_json::to_string(&feed).unwrap();
    parse_feed(&body).unwrap().products
}

fn benchmark_feed_parse(c: &mut Criterion) {
    let products = synthetic_catalog(2_000);
    let body = serde_json::to_string(&products).unwrap();

    c.bench_function("parse_feed_2000", |b| {
        b.iter(|| {
            let _snapshot = parse_feed(black_box(&body)).unwrap();
        });
    });
}

fn benchmark_search(c: &mut Criterion) {
    let products = synthetic_catalog(2_000);

    c.bench_function("search_2000", |b| {
        b.iter(|| {
            let _results = search_limited(black_box(&products), black_box("antiox"), RESULT_LIMIT);
        });
    });
}

fn benchmark_sort_and_render(c: &mut Criterion) {
    let products = synthetic_catalog(2_000);
    let options = RenderOptions::default();

    c.bench_function("sort_name_2000", |b| {
        b.iter(|| {
            let _sorted = sort(black_box(&products), SortKey::NameAsc);
        });
    });

    c.bench_function("sort_discount_render_2000", |b| {
        b.iter(|| {
            let sorted = sort(black_box(&products), SortKey::Discount);
            let _html = render_grid(sorted, &options);
        });
    });
}

criterion_group!(
    benches,
    benchmark_feed_parse,
    benchmark_search,
    benchmark_sort_and_render
);
criterion_main!(benches);
