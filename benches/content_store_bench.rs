// ABOUTME: Criterion benchmarks for content store operations on both backends
// ABOUTME: Measures upsert, natural-key lookup, listing, and search on SQLite and the JSON file store
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Portal CMS contributors

//! Criterion benchmarks for content store operations.
//!
//! The JSON file store rewrites its whole document on every write, so its
//! upsert numbers grow with the item count while lookups stay in memory.

#![allow(
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    missing_docs
)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use portal_cms::database_plugins::{ContentProvider, ContentStore};
use portal_cms::models::{ContentQuery, ContentSearch, ContentType, NewContent};
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;
use tokio::runtime::Runtime;

/// Counter for unique keys across benchmark iterations
static KEY_COUNTER: AtomicUsize = AtomicUsize::new(0);

const CATEGORIES: [&str; 4] = ["home", "services", "about", "contact"];

fn generate_text() -> NewContent {
    let counter = KEY_COUNTER.fetch_add(1, Ordering::SeqCst);
    NewContent::text(
        format!("bench.text_{counter}"),
        format!("Benchmark copy number {counter} for the consulting portal"),
    )
    .in_category(CATEGORIES[counter % CATEGORIES.len()])
}

/// Both backends, seeded with `items` texts; the temp dir must outlive the JSON store
async fn create_stores(items: usize) -> (Vec<(&'static str, ContentStore)>, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let json_url = format!("file:{}", dir.path().join("texts.json").display());
    let stores = vec![
        ("sqlite", ContentStore::new("sqlite::memory:").await.unwrap()),
        ("json_file", ContentStore::new(&json_url).await.unwrap()),
    ];
    for (_, store) in &stores {
        for i in 0..items {
            store
                .upsert_content(&NewContent::text(
                    format!("seed.item_{i:05}"),
                    format!("Seeded text {i} about cloud migration and data platforms"),
                ))
                .await
                .unwrap();
        }
    }
    (stores, dir)
}

fn bench_upsert(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("content_upsert");

    for size in [10usize, 200] {
        let (stores, _dir) = rt.block_on(create_stores(size));
        for (name, store) in &stores {
            group.bench_with_input(BenchmarkId::new(*name, size), &size, |b, _| {
                b.iter(|| {
                    let content = generate_text();
                    rt.block_on(async { store.upsert_content(black_box(&content)).await })
                        .unwrap()
                });
            });
        }
    }

    group.finish();
}

fn bench_get(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("content_get");
    let (stores, _dir) = rt.block_on(create_stores(500));

    for (name, store) in &stores {
        group.bench_function(*name, |b| {
            b.iter(|| {
                rt.block_on(async {
                    store
                        .get_content(ContentType::Text, black_box("seed.item_00250"))
                        .await
                })
                .unwrap()
            });
        });
    }

    group.finish();
}

fn bench_list(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("content_list");
    let (stores, _dir) = rt.block_on(create_stores(500));

    group.throughput(Throughput::Elements(100));
    for (name, store) in &stores {
        group.bench_function(*name, |b| {
            let query = ContentQuery::of_type(ContentType::Text).page(100, 200);
            b.iter(|| {
                rt.block_on(async { store.list_content(black_box(&query)).await })
                    .unwrap()
            });
        });
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("content_search");
    let (stores, _dir) = rt.block_on(create_stores(500));

    for (name, store) in &stores {
        for term in ["migration", "item_0042", "no such text"] {
            let search = ContentSearch::new(term, None, None).unwrap();
            group.bench_with_input(BenchmarkId::new(*name, term), &search, |b, search| {
                b.iter(|| {
                    rt.block_on(async { store.search_content(black_box(search)).await })
                        .unwrap()
                });
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_upsert, bench_get, bench_list, bench_search);
criterion_main!(benches);
