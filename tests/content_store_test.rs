// ABOUTME: Behavioral tests shared by the SQLite and JSON file content stores
// ABOUTME: Every scenario runs against both backends so they stay interchangeable
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Portal CMS contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use portal_cms::database_plugins::{ContentProvider, ContentStore};
use portal_cms::errors::ErrorCode;
use portal_cms::models::{
    ContentFields, ContentQuery, ContentSearch, ContentType, ContentUpdate, NewContent,
};
use serde_json::{json, Value};
use uuid::Uuid;

fn fields(value: Value) -> ContentFields {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

async fn with_both_stores<F, Fut>(scenario: F)
where
    F: Fn(ContentStore) -> Fut,
    Fut: std::future::Future<Output = ()>,
{
    let sqlite = common::create_test_sqlite_store().await.unwrap();
    scenario(sqlite).await;

    let dir = tempfile::tempdir().unwrap();
    let json = common::create_test_json_store(dir.path()).await.unwrap();
    scenario(json).await;
}

#[tokio::test]
async fn test_upsert_creates_then_overwrites_by_natural_key() {
    with_both_stores(|store| async move {
        let first = store
            .upsert_content(&NewContent::text("hero.title", "Cloud consulting"))
            .await
            .unwrap();
        assert_eq!(first.value.as_deref(), Some("Cloud consulting"));
        assert_eq!(first.created_at, first.updated_at);

        let second = store
            .upsert_content(&NewContent::text("hero.title", "Cloud & data consulting").in_category("home"))
            .await
            .unwrap();

        assert_eq!(second.id, first.id, "{}", store.backend_info());
        assert_eq!(second.created_at, first.created_at);
        assert!(second.updated_at >= first.updated_at);
        assert_eq!(second.value.as_deref(), Some("Cloud & data consulting"));
        assert_eq!(second.category.as_deref(), Some("home"));
        assert_eq!(store.count_content().await.unwrap(), 1);
    })
    .await;
}

#[tokio::test]
async fn test_same_key_under_different_types_is_distinct() {
    with_both_stores(|store| async move {
        store
            .upsert_content(&NewContent::text("contact", "Contact us"))
            .await
            .unwrap();
        store
            .upsert_content(&NewContent::structured(
                "contact",
                fields(json!({ "email": "hello@example.com" })),
            ))
            .await
            .unwrap();

        assert_eq!(store.count_content().await.unwrap(), 2);
        let text = store
            .get_content(ContentType::Text, "contact")
            .await
            .unwrap()
            .unwrap();
        let structured = store
            .get_content(ContentType::Structured, "contact")
            .await
            .unwrap()
            .unwrap();
        assert_ne!(text.id, structured.id);
        assert_eq!(
            structured.fields.unwrap()["email"],
            json!("hello@example.com")
        );
    })
    .await;
}

#[tokio::test]
async fn test_get_missing_returns_none() {
    with_both_stores(|store| async move {
        assert!(store
            .get_content(ContentType::Text, "missing.key")
            .await
            .unwrap()
            .is_none());
        assert!(store
            .get_content_by_id(Uuid::new_v4())
            .await
            .unwrap()
            .is_none());
    })
    .await;
}

#[tokio::test]
async fn test_get_by_id_matches_natural_key_lookup() {
    with_both_stores(|store| async move {
        let saved = store
            .upsert_content(&NewContent::text("footer.copyright", "(c) Example"))
            .await
            .unwrap();
        let by_id = store.get_content_by_id(saved.id).await.unwrap().unwrap();
        assert_eq!(by_id, saved);
    })
    .await;
}

#[tokio::test]
async fn test_invalid_payloads_are_rejected_without_writing() {
    with_both_stores(|store| async move {
        let mut text_with_fields = NewContent::text("hero.title", "x");
        text_with_fields.fields = Some(fields(json!({ "a": 1 })));
        let err = store.upsert_content(&text_with_fields).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);

        let err = store
            .upsert_content(&NewContent::text("bad key!", "x"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);

        let err = store
            .upsert_content(&NewContent::text("", "x"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingRequiredField);

        let mut structured_without_fields = NewContent::structured("card", ContentFields::new());
        structured_without_fields.fields = None;
        let err = store
            .upsert_content(&structured_without_fields)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingRequiredField);

        assert_eq!(store.count_content().await.unwrap(), 0);
    })
    .await;
}

#[tokio::test]
async fn test_list_filters_and_pages_in_stable_order() {
    with_both_stores(|store| async move {
        for key in ["c.three", "a.one", "b.two"] {
            store
                .upsert_content(&NewContent::text(key, key).in_category("home"))
                .await
                .unwrap();
        }
        store
            .upsert_content(&NewContent::text("about.intro", "About").in_category("about"))
            .await
            .unwrap();
        store
            .upsert_content(
                &NewContent::structured("services.cloud", fields(json!({ "title": "Cloud" })))
                    .in_category("services"),
            )
            .await
            .unwrap();

        let texts = store
            .list_content(&ContentQuery::of_type(ContentType::Text))
            .await
            .unwrap();
        let keys: Vec<&str> = texts.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, ["a.one", "about.intro", "b.two", "c.three"]);

        let home = store
            .list_content(&ContentQuery::of_type(ContentType::Text).in_category("home"))
            .await
            .unwrap();
        assert_eq!(home.len(), 3);

        let second_page = store
            .list_content(&ContentQuery::of_type(ContentType::Text).page(2, 2))
            .await
            .unwrap();
        let keys: Vec<&str> = second_page.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, ["b.two", "c.three"]);

        let everything = store.list_content(&ContentQuery::default()).await.unwrap();
        assert_eq!(everything.len(), 5);
        assert_eq!(everything[0].content_type, ContentType::Structured);
    })
    .await;
}

#[tokio::test]
async fn test_search_is_case_insensitive_across_key_value_and_fields() {
    with_both_stores(|store| async move {
        store
            .upsert_content(&NewContent::text("hero.title", "Cloud Migration Experts"))
            .await
            .unwrap();
        store
            .upsert_content(&NewContent::structured(
                "services.data",
                fields(json!({ "title": "Data platforms", "summary": "Lakehouse MIGRATION" })),
            ))
            .await
            .unwrap();
        store
            .upsert_content(&NewContent::text("migration.note", "See services"))
            .await
            .unwrap();
        store
            .upsert_content(&NewContent::text("footer.legal", "Imprint"))
            .await
            .unwrap();

        let hits = store
            .search_content(&ContentSearch::new("  Migration ", None, None).unwrap())
            .await
            .unwrap();
        let keys: Vec<&str> = hits.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, ["services.data", "hero.title", "migration.note"]);

        let texts_only = store
            .search_content(&ContentSearch::new("migration", Some(ContentType::Text), Some(1)).unwrap())
            .await
            .unwrap();
        assert_eq!(texts_only.len(), 1);
        assert_eq!(texts_only[0].key, "hero.title");
    })
    .await;
}

#[tokio::test]
async fn test_search_folds_non_ascii_case() {
    with_both_stores(|store| async move {
        store
            .upsert_content(&NewContent::text("nav.about", "ÜBER UNS"))
            .await
            .unwrap();
        let team = store
            .upsert_content(&NewContent::structured(
                "team.lead",
                fields(json!({ "role": "Geschäftsführerin" })),
            ))
            .await
            .unwrap();

        let hits = store
            .search_content(&ContentSearch::new("über", None, None).unwrap())
            .await
            .unwrap();
        let keys: Vec<&str> = hits.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, ["nav.about"], "{}", store.backend_info());

        let hits = store
            .search_content(&ContentSearch::new("GESCHÄFTS", None, None).unwrap())
            .await
            .unwrap();
        assert_eq!(hits.len(), 1, "{}", store.backend_info());

        store
            .update_content(
                team.id,
                &ContentUpdate {
                    fields: Some(fields(json!({ "role": "ÄRZTIN" }))),
                    ..ContentUpdate::default()
                },
            )
            .await
            .unwrap();
        let hits = store
            .search_content(&ContentSearch::new("ärztin", None, None).unwrap())
            .await
            .unwrap();
        assert_eq!(hits.len(), 1, "{}", store.backend_info());
        assert!(store
            .search_content(&ContentSearch::new("geschäfts", None, None).unwrap())
            .await
            .unwrap()
            .is_empty());
    })
    .await;
}

#[tokio::test]
async fn test_search_treats_like_wildcards_literally() {
    with_both_stores(|store| async move {
        store
            .upsert_content(&NewContent::text("offer.discount", "Save 100% today"))
            .await
            .unwrap();
        store
            .upsert_content(&NewContent::text("offer.plain", "Save 1000 today"))
            .await
            .unwrap();

        let hits = store
            .search_content(&ContentSearch::new("0%", None, None).unwrap())
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].key, "offer.discount");
    })
    .await;
}

#[tokio::test]
async fn test_list_categories_is_distinct_and_sorted() {
    with_both_stores(|store| async move {
        store
            .upsert_content(&NewContent::text("a", "x").in_category("services"))
            .await
            .unwrap();
        store
            .upsert_content(&NewContent::text("b", "x").in_category("about"))
            .await
            .unwrap();
        store
            .upsert_content(&NewContent::text("c", "x").in_category("services"))
            .await
            .unwrap();
        store
            .upsert_content(&NewContent::text("d", "x"))
            .await
            .unwrap();

        assert_eq!(
            store.list_categories().await.unwrap(),
            vec!["about".to_owned(), "services".to_owned()]
        );
    })
    .await;
}

#[tokio::test]
async fn test_update_by_id_applies_partial_changes() {
    with_both_stores(|store| async move {
        let saved = store
            .upsert_content(&NewContent::text("hero.cta", "Book a call").in_category("home"))
            .await
            .unwrap();

        let updated = store
            .update_content(
                saved.id,
                &ContentUpdate {
                    value: Some("Book a free call".to_owned()),
                    ..ContentUpdate::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.id, saved.id);
        assert_eq!(updated.value.as_deref(), Some("Book a free call"));
        assert_eq!(updated.category.as_deref(), Some("home"));

        let cleared = store
            .update_content(
                saved.id,
                &ContentUpdate {
                    category: Some(String::new()),
                    ..ContentUpdate::default()
                },
            )
            .await
            .unwrap();
        assert!(cleared.category.is_none());

        let reloaded = store
            .get_content(ContentType::Text, "hero.cta")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reloaded.value.as_deref(), Some("Book a free call"));
        assert!(reloaded.category.is_none());
    })
    .await;
}

#[tokio::test]
async fn test_update_rejects_invalid_result_and_unknown_id() {
    with_both_stores(|store| async move {
        let saved = store
            .upsert_content(&NewContent::text("hero.cta", "Book a call"))
            .await
            .unwrap();

        let err = store
            .update_content(
                saved.id,
                &ContentUpdate {
                    fields: Some(fields(json!({ "label": "x" }))),
                    ..ContentUpdate::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
        let unchanged = store.get_content_by_id(saved.id).await.unwrap().unwrap();
        assert!(unchanged.fields.is_none());

        let err = store
            .update_content(Uuid::new_v4(), &ContentUpdate::default())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ResourceNotFound);
    })
    .await;
}

#[tokio::test]
async fn test_delete_by_id_reports_whether_anything_was_removed() {
    with_both_stores(|store| async move {
        let saved = store
            .upsert_content(&NewContent::text("temp.notice", "Closed for holidays"))
            .await
            .unwrap();

        assert!(store.delete_content(saved.id).await.unwrap());
        assert!(!store.delete_content(saved.id).await.unwrap());
        assert!(store
            .get_content(ContentType::Text, "temp.notice")
            .await
            .unwrap()
            .is_none());

        let recreated = store
            .upsert_content(&NewContent::text("temp.notice", "Back in January"))
            .await
            .unwrap();
        assert_ne!(recreated.id, saved.id);
    })
    .await;
}

#[tokio::test]
async fn test_page_items_are_keyed_by_path() {
    with_both_stores(|store| async move {
        let page = fields(json!({
            "title": "Services",
            "sections": [
                { "key": "intro", "items": [ { "key": "lead", "kind": "text", "value": "What we do" } ] }
            ]
        }));
        store
            .upsert_content(&NewContent::with_fields(ContentType::Page, "/services", page))
            .await
            .unwrap();

        let err = store
            .upsert_content(&NewContent::with_fields(
                ContentType::Page,
                "services",
                fields(json!({ "title": "No slash" })),
            ))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);

        let err = store
            .upsert_content(&NewContent::with_fields(
                ContentType::Page,
                "/broken",
                fields(json!({ "sections": [] })),
            ))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);

        let stored = store
            .get_content(ContentType::Page, "/services")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.fields.unwrap()["title"], json!("Services"));
    })
    .await;
}

#[tokio::test]
async fn test_health_check_passes_for_fresh_store() {
    with_both_stores(|store| async move {
        store.health_check().await.unwrap();
        store.migrate().await.unwrap();
        assert_eq!(store.count_content().await.unwrap(), 0);
    })
    .await;
}

#[tokio::test]
async fn test_sqlite_migrate_indexes_rows_from_older_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("content.db");
    let options = sqlx::sqlite::SqliteConnectOptions::new()
        .filename(&path)
        .create_if_missing(true);
    let pool = sqlx::SqlitePool::connect_with(options).await.unwrap();
    sqlx::query(
        "CREATE TABLE content_items (
            id TEXT PRIMARY KEY,
            content_type TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT,
            fields TEXT,
            category TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE(content_type, key)
        )",
    )
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO content_items (id, content_type, key, value, created_at, updated_at)
         VALUES (?1, 'text', 'nav.about', 'ÜBER UNS', ?2, ?2)",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(chrono::Utc::now().to_rfc3339())
    .execute(&pool)
    .await
    .unwrap();
    pool.close().await;

    let store = ContentStore::new(&format!("sqlite:{}", path.display()))
        .await
        .unwrap();
    let hits = store
        .search_content(&ContentSearch::new("über", None, None).unwrap())
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].value.as_deref(), Some("ÜBER UNS"));
}
