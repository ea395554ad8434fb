// ABOUTME: Tests for copying content between stores with the sync routine behind content-sync
// ABOUTME: Verifies the source is never modified, missing sources fail, and copies are idempotent
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Portal CMS contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use portal_cms::content_sync::{sync_content, SyncOptions};
use portal_cms::database_plugins::{ContentProvider, ContentStore};
use portal_cms::errors::ErrorCode;
use portal_cms::models::{ContentType, NewContent};
use serde_json::json;
use std::path::Path;

const LEGACY_TEXTS: &str = r#"{"hero.title":"Hi","footer.note":"Bye"}"#;

fn file_url(path: &Path) -> String {
    format!("file:{}", path.display())
}

fn sqlite_url(path: &Path) -> String {
    format!("sqlite:{}", path.display())
}

#[tokio::test]
async fn test_dry_run_leaves_legacy_source_untouched() {
    common::init_test_logging();
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("texts.json");
    std::fs::write(&source, LEGACY_TEXTS).unwrap();
    let target = dir.path().join("content.db");

    let report = sync_content(
        &file_url(&source),
        &sqlite_url(&target),
        SyncOptions {
            dry_run: true,
            ..SyncOptions::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(report.read, 2);
    assert_eq!(report.copied, 0);
    assert!(report.target_total.is_none());
    assert_eq!(std::fs::read_to_string(&source).unwrap(), LEGACY_TEXTS);
    assert!(!target.exists(), "dry run must not create the target");
}

#[tokio::test]
async fn test_missing_source_fails_without_creating_it() {
    common::init_test_logging();
    let dir = tempfile::tempdir().unwrap();
    let typo = dir.path().join("txets.json");
    let missing_db = dir.path().join("missing.db");
    let target = dir.path().join("out.json");

    let err = sync_content(&file_url(&typo), &file_url(&target), SyncOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
    assert!(!typo.exists());

    let err = sync_content(&sqlite_url(&missing_db), &file_url(&target), SyncOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
    assert!(!missing_db.exists());
    assert!(!target.exists());
}

#[tokio::test]
async fn test_sync_copies_legacy_texts_and_is_idempotent() {
    common::init_test_logging();
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("texts.json");
    std::fs::write(&source, LEGACY_TEXTS).unwrap();
    let target = sqlite_url(&dir.path().join("content.db"));

    let report = sync_content(&file_url(&source), &target, SyncOptions::default())
        .await
        .unwrap();
    assert_eq!(report.copied, 2);
    assert_eq!(report.failed, 0);
    assert_eq!(report.target_total, Some(2));

    let store = ContentStore::new(&target).await.unwrap();
    let first_id = store
        .get_content(ContentType::Text, "hero.title")
        .await
        .unwrap()
        .unwrap()
        .id;

    let again = sync_content(&file_url(&source), &target, SyncOptions::default())
        .await
        .unwrap();
    assert_eq!(again.target_total, Some(2));
    let after = store
        .get_content(ContentType::Text, "hero.title")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.id, first_id);
    assert_eq!(after.value.as_deref(), Some("Hi"));
    assert_eq!(std::fs::read_to_string(&source).unwrap(), LEGACY_TEXTS);
}

#[tokio::test]
async fn test_sync_filters_by_type_from_sqlite_source() {
    common::init_test_logging();
    let dir = tempfile::tempdir().unwrap();
    let source = sqlite_url(&dir.path().join("content.db"));
    {
        let store = ContentStore::new(&source).await.unwrap();
        store
            .upsert_content(&NewContent::text("hero.title", "Cloud consulting"))
            .await
            .unwrap();
        store
            .upsert_content(&NewContent::structured(
                "services.cloud",
                json!({ "name": "Cloud" }).as_object().cloned().unwrap(),
            ))
            .await
            .unwrap();
    }
    let target = file_url(&dir.path().join("texts.json"));

    let report = sync_content(
        &source,
        &target,
        SyncOptions {
            content_type: Some(ContentType::Text),
            dry_run: false,
        },
    )
    .await
    .unwrap();

    assert_eq!(report.read, 1);
    assert_eq!(report.target_total, Some(1));
}

#[tokio::test]
async fn test_same_location_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("texts.json");
    std::fs::write(&source, LEGACY_TEXTS).unwrap();
    let same = dir.path().join(".").join("texts.json");

    let err = sync_content(&file_url(&source), &file_url(&same), SyncOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
}

#[tokio::test]
async fn test_read_only_json_store_refuses_writes() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("texts.json");
    std::fs::write(&source, LEGACY_TEXTS).unwrap();

    let store = ContentStore::open_read_only(&file_url(&source)).await.unwrap();
    assert_eq!(store.count_content().await.unwrap(), 2);

    let err = store
        .upsert_content(&NewContent::text("hero.title", "Changed"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceUnavailable);
    assert_eq!(
        store
            .get_content(ContentType::Text, "hero.title")
            .await
            .unwrap()
            .unwrap()
            .value
            .as_deref(),
        Some("Hi")
    );
    assert_eq!(std::fs::read_to_string(&source).unwrap(), LEGACY_TEXTS);
}
