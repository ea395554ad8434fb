// ABOUTME: HTTP integration tests for catalog collection routes
// ABOUTME: Covers domain validation, key prefixing, ordering, and admin save/delete
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Portal CMS contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use axum::http::StatusCode;
use helpers::axum_test::{login_cookie, AxumTestRequest};
use portal_cms::models::{ContentItem, ContentType};
use serde_json::{json, Value};

#[tokio::test]
async fn test_collection_entries_are_prefixed_and_categorized() {
    let app = common::create_test_app().await.unwrap();
    let cookie = login_cookie(app.router(), common::TEST_ADMIN_PASSWORD).await;

    let saved: ContentItem = AxumTestRequest::put("/api/admin/collections/services/cloud-migration")
        .cookie(&cookie)
        .json(&json!({ "title": "Cloud migration", "order": 2 }))
        .send(app.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(saved.key, "services.cloud-migration");
    assert_eq!(saved.content_type, ContentType::Structured);
    assert_eq!(saved.category.as_deref(), Some("services"));

    // Already-prefixed keys are not prefixed twice
    let same: ContentItem =
        AxumTestRequest::put("/api/admin/collections/services/services.cloud-migration")
            .cookie(&cookie)
            .json(&json!({ "title": "Cloud migration", "order": 1 }))
            .send(app.router())
            .await
            .assert_status(StatusCode::OK)
            .json();
    assert_eq!(same.id, saved.id);
}

#[tokio::test]
async fn test_collection_is_ordered_by_order_then_key() {
    let app = common::create_test_app().await.unwrap();
    let content = &app.resources.content;
    for (key, fields) in [
        ("zeta", json!({ "title": "Z" })),
        ("alpha", json!({ "title": "A" })),
        ("second", json!({ "title": "2", "order": 2 })),
        ("first", json!({ "title": "1", "order": 1 })),
    ] {
        content
            .save_collection_item("workshops", key, serde_json::from_value(fields).unwrap())
            .await
            .unwrap();
    }
    content
        .save_collection_item("services", "other", serde_json::from_value(json!({ "title": "x" })).unwrap())
        .await
        .unwrap();

    let body: Value = AxumTestRequest::get("/api/collections/workshops")
        .send(app.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["domain"], json!("workshops"));
    let keys: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["key"].as_str().unwrap())
        .collect();
    assert_eq!(
        keys,
        ["workshops.first", "workshops.second", "workshops.alpha", "workshops.zeta"]
    );
}

#[tokio::test]
async fn test_unknown_domain_is_404() {
    let app = common::create_test_app().await.unwrap();
    let cookie = login_cookie(app.router(), common::TEST_ADMIN_PASSWORD).await;

    AxumTestRequest::get("/api/collections/pricing")
        .send(app.router())
        .await
        .assert_status(StatusCode::NOT_FOUND);

    AxumTestRequest::put("/api/admin/collections/pricing/basic")
        .cookie(&cookie)
        .json(&json!({ "title": "Basic" }))
        .send(app.router())
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_empty_collection_lists_no_items() {
    let app = common::create_test_app().await.unwrap();

    let body: Value = AxumTestRequest::get("/api/collections/resources")
        .send(app.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(body["items"], json!([]));
}

#[tokio::test]
async fn test_delete_collection_entry() {
    let app = common::create_test_app().await.unwrap();
    let cookie = login_cookie(app.router(), common::TEST_ADMIN_PASSWORD).await;

    AxumTestRequest::put("/api/admin/collections/resources/whitepaper")
        .cookie(&cookie)
        .json(&json!({ "title": "Whitepaper", "url": "https://example.com/wp.pdf" }))
        .send(app.router())
        .await
        .assert_status(StatusCode::OK);

    AxumTestRequest::delete("/api/admin/collections/resources/whitepaper")
        .cookie(&cookie)
        .send(app.router())
        .await
        .assert_status(StatusCode::NO_CONTENT);
    AxumTestRequest::delete("/api/admin/collections/resources/whitepaper")
        .cookie(&cookie)
        .send(app.router())
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_collection_body_must_be_an_object() {
    let app = common::create_test_app().await.unwrap();
    let cookie = login_cookie(app.router(), common::TEST_ADMIN_PASSWORD).await;

    AxumTestRequest::put("/api/admin/collections/services/cloud")
        .cookie(&cookie)
        .json(&json!(["not", "an", "object"]))
        .send(app.router())
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}
