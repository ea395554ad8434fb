// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides quiet logging, in-memory and temp-file stores, and a ready-made app router
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Portal CMS contributors
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `portal_cms`

use anyhow::Result;
use axum::Router;
use portal_cms::{
    config::{ServerConfig, StoreUrl},
    database_plugins::ContentStore,
    resources::ServerResources,
    server,
};
use std::path::Path;
use std::sync::{Arc, Once};
use tempfile::TempDir;

static INIT_LOGGER: Once = Once::new();

/// Password configured for admin tests
pub const TEST_ADMIN_PASSWORD: &str = "correct horse battery staple";

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// In-memory `SQLite` content store
pub async fn create_test_sqlite_store() -> Result<ContentStore> {
    init_test_logging();
    Ok(ContentStore::new("sqlite::memory:").await?)
}

/// JSON file store inside `dir`
pub async fn create_test_json_store(dir: &Path) -> Result<ContentStore> {
    init_test_logging();
    let url = format!("file:{}", dir.join("texts.json").display());
    Ok(ContentStore::new(&url).await?)
}

/// Test application plus the temp dir that must outlive it
pub struct TestApp {
    /// Router with all layers
    pub app: Router,
    /// Shared resources for direct assertions
    pub resources: Arc<ServerResources>,
    /// Backing directory for the JSON text store
    pub dir: TempDir,
}

impl TestApp {
    /// Fresh router (routers are consumed by `oneshot`)
    pub fn router(&self) -> Router {
        self.app.clone()
    }
}

/// App with an in-memory SQL content store, a temp-file text store, and admin login enabled
pub async fn create_test_app() -> Result<TestApp> {
    create_test_app_with_password(Some(TEST_ADMIN_PASSWORD)).await
}

/// App with a chosen admin password (`None` disables login)
pub async fn create_test_app_with_password(password: Option<&str>) -> Result<TestApp> {
    init_test_logging();
    let dir = tempfile::tempdir()?;
    let text_store = StoreUrl::JsonFile {
        path: dir.path().join("texts.json"),
    };
    let config = ServerConfig::for_testing(text_store, password);
    let resources = Arc::new(ServerResources::new(config).await?);
    let app = server::build_app(resources.clone());
    Ok(TestApp {
        app,
        resources,
        dir,
    })
}
