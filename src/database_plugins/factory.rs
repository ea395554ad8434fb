// ABOUTME: Content store factory that picks SQLite or JSON file storage from the store URL
// ABOUTME: Provides the ContentStore enum that delegates every operation to the chosen backend
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Portal CMS contributors

//! Store factory for creating content store instances

use super::json_file::JsonFileContentStore;
use super::sqlite::SqliteContentStore;
use super::ContentProvider;
use crate::config::StoreUrl;
use crate::errors::AppResult;
use async_trait::async_trait;
use portal_core::models::{
    ContentItem, ContentQuery, ContentSearch, ContentType, ContentUpdate, NewContent,
};
use tracing::{debug, info};
use uuid::Uuid;

/// Supported store backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreType {
    /// Relational storage
    SQLite,
    /// Single JSON document
    JsonFile,
}

/// Store instance wrapper that delegates to the appropriate implementation
#[derive(Debug, Clone)]
pub enum ContentStore {
    /// `SQLite` backend
    SQLite(SqliteContentStore),
    /// JSON file backend
    JsonFile(JsonFileContentStore),
}

impl ContentStore {
    /// Get a descriptive string for the current backend
    #[must_use]
    pub const fn backend_info(&self) -> &'static str {
        match self {
            Self::SQLite(_) => "SQLite",
            Self::JsonFile(_) => "JSON file",
        }
    }

    /// Get the store type enum
    #[must_use]
    pub const fn store_type(&self) -> StoreType {
        match self {
            Self::SQLite(_) => StoreType::SQLite,
            Self::JsonFile(_) => StoreType::JsonFile,
        }
    }

    /// Create a store from a URL, detecting the backend from its scheme
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is unsupported or the backend cannot be opened
    pub async fn new(store_url: &str) -> AppResult<Self> {
        debug!("Detecting store type from URL: {}", store_url);
        let store_type = detect_store_type(store_url)?;
        info!("Detected store type: {:?}", store_type);

        match store_type {
            StoreType::SQLite => {
                let store = SqliteContentStore::new(store_url).await?;
                info!("SQLite content store initialized");
                Ok(Self::SQLite(store))
            }
            StoreType::JsonFile => {
                let store = JsonFileContentStore::new(store_url).await?;
                info!("JSON file content store initialized");
                Ok(Self::JsonFile(store))
            }
        }
    }

    /// Open an existing store for reading without creating or migrating it
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the file or database does not exist
    pub async fn open_read_only(store_url: &str) -> AppResult<Self> {
        match detect_store_type(store_url)? {
            StoreType::SQLite => Ok(Self::SQLite(
                SqliteContentStore::open_read_only(store_url).await?,
            )),
            StoreType::JsonFile => Ok(Self::JsonFile(
                JsonFileContentStore::open_read_only(store_url).await?,
            )),
        }
    }
}

/// Detect the store backend from a URL
///
/// # Errors
///
/// Returns `ConfigInvalid` for unsupported URLs
pub fn detect_store_type(store_url: &str) -> AppResult<StoreType> {
    let url = StoreUrl::parse_url(store_url)?;
    Ok(if url.is_sqlite() {
        StoreType::SQLite
    } else {
        StoreType::JsonFile
    })
}

#[async_trait]
impl ContentProvider for ContentStore {
    async fn new(store_url: &str) -> AppResult<Self> {
        Self::new(store_url).await
    }

    async fn migrate(&self) -> AppResult<()> {
        match self {
            Self::SQLite(db) => db.migrate().await,
            Self::JsonFile(db) => db.migrate().await,
        }
    }

    async fn get_content(
        &self,
        content_type: ContentType,
        key: &str,
    ) -> AppResult<Option<ContentItem>> {
        match self {
            Self::SQLite(db) => db.get_content(content_type, key).await,
            Self::JsonFile(db) => db.get_content(content_type, key).await,
        }
    }

    async fn get_content_by_id(&self, id: Uuid) -> AppResult<Option<ContentItem>> {
        match self {
            Self::SQLite(db) => db.get_content_by_id(id).await,
            Self::JsonFile(db) => db.get_content_by_id(id).await,
        }
    }

    async fn list_content(&self, query: &ContentQuery) -> AppResult<Vec<ContentItem>> {
        match self {
            Self::SQLite(db) => db.list_content(query).await,
            Self::JsonFile(db) => db.list_content(query).await,
        }
    }

    async fn search_content(&self, search: &ContentSearch) -> AppResult<Vec<ContentItem>> {
        match self {
            Self::SQLite(db) => db.search_content(search).await,
            Self::JsonFile(db) => db.search_content(search).await,
        }
    }

    async fn list_categories(&self) -> AppResult<Vec<String>> {
        match self {
            Self::SQLite(db) => db.list_categories().await,
            Self::JsonFile(db) => db.list_categories().await,
        }
    }

    async fn upsert_content(&self, content: &NewContent) -> AppResult<ContentItem> {
        match self {
            Self::SQLite(db) => db.upsert_content(content).await,
            Self::JsonFile(db) => db.upsert_content(content).await,
        }
    }

    async fn update_content(&self, id: Uuid, update: &ContentUpdate) -> AppResult<ContentItem> {
        match self {
            Self::SQLite(db) => db.update_content(id, update).await,
            Self::JsonFile(db) => db.update_content(id, update).await,
        }
    }

    async fn delete_content(&self, id: Uuid) -> AppResult<bool> {
        match self {
            Self::SQLite(db) => db.delete_content(id).await,
            Self::JsonFile(db) => db.delete_content(id).await,
        }
    }

    async fn count_content(&self) -> AppResult<u64> {
        match self {
            Self::SQLite(db) => db.count_content().await,
            Self::JsonFile(db) => db.count_content().await,
        }
    }

    async fn health_check(&self) -> AppResult<()> {
        match self {
            Self::SQLite(db) => db.health_check().await,
            Self::JsonFile(db) => db.health_check().await,
        }
    }
}
