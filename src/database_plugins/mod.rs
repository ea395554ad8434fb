// ABOUTME: Content store abstraction layer for the portal CMS
// ABOUTME: Plugin architecture with SQLite and JSON file backends behind one trait
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Portal CMS contributors

use crate::errors::AppResult;
use async_trait::async_trait;
use portal_core::models::{
    ContentItem, ContentQuery, ContentSearch, ContentType, ContentUpdate, NewContent,
};
use uuid::Uuid;

/// Store factory and backend detection
pub mod factory;
/// JSON document backend
pub mod json_file;
/// `SQLite` backend
pub mod sqlite;

pub use factory::{detect_store_type, ContentStore, StoreType};

/// Core content store abstraction
///
/// Both backends enforce the same content rules: `(type, key)` is unique,
/// upserts keep `id` and `created_at`, and lists come back ordered by
/// `(type, key)`.
#[async_trait]
pub trait ContentProvider: Send + Sync + Clone {
    /// Open or create the store and run migrations
    async fn new(store_url: &str) -> AppResult<Self>
    where
        Self: Sized;

    /// Create the schema or document if missing
    async fn migrate(&self) -> AppResult<()>;

    /// Look up an item by its natural key
    async fn get_content(&self, content_type: ContentType, key: &str)
        -> AppResult<Option<ContentItem>>;

    /// Look up an item by id
    async fn get_content_by_id(&self, id: Uuid) -> AppResult<Option<ContentItem>>;

    /// List items matching a filter, ordered by `(type, key)`
    async fn list_content(&self, query: &ContentQuery) -> AppResult<Vec<ContentItem>>;

    /// Case-insensitive substring search over key, value, and fields
    async fn search_content(&self, search: &ContentSearch) -> AppResult<Vec<ContentItem>>;

    /// Distinct non-null categories, sorted
    async fn list_categories(&self) -> AppResult<Vec<String>>;

    /// Insert or overwrite by `(type, key)` and return the stored item
    async fn upsert_content(&self, content: &NewContent) -> AppResult<ContentItem>;

    /// Apply a partial update by id
    async fn update_content(&self, id: Uuid, update: &ContentUpdate) -> AppResult<ContentItem>;

    /// Delete by id; `true` if an item was removed
    async fn delete_content(&self, id: Uuid) -> AppResult<bool>;

    /// Number of stored items
    async fn count_content(&self) -> AppResult<u64>;

    /// Check the backend is reachable
    async fn health_check(&self) -> AppResult<()>;
}
