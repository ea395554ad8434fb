// ABOUTME: SQLite content store backed by a single content_items table
// ABOUTME: Upserts by (content_type, key) with ON CONFLICT and keeps a pre-folded search column
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Portal CMS contributors

//! `SQLite` implementation of [`ContentProvider`]
//!
//! `search_text` holds the Unicode-lowercased value or fields JSON of each
//! row, written on every upsert and update. `SQLite`'s own `LOWER()` and
//! `LIKE` only fold ASCII, so search never lowercases payload text in SQL.

use super::ContentProvider;
use crate::config::StoreUrl;
use crate::errors::{AppError, AppResult, ErrorCode};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use portal_core::models::{
    payload_search_text, ContentFields, ContentItem, ContentQuery, ContentSearch, ContentType,
    ContentUpdate, NewContent,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use std::str::FromStr;
use tracing::{debug, info};
use uuid::Uuid;

const SELECT_COLUMNS: &str =
    "SELECT id, content_type, key, value, fields, category, created_at, updated_at FROM content_items";

/// `SQLite` content store
#[derive(Debug, Clone)]
pub struct SqliteContentStore {
    pool: Pool<Sqlite>,
}

impl SqliteContentStore {
    /// Open an existing database file read-only, without running migrations
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the file does not exist and
    /// `ConfigInvalid` for `sqlite::memory:`, which has nothing to read
    pub async fn open_read_only(store_url: &str) -> AppResult<Self> {
        let path = match StoreUrl::parse_url(store_url)? {
            StoreUrl::Sqlite { path } => path,
            StoreUrl::SqliteMemory => {
                return Err(AppError::new(
                    ErrorCode::ConfigInvalid,
                    "An in-memory database cannot be opened as an existing store",
                ))
            }
            StoreUrl::JsonFile { .. } => {
                return Err(AppError::config(format!(
                    "Store URL {store_url} is not a SQLite URL"
                )))
            }
        };
        let exists = tokio::fs::try_exists(&path).await.map_err(|e| {
            AppError::storage(format!("Failed to check {}: {e}", path.display()))
        })?;
        if !exists {
            return Err(AppError::not_found(format!("Database {}", path.display())));
        }

        let options = SqliteConnectOptions::new()
            .filename(&path)
            .read_only(true)
            .create_if_missing(false);
        let pool = SqlitePoolOptions::new()
            .max_connections(2)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    async fn connect(store_url: &str) -> AppResult<Pool<Sqlite>> {
        let url = StoreUrl::parse_url(store_url)?;
        match url {
            StoreUrl::SqliteMemory => {
                // Every connection to :memory: is a separate database, so keep exactly one alive
                let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
                Ok(SqlitePoolOptions::new()
                    .max_connections(1)
                    .idle_timeout(None)
                    .max_lifetime(None)
                    .connect_with(options)
                    .await?)
            }
            StoreUrl::Sqlite { path } => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    tokio::fs::create_dir_all(parent).await?;
                }
                let options = SqliteConnectOptions::new()
                    .filename(&path)
                    .create_if_missing(true)
                    .foreign_keys(true);
                Ok(SqlitePoolOptions::new()
                    .max_connections(5)
                    .connect_with(options)
                    .await?)
            }
            StoreUrl::JsonFile { .. } => Err(AppError::config(format!(
                "Store URL {store_url} is not a SQLite URL"
            ))),
        }
    }

    fn row_to_item(row: &SqliteRow) -> AppResult<ContentItem> {
        let id: String = row.try_get("id")?;
        let content_type: String = row.try_get("content_type")?;
        let fields: Option<String> = row.try_get("fields")?;
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;

        Ok(ContentItem {
            id: Uuid::parse_str(&id)
                .map_err(|e| AppError::database(format!("Invalid content id {id}: {e}")))?,
            content_type: ContentType::from_str(&content_type)?,
            key: row.try_get("key")?,
            value: row.try_get("value")?,
            fields: fields
                .map(|raw| serde_json::from_str::<ContentFields>(&raw))
                .transpose()?,
            category: row.try_get("category")?,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        })
    }

    fn encode_fields(fields: Option<&ContentFields>) -> AppResult<Option<String>> {
        Ok(fields.map(serde_json::to_string).transpose()?)
    }

    /// Add and fill `search_text` on tables created before the column existed
    async fn backfill_search_text(&self) -> AppResult<()> {
        let has_column: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM pragma_table_info('content_items') WHERE name = 'search_text'",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to inspect content_items: {e}")))?;
        if has_column == 0 {
            sqlx::query("ALTER TABLE content_items ADD COLUMN search_text TEXT")
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to add search_text column: {e}")))?;
        }

        let rows = sqlx::query(
            "SELECT id, value, fields FROM content_items WHERE search_text IS NULL",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to read rows for search_text: {e}")))?;
        for row in &rows {
            let id: String = row.try_get("id")?;
            let value: Option<String> = row.try_get("value")?;
            let fields: Option<String> = row.try_get("fields")?;
            let fields = fields
                .map(|raw| serde_json::from_str::<ContentFields>(&raw))
                .transpose()?;
            sqlx::query("UPDATE content_items SET search_text = ?1 WHERE id = ?2")
                .bind(payload_search_text(value.as_deref(), fields.as_ref()))
                .bind(&id)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to index content {id}: {e}")))?;
        }
        if !rows.is_empty() {
            info!(rows = rows.len(), "Backfilled content search text");
        }
        Ok(())
    }
}

fn parse_timestamp(raw: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| AppError::database(format!("Invalid timestamp {raw}: {e}")))
}

#[async_trait]
impl ContentProvider for SqliteContentStore {
    async fn new(store_url: &str) -> AppResult<Self> {
        let pool = Self::connect(store_url).await?;
        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS content_items (
                id TEXT PRIMARY KEY,
                content_type TEXT NOT NULL CHECK (content_type IN ('text', 'structured', 'section', 'page')),
                key TEXT NOT NULL,
                value TEXT,
                fields TEXT,
                category TEXT,
                search_text TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                UNIQUE(content_type, key)
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create content_items table: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_content_items_category ON content_items(category)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create category index: {e}")))?;

        self.backfill_search_text().await
    }

    async fn get_content(
        &self,
        content_type: ContentType,
        key: &str,
    ) -> AppResult<Option<ContentItem>> {
        let row = sqlx::query(&format!(
            "{SELECT_COLUMNS} WHERE content_type = ?1 AND key = ?2"
        ))
        .bind(content_type.as_str())
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get content {content_type}/{key}: {e}")))?;

        row.as_ref().map(Self::row_to_item).transpose()
    }

    async fn get_content_by_id(&self, id: Uuid) -> AppResult<Option<ContentItem>> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE id = ?1"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get content {id}: {e}")))?;

        row.as_ref().map(Self::row_to_item).transpose()
    }

    async fn list_content(&self, query: &ContentQuery) -> AppResult<Vec<ContentItem>> {
        let rows = sqlx::query(&format!(
            "{SELECT_COLUMNS}
             WHERE (?1 IS NULL OR content_type = ?1)
               AND (?2 IS NULL OR category = ?2)
             ORDER BY content_type, key
             LIMIT ?3 OFFSET ?4"
        ))
        .bind(query.content_type.map(ContentType::as_str))
        .bind(query.category.as_deref())
        .bind(i64::from(query.effective_limit()))
        .bind(i64::from(query.effective_offset()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list content: {e}")))?;

        debug!(rows = rows.len(), "Listed content items");
        rows.iter().map(Self::row_to_item).collect()
    }

    async fn search_content(&self, search: &ContentSearch) -> AppResult<Vec<ContentItem>> {
        let rows = sqlx::query(&format!(
            r"{SELECT_COLUMNS}
             WHERE (?1 IS NULL OR content_type = ?1)
               AND (LOWER(key) LIKE ?2 ESCAPE '\'
                    OR COALESCE(search_text, '') LIKE ?2 ESCAPE '\')
             ORDER BY content_type, key
             LIMIT ?3"
        ))
        .bind(search.content_type.map(ContentType::as_str))
        .bind(search.like_pattern())
        .bind(i64::from(search.limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to search content: {e}")))?;

        rows.iter().map(Self::row_to_item).collect()
    }

    async fn list_categories(&self) -> AppResult<Vec<String>> {
        let rows = sqlx::query(
            "SELECT DISTINCT category FROM content_items WHERE category IS NOT NULL ORDER BY category",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list categories: {e}")))?;

        rows.iter()
            .map(|row| row.try_get::<String, _>("category").map_err(AppError::from))
            .collect()
    }

    async fn upsert_content(&self, content: &NewContent) -> AppResult<ContentItem> {
        content.validate()?;
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r"
            INSERT INTO content_items
                (id, content_type, key, value, fields, category, search_text, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
            ON CONFLICT(content_type, key) DO UPDATE SET
                value = excluded.value,
                fields = excluded.fields,
                category = excluded.category,
                search_text = excluded.search_text,
                updated_at = excluded.updated_at
            ",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(content.content_type.as_str())
        .bind(&content.key)
        .bind(content.value.as_deref())
        .bind(Self::encode_fields(content.fields.as_ref())?)
        .bind(content.category.as_deref())
        .bind(content.search_text())
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::database(format!(
                "Failed to upsert content {}/{}: {e}",
                content.content_type, content.key
            ))
        })?;

        self.get_content(content.content_type, &content.key)
            .await?
            .ok_or_else(|| AppError::database("Upserted content row is missing"))
    }

    async fn update_content(&self, id: Uuid, update: &ContentUpdate) -> AppResult<ContentItem> {
        let mut item = self
            .get_content_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Content {id}")))?;
        item.apply_update(update, Utc::now())?;

        sqlx::query(
            r"
            UPDATE content_items
            SET value = ?1, fields = ?2, category = ?3, search_text = ?4, updated_at = ?5
            WHERE id = ?6
            ",
        )
        .bind(item.value.as_deref())
        .bind(Self::encode_fields(item.fields.as_ref())?)
        .bind(item.category.as_deref())
        .bind(item.search_text())
        .bind(item.updated_at.to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update content {id}: {e}")))?;

        Ok(item)
    }

    async fn delete_content(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM content_items WHERE id = ?1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete content {id}: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_content(&self) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM content_items")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count content: {e}")))?;

        u64::try_from(count).map_err(|e| AppError::database(format!("Invalid row count: {e}")))
    }

    async fn health_check(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("SQLite health check failed: {e}")))?;
        Ok(())
    }
}
