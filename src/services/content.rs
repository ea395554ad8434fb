// ABOUTME: Content service implementing text, page, collection, and mail settings rules
// ABOUTME: Wraps a ContentStore and logs every mutation for auditing
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Portal CMS contributors

use crate::database_plugins::{ContentProvider, ContentStore};
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use crate::services::templates::EmailTemplate;
use portal_core::constants::{categories, keys, limits};
use portal_core::models::{
    ContentFields, ContentItem, ContentQuery, ContentSearch, ContentType, ContentUpdate,
    NewContent, PageContent, PageRecord,
};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Content operations over one store
#[derive(Debug, Clone)]
pub struct ContentService {
    store: ContentStore,
}

impl ContentService {
    /// Wrap a store
    #[must_use]
    pub const fn new(store: ContentStore) -> Self {
        Self { store }
    }

    /// Underlying store
    #[must_use]
    pub const fn store(&self) -> &ContentStore {
        &self.store
    }

    // ================================
    // Generic content
    // ================================

    /// Look up an item by natural key
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails
    pub async fn get(&self, content_type: ContentType, key: &str) -> AppResult<Option<ContentItem>> {
        self.store.get_content(content_type, key).await
    }

    /// One page of items matching a filter
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails
    pub async fn list(&self, query: &ContentQuery) -> AppResult<Vec<ContentItem>> {
        self.store.list_content(query).await
    }

    /// Every item matching a filter, paging through the store
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails
    pub async fn list_all(&self, query: &ContentQuery) -> AppResult<Vec<ContentItem>> {
        let mut all = Vec::new();
        let mut offset = 0u32;
        loop {
            let page = query.clone().page(limits::MAX_LIST_LIMIT, offset);
            let batch = self.store.list_content(&page).await?;
            let fetched = batch.len();
            all.extend(batch);
            if fetched < limits::MAX_LIST_LIMIT as usize {
                return Ok(all);
            }
            offset = offset.saturating_add(limits::MAX_LIST_LIMIT);
        }
    }

    /// Search items
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails
    pub async fn search(&self, search: &ContentSearch) -> AppResult<Vec<ContentItem>> {
        self.store.search_content(search).await
    }

    /// Distinct categories
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails
    pub async fn categories(&self) -> AppResult<Vec<String>> {
        self.store.list_categories().await
    }

    /// Insert or overwrite by natural key
    ///
    /// # Errors
    ///
    /// Returns a validation error or a store failure
    pub async fn upsert(&self, content: &NewContent) -> AppResult<ContentItem> {
        let item = self.store.upsert_content(content).await?;
        AppLogger::log_content_write(
            "upsert",
            item.content_type.as_str(),
            &item.key,
            self.store.backend_info(),
        );
        Ok(item)
    }

    /// Partial update by id
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound`, a validation error, or a store failure
    pub async fn update(&self, id: Uuid, update: &ContentUpdate) -> AppResult<ContentItem> {
        if update.is_empty() {
            return Err(AppError::invalid_input(
                "Update must set at least one of value, fields, or category",
            ));
        }
        let item = self.store.update_content(id, update).await?;
        AppLogger::log_content_write(
            "update",
            item.content_type.as_str(),
            &item.key,
            self.store.backend_info(),
        );
        Ok(item)
    }

    /// Delete by id
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let removed = self.store.delete_content(id).await?;
        if removed {
            AppLogger::log_content_write("delete", "-", &id.to_string(), self.store.backend_info());
        }
        Ok(removed)
    }

    /// Delete by natural key
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails
    pub async fn delete_by_key(&self, content_type: ContentType, key: &str) -> AppResult<bool> {
        let Some(item) = self.store.get_content(content_type, key).await? else {
            return Ok(false);
        };
        let removed = self.store.delete_content(item.id).await?;
        if removed {
            AppLogger::log_content_write(
                "delete",
                content_type.as_str(),
                key,
                self.store.backend_info(),
            );
        }
        Ok(removed)
    }

    // ================================
    // Texts
    // ================================

    /// Stored text value, or `default` when absent
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails
    pub async fn text(&self, key: &str, default: &str) -> AppResult<String> {
        Ok(self
            .store
            .get_content(ContentType::Text, key)
            .await?
            .and_then(|item| item.value)
            .unwrap_or_else(|| default.to_owned()))
    }

    /// All text values keyed by content key, optionally limited to one category
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails
    pub async fn texts(&self, category: Option<&str>) -> AppResult<BTreeMap<String, String>> {
        let mut query = ContentQuery::of_type(ContentType::Text);
        if let Some(category) = category {
            query = query.in_category(category);
        }
        Ok(self
            .list_all(&query)
            .await?
            .into_iter()
            .filter_map(|item| item.value.map(|value| (item.key, value)))
            .collect())
    }

    /// Save a single text value, keeping its category if `category` is `None`
    ///
    /// # Errors
    ///
    /// Returns a validation error or a store failure
    pub async fn save_text(
        &self,
        key: &str,
        value: &str,
        category: Option<&str>,
    ) -> AppResult<ContentItem> {
        let category = match category {
            Some(c) => Some(c.to_owned()),
            None => self
                .store
                .get_content(ContentType::Text, key)
                .await?
                .and_then(|existing| existing.category),
        };
        let mut content = NewContent::text(key, value);
        content.category = category;
        self.upsert(&content).await
    }

    // ================================
    // Pages
    // ================================

    /// Page at a URL path
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or the stored page is malformed
    pub async fn get_page(&self, path: &str) -> AppResult<Option<PageRecord>> {
        self.store
            .get_content(ContentType::Page, path)
            .await?
            .as_ref()
            .map(PageRecord::try_from)
            .transpose()
    }

    /// Every page, ordered by path
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or a stored page is malformed
    pub async fn list_pages(&self) -> AppResult<Vec<PageRecord>> {
        self.list_all(&ContentQuery::of_type(ContentType::Page))
            .await?
            .iter()
            .map(PageRecord::try_from)
            .collect()
    }

    /// Validate and save a page under its path
    ///
    /// # Errors
    ///
    /// Returns a validation error or a store failure
    pub async fn save_page(&self, page: &PageContent) -> AppResult<PageRecord> {
        page.validate()?;
        let item = self.upsert(&page.to_new_content()?).await?;
        PageRecord::try_from(&item)
    }

    /// Delete the page at a path
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails
    pub async fn delete_page(&self, path: &str) -> AppResult<bool> {
        self.delete_by_key(ContentType::Page, path).await
    }

    // ================================
    // Collections
    // ================================

    /// Structured items of one data domain ordered by `fields.order`, then key
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for unknown domains
    pub async fn collection(&self, domain: &str) -> AppResult<Vec<ContentItem>> {
        ensure_collection_domain(domain)?;
        let mut items = self
            .list_all(&ContentQuery::of_type(ContentType::Structured).in_category(domain))
            .await?;
        items.sort_by(compare_collection_items);
        Ok(items)
    }

    /// Save one collection entry; the stored key is `{domain}.{key}`
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for unknown domains, or a validation error
    pub async fn save_collection_item(
        &self,
        domain: &str,
        key: &str,
        fields: ContentFields,
    ) -> AppResult<ContentItem> {
        ensure_collection_domain(domain)?;
        let content = NewContent::structured(collection_key(domain, key), fields).in_category(domain);
        self.upsert(&content).await
    }

    /// Delete one collection entry
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for unknown domains
    pub async fn delete_collection_item(&self, domain: &str, key: &str) -> AppResult<bool> {
        ensure_collection_domain(domain)?;
        self.delete_by_key(ContentType::Structured, &collection_key(domain, key))
            .await
    }

    // ================================
    // Settings
    // ================================

    /// Stored mail configuration fields
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails
    pub async fn mail_config(&self) -> AppResult<Option<ContentFields>> {
        Ok(self
            .store
            .get_content(ContentType::Structured, keys::MAIL_CONFIG)
            .await?
            .and_then(|item| item.fields))
    }

    /// Replace the mail configuration
    ///
    /// # Errors
    ///
    /// Returns a validation error or a store failure
    pub async fn save_mail_config(&self, fields: ContentFields) -> AppResult<ContentItem> {
        let content =
            NewContent::structured(keys::MAIL_CONFIG, fields).in_category(categories::SETTINGS);
        self.upsert(&content).await
    }

    /// Email template stored under `key`
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if absent, or `InvalidFormat` if malformed
    pub async fn email_template(&self, key: &str) -> AppResult<EmailTemplate> {
        let item = self
            .store
            .get_content(ContentType::Structured, key)
            .await?
            .filter(|item| item.category.as_deref() == Some(categories::EMAIL_TEMPLATES))
            .ok_or_else(|| AppError::not_found(format!("Email template {key}")))?;
        EmailTemplate::from_item(&item)
    }
}

fn ensure_collection_domain(domain: &str) -> AppResult<()> {
    if categories::is_collection_domain(domain) {
        Ok(())
    } else {
        Err(AppError::not_found(format!("Collection {domain}")))
    }
}

fn collection_key(domain: &str, key: &str) -> String {
    let prefix = format!("{domain}.");
    if key.starts_with(&prefix) {
        key.to_owned()
    } else {
        format!("{prefix}{key}")
    }
}

fn sort_order(item: &ContentItem) -> Option<f64> {
    item.fields
        .as_ref()
        .and_then(|fields| fields.get("order"))
        .and_then(Value::as_f64)
}

/// Items with an `order` come first, ascending; the rest follow by key
fn compare_collection_items(a: &ContentItem, b: &ContentItem) -> Ordering {
    match (sort_order(a), sort_order(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y).then_with(|| a.key.cmp(&b.key)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.key.cmp(&b.key),
    }
}
