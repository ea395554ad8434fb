// ABOUTME: JSON document content store with in-memory index and write-through persistence
// ABOUTME: Loads versioned or legacy flat documents and rewrites the file atomically on each mutation
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Portal CMS contributors

//! JSON file implementation of [`ContentProvider`]
//!
//! The whole document is held in memory and every mutation is persisted by
//! writing a sibling temp file and renaming it over the original. The write
//! lock is held for the duration of the write, so mutations within one
//! process are serialized and never interleave on disk. Separate processes
//! pointed at the same file are not coordinated.
//!
//! [`JsonFileContentStore::open_read_only`] loads an existing file without
//! ever writing it back; legacy documents stay in their original format.

use super::ContentProvider;
use crate::config::StoreUrl;
use crate::errors::{AppError, AppResult, ErrorCode};
use async_trait::async_trait;
use chrono::Utc;
use portal_core::constants::file_store::FORMAT_VERSION;
use portal_core::models::{
    ContentItem, ContentQuery, ContentSearch, ContentType, ContentUpdate, NewContent,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

type NaturalKey = (String, String);

fn natural_key(content_type: ContentType, key: &str) -> NaturalKey {
    (content_type.as_str().to_owned(), key.to_owned())
}

/// On-disk document layout
#[derive(Debug, Serialize, Deserialize)]
struct StoreDocument {
    version: u32,
    #[serde(default)]
    items: Vec<ContentItem>,
}

/// JSON file content store
#[derive(Debug, Clone)]
pub struct JsonFileContentStore {
    path: Arc<PathBuf>,
    items: Arc<RwLock<BTreeMap<NaturalKey, ContentItem>>>,
    read_only: bool,
}

impl JsonFileContentStore {
    /// Load an existing file for reading; no migration and no writes
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the file does not exist, or a format
    /// error if it cannot be parsed
    pub async fn open_read_only(store_url: &str) -> AppResult<Self> {
        let path = Self::resolve_path(store_url)?;
        let exists = tokio::fs::try_exists(&path).await.map_err(|e| {
            AppError::storage(format!("Failed to check {}: {e}", path.display()))
        })?;
        if !exists {
            return Err(AppError::not_found(format!(
                "Content file {}",
                path.display()
            )));
        }
        let items = Self::load(&path).await?;
        Ok(Self {
            path: Arc::new(path),
            items: Arc::new(RwLock::new(items)),
            read_only: true,
        })
    }

    /// Whether mutations are refused
    #[must_use]
    pub const fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Path of the backing document
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn resolve_path(store_url: &str) -> AppResult<PathBuf> {
        match StoreUrl::parse_url(store_url)? {
            StoreUrl::JsonFile { path } => Ok(path),
            _ => Err(AppError::config(format!(
                "Store URL {store_url} is not a JSON file URL"
            ))),
        }
    }

    async fn load(path: &Path) -> AppResult<BTreeMap<NaturalKey, ContentItem>> {
        let raw = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "Content file does not exist yet");
                return Ok(BTreeMap::new());
            }
            Err(e) => {
                return Err(AppError::storage(format!(
                    "Failed to read {}: {e}",
                    path.display()
                )))
            }
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        let items = parse_document(&raw, path)?;
        let mut map = BTreeMap::new();
        for item in items {
            item.validate()?;
            let key = natural_key(item.content_type, &item.key);
            if map.insert(key, item).is_some() {
                warn!(path = %path.display(), "Duplicate natural key in content file; keeping last");
            }
        }
        info!(path = %path.display(), items = map.len(), "Loaded JSON content store");
        Ok(map)
    }

    async fn persist(&self, items: &BTreeMap<NaturalKey, ContentItem>) -> AppResult<()> {
        if self.read_only {
            return Err(AppError::new(
                ErrorCode::ResourceUnavailable,
                format!("{} is opened read-only", self.path.display()),
            ));
        }
        let document = StoreDocument {
            version: FORMAT_VERSION,
            items: items.values().cloned().collect(),
        };
        let encoded = serde_json::to_vec_pretty(&document)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = temp_path(&self.path);
        tokio::fs::write(&tmp, &encoded).await.map_err(|e| {
            AppError::storage(format!("Failed to write {}: {e}", tmp.display()))
        })?;
        tokio::fs::rename(&tmp, self.path.as_path())
            .await
            .map_err(|e| {
                AppError::storage(format!(
                    "Failed to replace {}: {e}",
                    self.path.display()
                ))
            })?;

        debug!(path = %self.path.display(), items = items.len(), "Persisted JSON content store");
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map_or_else(|| "content.json".into(), |n| n.to_string_lossy().into_owned());
    path.with_file_name(format!(".{name}.tmp"))
}

/// Decode either the versioned document or a legacy flat `{ key: text }` map
fn parse_document(raw: &str, path: &Path) -> AppResult<Vec<ContentItem>> {
    let value: Value = serde_json::from_str(raw).map_err(|e| {
        AppError::new(
            ErrorCode::InvalidFormat,
            format!("{} is not valid JSON: {e}", path.display()),
        )
    })?;

    let Value::Object(map) = value else {
        return Err(AppError::new(
            ErrorCode::InvalidFormat,
            format!("{} must contain a JSON object", path.display()),
        ));
    };

    if map.contains_key("version") && map.contains_key("items") {
        let document: StoreDocument = serde_json::from_value(Value::Object(map))?;
        if document.version > FORMAT_VERSION {
            return Err(AppError::new(
                ErrorCode::InvalidFormat,
                format!(
                    "{} has format version {}, newest supported is {FORMAT_VERSION}",
                    path.display(),
                    document.version
                ),
            ));
        }
        return Ok(document.items);
    }

    let now = Utc::now();
    let mut items = Vec::with_capacity(map.len());
    for (key, value) in map {
        let Value::String(text) = value else {
            return Err(AppError::new(
                ErrorCode::InvalidFormat,
                format!(
                    "Legacy content file {} has a non-string value for {key}",
                    path.display()
                ),
            ));
        };
        items.push(ContentItem::from_new(&NewContent::text(key, text), now));
    }
    info!(path = %path.display(), items = items.len(), "Read legacy flat content file");
    Ok(items)
}

#[async_trait]
impl ContentProvider for JsonFileContentStore {
    async fn new(store_url: &str) -> AppResult<Self> {
        let path = Self::resolve_path(store_url)?;
        let items = Self::load(&path).await?;
        let store = Self {
            path: Arc::new(path),
            items: Arc::new(RwLock::new(items)),
            read_only: false,
        };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> AppResult<()> {
        if self.read_only {
            return Ok(());
        }
        let items = self.items.write().await;
        let on_disk_current = match tokio::fs::read_to_string(self.path.as_path()).await {
            Ok(raw) => serde_json::from_str::<Value>(&raw)
                .ok()
                .and_then(|v| v.get("version").and_then(Value::as_u64))
                == Some(u64::from(FORMAT_VERSION)),
            Err(_) => false,
        };
        if !on_disk_current {
            self.persist(&items).await?;
        }
        Ok(())
    }

    async fn get_content(
        &self,
        content_type: ContentType,
        key: &str,
    ) -> AppResult<Option<ContentItem>> {
        let items = self.items.read().await;
        Ok(items.get(&natural_key(content_type, key)).cloned())
    }

    async fn get_content_by_id(&self, id: Uuid) -> AppResult<Option<ContentItem>> {
        let items = self.items.read().await;
        Ok(items.values().find(|item| item.id == id).cloned())
    }

    async fn list_content(&self, query: &ContentQuery) -> AppResult<Vec<ContentItem>> {
        let items = self.items.read().await;
        Ok(items
            .values()
            .filter(|item| query.matches(item))
            .skip(query.effective_offset() as usize)
            .take(query.effective_limit() as usize)
            .cloned()
            .collect())
    }

    async fn search_content(&self, search: &ContentSearch) -> AppResult<Vec<ContentItem>> {
        let items = self.items.read().await;
        Ok(items
            .values()
            .filter(|item| search.matches(item))
            .take(search.limit as usize)
            .cloned()
            .collect())
    }

    async fn list_categories(&self) -> AppResult<Vec<String>> {
        let items = self.items.read().await;
        let categories: BTreeSet<&String> =
            items.values().filter_map(|item| item.category.as_ref()).collect();
        Ok(categories.into_iter().cloned().collect())
    }

    async fn upsert_content(&self, content: &NewContent) -> AppResult<ContentItem> {
        content.validate()?;
        let now = Utc::now();
        let key = natural_key(content.content_type, &content.key);

        let mut items = self.items.write().await;
        let stored = match items.get(&key) {
            Some(existing) => {
                let mut updated = existing.clone();
                updated.overwrite_with(content, now);
                updated
            }
            None => ContentItem::from_new(content, now),
        };

        let previous = items.insert(key.clone(), stored.clone());
        if let Err(e) = self.persist(&items).await {
            match previous {
                Some(old) => items.insert(key, old),
                None => items.remove(&key),
            };
            return Err(e);
        }
        Ok(stored)
    }

    async fn update_content(&self, id: Uuid, update: &ContentUpdate) -> AppResult<ContentItem> {
        let mut items = self.items.write().await;
        let (key, current) = items
            .iter()
            .find(|(_, item)| item.id == id)
            .map(|(k, item)| (k.clone(), item.clone()))
            .ok_or_else(|| AppError::not_found(format!("Content {id}")))?;

        let mut updated = current.clone();
        updated.apply_update(update, Utc::now())?;
        items.insert(key.clone(), updated.clone());

        if let Err(e) = self.persist(&items).await {
            items.insert(key, current);
            return Err(e);
        }
        Ok(updated)
    }

    async fn delete_content(&self, id: Uuid) -> AppResult<bool> {
        let mut items = self.items.write().await;
        let Some(key) = items
            .iter()
            .find(|(_, item)| item.id == id)
            .map(|(k, _)| k.clone())
        else {
            return Ok(false);
        };

        let removed = items.remove(&key);
        if let Err(e) = self.persist(&items).await {
            if let Some(item) = removed {
                items.insert(key, item);
            }
            return Err(e);
        }
        Ok(true)
    }

    async fn count_content(&self) -> AppResult<u64> {
        let items = self.items.read().await;
        Ok(items.len() as u64)
    }

    async fn health_check(&self) -> AppResult<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let metadata = tokio::fs::metadata(dir).await.map_err(|e| {
            AppError::storage(format!("Content directory {} is unavailable: {e}", dir.display()))
        })?;
        if metadata.permissions().readonly() {
            return Err(AppError::storage(format!(
                "Content directory {} is read-only",
                dir.display()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_path_is_hidden_sibling() {
        let tmp = temp_path(Path::new("/data/texts.json"));
        assert_eq!(tmp, PathBuf::from("/data/.texts.json.tmp"));
    }

    #[test]
    fn test_parse_legacy_flat_document() {
        let items = parse_document(
            r#"{"hero.title": "Welcome", "footer.note": "Bye"}"#,
            Path::new("texts.json"),
        )
        .unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.content_type == ContentType::Text));
    }

    #[test]
    fn test_parse_rejects_newer_version() {
        let err = parse_document(r#"{"version": 99, "items": []}"#, Path::new("x.json"))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);
    }

    #[test]
    fn test_parse_rejects_non_string_legacy_value() {
        assert!(parse_document(r#"{"hero.title": 3}"#, Path::new("x.json")).is_err());
    }
}
