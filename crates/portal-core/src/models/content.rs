// ABOUTME: Content item model with natural-key validation and upsert/update semantics
// ABOUTME: Shared by the SQL and JSON file backends so both enforce identical rules
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Portal CMS contributors

use crate::constants::limits;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::models::page::PageContent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Arbitrary field map carried by structured, section, and page items
pub type ContentFields = serde_json::Map<String, Value>;

/// Kind of content stored under a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Single string value (headlines, paragraphs, button labels)
    Text,
    /// Arbitrary field map (cards, catalog entries, settings)
    Structured,
    /// Reusable block of fields shared between pages
    Section,
    /// Page addressed by URL path, holding ordered sections
    Page,
}

impl ContentType {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Structured => "structured",
            Self::Section => "section",
            Self::Page => "page",
        }
    }

    /// Whether items of this type carry a field map instead of a string value
    #[must_use]
    pub const fn uses_fields(self) -> bool {
        !matches!(self, Self::Text)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "structured" => Ok(Self::Structured),
            "section" => Ok(Self::Section),
            "page" => Ok(Self::Page),
            other => Err(AppError::invalid_input(format!(
                "Invalid content type: {other}"
            ))),
        }
    }
}

/// Validate a content key for the given type
///
/// Page keys are URL paths; every other key is a dotted identifier such as
/// `hero.title` or `services.cloud-migration`.
///
/// # Errors
///
/// Returns `InvalidInput` when the key is empty, too long, or contains
/// characters outside the allowed set.
pub fn validate_key(content_type: ContentType, key: &str) -> AppResult<()> {
    if key.is_empty() {
        return Err(AppError::missing_field("key"));
    }
    if key.len() > limits::MAX_KEY_LENGTH {
        return Err(AppError::new(
            ErrorCode::ValueOutOfRange,
            format!(
                "Key exceeds {} characters",
                limits::MAX_KEY_LENGTH
            ),
        ));
    }

    if content_type == ContentType::Page {
        return validate_page_path(key);
    }

    if let Some(bad) = key
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
    {
        return Err(AppError::invalid_input(format!(
            "Invalid character '{bad}' in key '{key}'"
        )));
    }
    Ok(())
}

fn validate_page_path(path: &str) -> AppResult<()> {
    if !path.starts_with('/') {
        return Err(AppError::invalid_input(format!(
            "Page path must start with '/': {path}"
        )));
    }
    if path.len() > 1 && path.ends_with('/') {
        return Err(AppError::invalid_input(format!(
            "Page path must not end with '/': {path}"
        )));
    }
    if path.contains("//") {
        return Err(AppError::invalid_input(format!(
            "Page path contains an empty segment: {path}"
        )));
    }
    if let Some(bad) = path
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '/' | '.' | '_' | '-')))
    {
        return Err(AppError::invalid_input(format!(
            "Invalid character '{bad}' in page path '{path}'"
        )));
    }
    Ok(())
}

/// Validate an optional category name
///
/// # Errors
///
/// Returns `InvalidInput` when the category is empty, too long, or not made of
/// `[A-Za-z0-9_-]`.
pub fn validate_category(category: Option<&str>) -> AppResult<()> {
    let Some(category) = category else {
        return Ok(());
    };
    if category.is_empty() || category.len() > limits::MAX_CATEGORY_LENGTH {
        return Err(AppError::invalid_input(format!(
            "Category must be 1-{} characters",
            limits::MAX_CATEGORY_LENGTH
        )));
    }
    if !category
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-'))
    {
        return Err(AppError::invalid_input(format!(
            "Invalid category: {category}"
        )));
    }
    Ok(())
}

fn validate_payload(
    content_type: ContentType,
    key: &str,
    value: Option<&String>,
    fields: Option<&ContentFields>,
    category: Option<&str>,
) -> AppResult<()> {
    if content_type.uses_fields() {
        if value.is_some() {
            return Err(AppError::invalid_input(format!(
                "{content_type} content carries fields, not a value"
            )));
        }
        let fields = fields.ok_or_else(|| AppError::missing_field("fields"))?;
        if content_type == ContentType::Page {
            PageContent::from_parts(key, category, fields)?.validate()?;
        }
    } else {
        if fields.is_some() {
            return Err(AppError::invalid_input(
                "text content carries a value, not fields",
            ));
        }
        let value = value.ok_or_else(|| AppError::missing_field("value"))?;
        if value.len() > limits::MAX_TEXT_VALUE_BYTES {
            return Err(AppError::new(
                ErrorCode::ValueOutOfRange,
                format!(
                    "Text value exceeds {} bytes",
                    limits::MAX_TEXT_VALUE_BYTES
                ),
            ));
        }
    }
    Ok(())
}

/// A stored unit of text or structured content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Stable identifier, assigned on first save
    pub id: Uuid,
    /// Content kind
    #[serde(rename = "type")]
    pub content_type: ContentType,
    /// Natural key, unique per content type
    pub key: String,
    /// String payload of text items
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Field map payload of structured, section, and page items
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<ContentFields>,
    /// Optional grouping used by editors and bulk lookups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// First save
    pub created_at: DateTime<Utc>,
    /// Last write
    pub updated_at: DateTime<Utc>,
}

impl ContentItem {
    /// Create a fresh item from an upsert payload
    #[must_use]
    pub fn from_new(content: &NewContent, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content_type: content.content_type,
            key: content.key.clone(),
            value: content.value.clone(),
            fields: content.fields.clone(),
            category: content.category.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the payload with an upsert for the same natural key
    ///
    /// Identity (`id`, `created_at`) is preserved; last write wins for the rest.
    pub fn overwrite_with(&mut self, content: &NewContent, now: DateTime<Utc>) {
        self.value.clone_from(&content.value);
        self.fields.clone_from(&content.fields);
        self.category.clone_from(&content.category);
        self.updated_at = now;
    }

    /// Apply a partial update and re-validate the result
    ///
    /// # Errors
    ///
    /// Returns a validation error if the updated item breaks a content rule,
    /// in which case `self` is left untouched.
    pub fn apply_update(&mut self, update: &ContentUpdate, now: DateTime<Utc>) -> AppResult<()> {
        let mut next = self.clone();
        if let Some(value) = &update.value {
            next.value = Some(value.clone());
        }
        if let Some(fields) = &update.fields {
            next.fields = Some(fields.clone());
        }
        if let Some(category) = &update.category {
            next.category = if category.is_empty() {
                None
            } else {
                Some(category.clone())
            };
        }
        next.validate()?;
        next.updated_at = now;
        *self = next;
        Ok(())
    }

    /// Check the stored item against the content rules
    ///
    /// # Errors
    ///
    /// Returns a validation error describing the first broken rule.
    pub fn validate(&self) -> AppResult<()> {
        validate_key(self.content_type, &self.key)?;
        validate_category(self.category.as_deref())?;
        validate_payload(
            self.content_type,
            &self.key,
            self.value.as_ref(),
            self.fields.as_ref(),
            self.category.as_deref(),
        )
    }

    /// Lowercased value or serialized fields, as matched by search
    #[must_use]
    pub fn search_text(&self) -> String {
        payload_search_text(self.value.as_deref(), self.fields.as_ref())
    }
}

/// Upsert payload keyed by `(content_type, key)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewContent {
    /// Content kind
    #[serde(rename = "type")]
    pub content_type: ContentType,
    /// Natural key
    pub key: String,
    /// String payload (text only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Field map payload (structured, section, page)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<ContentFields>,
    /// Optional grouping
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl NewContent {
    /// Lowercased value or serialized fields, as matched by search
    #[must_use]
    pub fn search_text(&self) -> String {
        payload_search_text(self.value.as_deref(), self.fields.as_ref())
    }

    /// Text item payload
    pub fn text(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            content_type: ContentType::Text,
            key: key.into(),
            value: Some(value.into()),
            fields: None,
            category: None,
        }
    }

    /// Structured item payload
    pub fn structured(key: impl Into<String>, fields: ContentFields) -> Self {
        Self::with_fields(ContentType::Structured, key, fields)
    }

    /// Payload for any field-carrying type
    pub fn with_fields(content_type: ContentType, key: impl Into<String>, fields: ContentFields) -> Self {
        Self {
            content_type,
            key: key.into(),
            value: None,
            fields: Some(fields),
            category: None,
        }
    }

    /// Set the category
    #[must_use]
    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Check the payload against the content rules
    ///
    /// # Errors
    ///
    /// Returns a validation error describing the first broken rule.
    pub fn validate(&self) -> AppResult<()> {
        validate_key(self.content_type, &self.key)?;
        validate_category(self.category.as_deref())?;
        validate_payload(
            self.content_type,
            &self.key,
            self.value.as_ref(),
            self.fields.as_ref(),
            self.category.as_deref(),
        )
    }
}

/// Partial update applied by id
///
/// An empty `category` string clears the category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentUpdate {
    /// Replacement text value
    #[serde(default)]
    pub value: Option<String>,
    /// Replacement field map
    #[serde(default)]
    pub fields: Option<ContentFields>,
    /// Replacement category (`""` clears it)
    #[serde(default)]
    pub category: Option<String>,
}

impl ContentUpdate {
    /// Whether the update changes nothing
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.value.is_none() && self.fields.is_none() && self.category.is_none()
    }
}

/// Filter for list operations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentQuery {
    /// Restrict to one content type
    #[serde(default, rename = "type")]
    pub content_type: Option<ContentType>,
    /// Restrict to one category
    #[serde(default)]
    pub category: Option<String>,
    /// Page size (clamped to `MAX_LIST_LIMIT`)
    #[serde(default)]
    pub limit: Option<u32>,
    /// Number of items to skip
    #[serde(default)]
    pub offset: Option<u32>,
}

impl ContentQuery {
    /// Query for every item of one type
    #[must_use]
    pub fn of_type(content_type: ContentType) -> Self {
        Self {
            content_type: Some(content_type),
            ..Self::default()
        }
    }

    /// Restrict to a category
    #[must_use]
    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the page window
    #[must_use]
    pub const fn page(mut self, limit: u32, offset: u32) -> Self {
        self.limit = Some(limit);
        self.offset = Some(offset);
        self
    }

    /// Page size after defaults and clamping
    #[must_use]
    pub fn effective_limit(&self) -> u32 {
        self.limit
            .unwrap_or(limits::DEFAULT_LIST_LIMIT)
            .clamp(1, limits::MAX_LIST_LIMIT)
    }

    /// Offset after defaults
    #[must_use]
    pub fn effective_offset(&self) -> u32 {
        self.offset.unwrap_or(0)
    }

    /// Whether an item passes the type and category filters
    #[must_use]
    pub fn matches(&self, item: &ContentItem) -> bool {
        self.content_type.map_or(true, |t| t == item.content_type)
            && self
                .category
                .as_deref()
                .map_or(true, |c| item.category.as_deref() == Some(c))
    }
}

/// Normalized case-insensitive substring search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentSearch {
    term: String,
    /// Restrict to one content type
    pub content_type: Option<ContentType>,
    /// Maximum number of hits
    pub limit: u32,
}

impl ContentSearch {
    /// Build a search from raw user input
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the trimmed term is shorter than
    /// `MIN_SEARCH_TERM_LENGTH` characters.
    pub fn new(term: &str, content_type: Option<ContentType>, limit: Option<u32>) -> AppResult<Self> {
        let term = term.trim().to_lowercase();
        if term.chars().count() < limits::MIN_SEARCH_TERM_LENGTH {
            return Err(AppError::invalid_input(format!(
                "Search term must be at least {} characters",
                limits::MIN_SEARCH_TERM_LENGTH
            )));
        }
        Ok(Self {
            term,
            content_type,
            limit: limit
                .unwrap_or(limits::DEFAULT_SEARCH_LIMIT)
                .clamp(1, limits::MAX_LIST_LIMIT),
        })
    }

    /// Lowercased search term
    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    /// SQL `LIKE` pattern with `%`, `_` and `\` escaped (use with `ESCAPE '\'`)
    #[must_use]
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.term.len() + 2);
        pattern.push('%');
        for c in self.term.chars() {
            if matches!(c, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        pattern
    }

    /// Whether an item matches on key, value, or serialized fields
    #[must_use]
    pub fn matches(&self, item: &ContentItem) -> bool {
        if self.content_type.is_some_and(|t| t != item.content_type) {
            return false;
        }
        item.key.to_ascii_lowercase().contains(&self.term)
            || item.search_text().contains(&self.term)
    }
}

/// Lowercased payload text that search terms are matched against
///
/// Keys are ASCII and matched separately. Every backend compares against this
/// text, so `über` finds `ÜBER UNS` regardless of the store.
#[must_use]
pub fn payload_search_text(value: Option<&str>, fields: Option<&ContentFields>) -> String {
    let mut text = value.map(str::to_lowercase).unwrap_or_default();
    if let Some(encoded) = fields.and_then(|f| serde_json::to_string(f).ok()) {
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(&encoded.to_lowercase());
    }
    text
}
