// ABOUTME: Typed page view over page content items addressed by URL path
// ABOUTME: Converts between PageContent and the stored field map with section validation
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Portal CMS contributors

use crate::errors::{AppError, AppResult, ErrorCode};
use crate::models::content::{
    validate_category, validate_key, ContentFields, ContentItem, ContentType, NewContent,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use uuid::Uuid;

/// Payload kind of an item embedded in a page section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionItemKind {
    /// String value
    Text,
    /// Field map
    Structured,
}

/// Item embedded in a page section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionItem {
    /// Key unique within the section
    pub key: String,
    /// Payload kind
    pub kind: SectionItemKind,
    /// Text payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Structured payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<ContentFields>,
}

/// Ordered block of items on a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSection {
    /// Key unique within the page
    pub key: String,
    /// Optional section heading
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    /// Items in display order
    #[serde(default)]
    pub items: Vec<SectionItem>,
}

/// Page addressed by URL path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageContent {
    /// URL path (`/`, `/services/cloud`)
    pub path: String,
    /// Page title
    pub title: String,
    /// Meta description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Sections in display order
    #[serde(default)]
    pub sections: Vec<PageSection>,
    /// Optional grouping
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Fields persisted for a page (path and category live on the item itself)
#[derive(Serialize, Deserialize)]
struct PageBody {
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default)]
    sections: Vec<PageSection>,
}

impl PageContent {
    /// Build a page view from a stored key, category, and field map
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` if the fields do not describe a page.
    pub fn from_parts(path: &str, category: Option<&str>, fields: &ContentFields) -> AppResult<Self> {
        let body: PageBody = serde_json::from_value(Value::Object(fields.clone())).map_err(|e| {
            AppError::new(
                ErrorCode::InvalidFormat,
                format!("Page fields for {path} are malformed: {e}"),
            )
        })?;
        Ok(Self {
            path: path.to_owned(),
            title: body.title,
            description: body.description,
            sections: body.sections,
            category: category.map(str::to_owned),
        })
    }

    /// Build a page view from a stored `page` item
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for non-page items and `InvalidFormat` for
    /// malformed page fields.
    pub fn from_item(item: &ContentItem) -> AppResult<Self> {
        if item.content_type != ContentType::Page {
            return Err(AppError::invalid_input(format!(
                "Content {} is a {} item, not a page",
                item.key, item.content_type
            )));
        }
        let fields = item
            .fields
            .as_ref()
            .ok_or_else(|| AppError::missing_field("fields"))?;
        Self::from_parts(&item.key, item.category.as_deref(), fields)
    }

    /// Convert into an upsert payload keyed by the page path
    ///
    /// # Errors
    ///
    /// Returns `SerializationError` if the sections cannot be encoded.
    pub fn to_new_content(&self) -> AppResult<NewContent> {
        let body = PageBody {
            title: self.title.clone(),
            description: self.description.clone(),
            sections: self.sections.clone(),
        };
        let fields = match serde_json::to_value(body)? {
            Value::Object(map) => map,
            _ => return Err(AppError::serialization("Page body is not a JSON object")),
        };
        Ok(NewContent {
            content_type: ContentType::Page,
            key: self.path.clone(),
            value: None,
            fields: Some(fields),
            category: self.category.clone(),
        })
    }

    /// Check path, title, and section structure
    ///
    /// # Errors
    ///
    /// Returns a validation error for the first broken rule: invalid path or
    /// keys, empty title, duplicate section or item keys, or an item whose
    /// payload does not match its kind.
    pub fn validate(&self) -> AppResult<()> {
        validate_key(ContentType::Page, &self.path)?;
        validate_category(self.category.as_deref())?;
        if self.title.trim().is_empty() {
            return Err(AppError::missing_field("title"));
        }

        let mut section_keys = HashSet::new();
        for section in &self.sections {
            validate_key(ContentType::Section, &section.key)?;
            if !section_keys.insert(section.key.as_str()) {
                return Err(AppError::invalid_input(format!(
                    "Duplicate section key '{}' on page {}",
                    section.key, self.path
                )));
            }
            section.validate()?;
        }
        Ok(())
    }

    /// Find a section by key
    #[must_use]
    pub fn section(&self, key: &str) -> Option<&PageSection> {
        self.sections.iter().find(|s| s.key == key)
    }
}

impl PageSection {
    fn validate(&self) -> AppResult<()> {
        let mut item_keys = HashSet::new();
        for item in &self.items {
            validate_key(ContentType::Text, &item.key)?;
            if !item_keys.insert(item.key.as_str()) {
                return Err(AppError::invalid_input(format!(
                    "Duplicate item key '{}' in section {}",
                    item.key, self.key
                )));
            }
            let well_formed = match item.kind {
                SectionItemKind::Text => item.value.is_some() && item.fields.is_none(),
                SectionItemKind::Structured => item.fields.is_some() && item.value.is_none(),
            };
            if !well_formed {
                return Err(AppError::invalid_input(format!(
                    "Item '{}' in section {} does not match its kind",
                    item.key, self.key
                )));
            }
        }
        Ok(())
    }

    /// Find an item by key
    #[must_use]
    pub fn item(&self, key: &str) -> Option<&SectionItem> {
        self.items.iter().find(|i| i.key == key)
    }
}

/// Page view together with its storage identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Stored item id
    pub id: Uuid,
    /// Page content
    #[serde(flatten)]
    pub page: PageContent,
    /// First save
    pub created_at: DateTime<Utc>,
    /// Last write
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<&ContentItem> for PageRecord {
    type Error = AppError;

    fn try_from(item: &ContentItem) -> AppResult<Self> {
        Ok(Self {
            id: item.id,
            page: PageContent::from_item(item)?,
            created_at: item.created_at,
            updated_at: item.updated_at,
        })
    }
}
