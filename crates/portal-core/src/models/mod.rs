// ABOUTME: Content data model for the portal CMS
// ABOUTME: Re-exports content items, page views, and their request/query types
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Portal CMS contributors

//! Content data model
//!
//! A content item is a tagged record (`text`, `structured`, `section`, `page`)
//! identified by its natural key `(type, key)`. Pages are `page` items whose key
//! is the URL path, so page uniqueness by path falls out of the same rule.

/// Content items, upsert payloads, queries, and validation
pub mod content;

/// Typed view over `page` items
pub mod page;

pub use content::{
    payload_search_text, validate_category, validate_key, ContentFields, ContentItem,
    ContentQuery, ContentSearch, ContentType, ContentUpdate, NewContent,
};
pub use page::{PageContent, PageRecord, PageSection, SectionItem, SectionItemKind};
