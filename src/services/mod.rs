// ABOUTME: Domain service layer for content rules shared by route handlers and binaries
// ABOUTME: Provides text lookups, pages, collections, mail settings, and email templates
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Portal CMS contributors

//! Domain service layer
//!
//! Route handlers stay thin and delegate here, so the HTTP surface and the
//! `content-sync` binary apply the same content rules.

/// Text, page, collection, and settings operations over a content store
pub mod content;

/// Email template rendering with `{{ name }}` placeholders
pub mod templates;

pub use content::ContentService;
pub use templates::{EmailTemplate, RenderedTemplate};
