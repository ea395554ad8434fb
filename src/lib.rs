// ABOUTME: Main library entry point for the portal CMS
// ABOUTME: Content storage, admin editing API, and public read API for the consulting portal
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Portal CMS contributors

#![deny(unsafe_code)]

//! # Portal CMS
//!
//! Content management backend for a consulting portal. Editors change
//! headlines, catalog entries, and whole pages through an admin API; the
//! public site reads them through a JSON API.
//!
//! ## Architecture
//!
//! - **Models** (`portal-core`): content items identified by `(type, key)`,
//!   with `text`, `structured`, `section`, and `page` payloads
//! - **Stores** ([`database_plugins`]): one [`database_plugins::ContentProvider`]
//!   trait with `SQLite` and JSON file backends, chosen by URL
//! - **Services** ([`services`]): texts, pages, collections, mail settings,
//!   and email templates on top of a store
//! - **Routes** ([`routes`]): public reads plus the session-guarded admin API
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use portal_cms::config::ServerConfig;
//! use portal_cms::errors::AppResult;
//! use portal_cms::resources::ServerResources;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     let resources = Arc::new(ServerResources::new(config).await?);
//!     portal_cms::server::run(resources).await
//! }
//! ```

/// Admin session management
pub mod auth;

/// Environment configuration
pub mod config;

/// Store-to-store content copy
pub mod content_sync;

/// Content store backends
pub mod database_plugins;

/// Unified error handling
pub mod errors;

/// Structured logging setup
pub mod logging;

/// HTTP middleware
pub mod middleware;

/// Shared handler state
pub mod resources;

/// HTTP route handlers
pub mod routes;

/// Security headers and cookies
pub mod security;

/// Server assembly and lifecycle
pub mod server;

/// Domain services
pub mod services;

/// Content data model
pub use portal_core::models;

/// Shared constants
pub use portal_core::constants;
