// ABOUTME: Shared server resources handed to every route handler through axum state
// ABOUTME: Opens the content and text stores once and owns the admin session table
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Portal CMS contributors

use crate::auth::AdminSessionManager;
use crate::config::ServerConfig;
use crate::database_plugins::ContentStore;
use crate::errors::AppResult;
use crate::services::ContentService;
use std::sync::Arc;
use tracing::info;

/// Resources shared by all handlers
#[derive(Clone)]
pub struct ServerResources {
    /// Server configuration
    pub config: Arc<ServerConfig>,
    /// Service over the store behind content, pages, collections, and settings
    pub content: ContentService,
    /// Service over the store behind `/api/texts`
    pub texts: ContentService,
    /// Admin sessions
    pub sessions: AdminSessionManager,
}

impl ServerResources {
    /// Open both stores described by the configuration
    ///
    /// When both URLs address the same location a single store instance is
    /// shared, so the two APIs never hold diverging copies of one file or
    /// in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if either store cannot be opened
    pub async fn new(config: ServerConfig) -> AppResult<Self> {
        let content_url = config.content_store.to_connection_string();
        let text_url = config.text_store.to_connection_string();

        let content_store = ContentStore::new(&content_url).await?;
        let text_store = if config.text_store.same_location(&config.content_store) {
            info!("Text store shares the content store");
            content_store.clone()
        } else {
            ContentStore::new(&text_url).await?
        };

        info!(
            content.backend = content_store.backend_info(),
            texts.backend = text_store.backend_info(),
            "Content stores ready"
        );
        Ok(Self::from_stores(config, content_store, text_store))
    }

    /// Assemble resources from already-open stores
    #[must_use]
    pub fn from_stores(
        config: ServerConfig,
        content_store: ContentStore,
        text_store: ContentStore,
    ) -> Self {
        let sessions = AdminSessionManager::new(&config.admin);
        Self {
            config: Arc::new(config),
            content: ContentService::new(content_store),
            texts: ContentService::new(text_store),
            sessions,
        }
    }
}
