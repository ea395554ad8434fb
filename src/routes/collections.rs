// ABOUTME: Route handlers for catalog collections (services, workshops, resources)
// ABOUTME: Lists ordered entries publicly and lets admins upsert or delete single entries
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Portal CMS contributors

use crate::{errors::AppError, resources::ServerResources};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use portal_core::models::{ContentFields, ContentItem};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Entries of one collection
#[derive(Debug, Serialize, Deserialize)]
pub struct CollectionResponse {
    /// Collection name
    pub domain: String,
    /// Entries ordered by `fields.order`, then key
    pub items: Vec<ContentItem>,
}

/// Collection routes handler
pub struct CollectionRoutes;

impl CollectionRoutes {
    /// Public read routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/collections/:domain", get(Self::handle_list))
            .with_state(resources)
    }

    /// Admin write routes, relative to `/api/admin`
    pub fn admin_routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/collections/:domain/:key",
                put(Self::handle_save).delete(Self::handle_delete),
            )
            .with_state(resources)
    }

    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        Path(domain): Path<String>,
    ) -> Result<Response, AppError> {
        let items = resources.content.collection(&domain).await?;
        Ok((StatusCode::OK, Json(CollectionResponse { domain, items })).into_response())
    }

    async fn handle_save(
        State(resources): State<Arc<ServerResources>>,
        Path((domain, key)): Path<(String, String)>,
        Json(fields): Json<ContentFields>,
    ) -> Result<Response, AppError> {
        let item = resources
            .content
            .save_collection_item(&domain, &key, fields)
            .await?;
        Ok((StatusCode::OK, Json(item)).into_response())
    }

    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        Path((domain, key)): Path<(String, String)>,
    ) -> Result<Response, AppError> {
        if resources
            .content
            .delete_collection_item(&domain, &key)
            .await?
        {
            Ok(StatusCode::NO_CONTENT.into_response())
        } else {
            Err(AppError::not_found(format!("Collection entry {domain}/{key}")))
        }
    }
}
