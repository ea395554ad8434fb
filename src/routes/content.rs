// ABOUTME: Route handlers for generic content lookup, listing, search, and admin CRUD
// ABOUTME: Public reads hit the content store; admin writes upsert by (type, key) or patch by id
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Portal CMS contributors

//! Content routes
//!
//! Public endpoints expose read access to every content item. Admin endpoints
//! (mounted under `/api/admin` behind the session guard) upsert by natural
//! key and patch or delete by id.

use crate::{
    errors::{AppError, AppResult},
    resources::ServerResources,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, put},
    Json, Router,
};
use portal_core::models::{
    ContentItem, ContentQuery, ContentSearch, ContentType, ContentUpdate, NewContent,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

/// Query string for `GET /api/content`
#[derive(Debug, Default, Deserialize)]
pub struct ListContentParams {
    /// Content type filter
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    /// Category filter
    pub category: Option<String>,
    /// Page size
    pub limit: Option<u32>,
    /// Items to skip
    pub offset: Option<u32>,
}

/// Query string for `GET /api/content/search`
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// Search term
    pub q: Option<String>,
    /// Content type filter
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    /// Maximum hits
    pub limit: Option<u32>,
}

/// Page of content items
#[derive(Debug, Serialize, Deserialize)]
pub struct ContentListResponse {
    /// Items in `(type, key)` order
    pub items: Vec<ContentItem>,
    /// Applied page size
    pub limit: u32,
    /// Applied offset
    pub offset: u32,
}

/// Search hits
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Normalized search term
    pub term: String,
    /// Matching items
    pub items: Vec<ContentItem>,
}

/// Distinct categories
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoriesResponse {
    /// Sorted category names
    pub categories: Vec<String>,
}

fn parse_type(raw: Option<&str>) -> AppResult<Option<ContentType>> {
    raw.filter(|s| !s.is_empty())
        .map(ContentType::from_str)
        .transpose()
}

/// Content routes handler
pub struct ContentRoutes;

impl ContentRoutes {
    /// Public read routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/content", get(Self::handle_list))
            .route("/api/content/search", get(Self::handle_search))
            .route("/api/content/categories", get(Self::handle_categories))
            .route("/api/content/:content_type/*key", get(Self::handle_get))
            .with_state(resources)
    }

    /// Admin write routes, relative to `/api/admin`
    pub fn admin_routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/content", put(Self::handle_upsert))
            .route(
                "/content/:id",
                patch(Self::handle_update).delete(Self::handle_delete),
            )
            .with_state(resources)
    }

    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        Query(params): Query<ListContentParams>,
    ) -> Result<Response, AppError> {
        let query = ContentQuery {
            content_type: parse_type(params.content_type.as_deref())?,
            category: params.category.filter(|c| !c.is_empty()),
            limit: params.limit,
            offset: params.offset,
        };
        let items = resources.content.list(&query).await?;

        Ok((
            StatusCode::OK,
            Json(ContentListResponse {
                items,
                limit: query.effective_limit(),
                offset: query.effective_offset(),
            }),
        )
            .into_response())
    }

    async fn handle_search(
        State(resources): State<Arc<ServerResources>>,
        Query(params): Query<SearchParams>,
    ) -> Result<Response, AppError> {
        let term = params.q.ok_or_else(|| AppError::missing_field("q"))?;
        let search = ContentSearch::new(
            &term,
            parse_type(params.content_type.as_deref())?,
            params.limit,
        )?;
        let items = resources.content.search(&search).await?;

        Ok((
            StatusCode::OK,
            Json(SearchResponse {
                term: search.term().to_owned(),
                items,
            }),
        )
            .into_response())
    }

    async fn handle_categories(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let categories = resources.content.categories().await?;
        Ok((StatusCode::OK, Json(CategoriesResponse { categories })).into_response())
    }

    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path((content_type, key)): Path<(String, String)>,
    ) -> Result<Response, AppError> {
        let content_type = ContentType::from_str(&content_type)?;
        // Page keys are paths; the wildcard capture drops the leading slash
        let key = if content_type == ContentType::Page && !key.starts_with('/') {
            format!("/{key}")
        } else {
            key
        };

        let item = resources
            .content
            .get(content_type, &key)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Content {content_type}/{key}")))?;
        Ok((StatusCode::OK, Json(item)).into_response())
    }

    async fn handle_upsert(
        State(resources): State<Arc<ServerResources>>,
        Json(content): Json<NewContent>,
    ) -> Result<Response, AppError> {
        let item = resources.content.upsert(&content).await?;
        Ok((StatusCode::OK, Json(item)).into_response())
    }

    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<Uuid>,
        Json(update): Json<ContentUpdate>,
    ) -> Result<Response, AppError> {
        let item = resources.content.update(id, &update).await?;
        Ok((StatusCode::OK, Json(item)).into_response())
    }

    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        if resources.content.delete(id).await? {
            Ok(StatusCode::NO_CONTENT.into_response())
        } else {
            Err(AppError::not_found(format!("Content {id}")))
        }
    }
}
