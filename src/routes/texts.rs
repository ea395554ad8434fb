// ABOUTME: Route handlers for the flat text API used by the portal frontend
// ABOUTME: Serves key-to-value maps from the text store and lets admins set or remove single texts
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Portal CMS contributors

use crate::{
    errors::AppError,
    resources::ServerResources,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use portal_core::models::ContentType;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Query string for `GET /api/texts`
#[derive(Debug, Default, Deserialize)]
pub struct TextsParams {
    /// Restrict to one category
    pub category: Option<String>,
}

/// Single text value
#[derive(Debug, Serialize, Deserialize)]
pub struct TextResponse {
    /// Content key
    pub key: String,
    /// Text value
    pub value: String,
    /// Category, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Body of `PUT /api/admin/texts/:key`
#[derive(Debug, Deserialize)]
pub struct SaveTextRequest {
    /// New value
    pub value: String,
    /// Category; the current one is kept when omitted
    #[serde(default)]
    pub category: Option<String>,
}

/// Text routes handler
pub struct TextRoutes;

impl TextRoutes {
    /// Public read routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/texts", get(Self::handle_list))
            .route("/api/texts/:key", get(Self::handle_get))
            .with_state(resources)
    }

    /// Admin write routes, relative to `/api/admin`
    pub fn admin_routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/texts/:key",
                put(Self::handle_save).delete(Self::handle_delete),
            )
            .with_state(resources)
    }

    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        Query(params): Query<TextsParams>,
    ) -> Result<Response, AppError> {
        let category = params.category.as_deref().filter(|c| !c.is_empty());
        let texts = resources.texts.texts(category).await?;
        Ok((StatusCode::OK, Json(texts)).into_response())
    }

    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(key): Path<String>,
    ) -> Result<Response, AppError> {
        let item = resources
            .texts
            .get(ContentType::Text, &key)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Text {key}")))?;

        Ok((
            StatusCode::OK,
            Json(TextResponse {
                key: item.key,
                value: item.value.unwrap_or_default(),
                category: item.category,
            }),
        )
            .into_response())
    }

    async fn handle_save(
        State(resources): State<Arc<ServerResources>>,
        Path(key): Path<String>,
        Json(request): Json<SaveTextRequest>,
    ) -> Result<Response, AppError> {
        let item = resources
            .texts
            .save_text(&key, &request.value, request.category.as_deref())
            .await?;
        Ok((StatusCode::OK, Json(item)).into_response())
    }

    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        Path(key): Path<String>,
    ) -> Result<Response, AppError> {
        if resources.texts.delete_by_key(ContentType::Text, &key).await? {
            Ok(StatusCode::NO_CONTENT.into_response())
        } else {
            Err(AppError::not_found(format!("Text {key}")))
        }
    }
}
