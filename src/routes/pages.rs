// ABOUTME: Route handlers for pages addressed by URL path
// ABOUTME: Lists and resolves pages publicly; admins save whole pages or delete them by path
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Portal CMS contributors

use crate::{errors::AppError, resources::ServerResources};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use portal_core::constants::keys::LANDING_PAGE_PATH;
use portal_core::models::{PageContent, PageRecord};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Query string carrying a page path
#[derive(Debug, Default, Deserialize)]
pub struct PagePathParams {
    /// URL path; defaults to the landing page
    pub path: Option<String>,
}

impl PagePathParams {
    fn path(&self) -> &str {
        self.path
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or(LANDING_PAGE_PATH)
    }
}

/// All pages
#[derive(Debug, Serialize, Deserialize)]
pub struct PagesResponse {
    /// Pages ordered by path
    pub pages: Vec<PageRecord>,
}

/// Page routes handler
pub struct PageRoutes;

impl PageRoutes {
    /// Public read routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/pages", get(Self::handle_list))
            .route("/api/pages/by-path", get(Self::handle_get_by_path))
            .with_state(resources)
    }

    /// Admin write routes, relative to `/api/admin`
    pub fn admin_routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/pages", put(Self::handle_save).delete(Self::handle_delete))
            .with_state(resources)
    }

    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let pages = resources.content.list_pages().await?;
        Ok((StatusCode::OK, Json(PagesResponse { pages })).into_response())
    }

    async fn handle_get_by_path(
        State(resources): State<Arc<ServerResources>>,
        Query(params): Query<PagePathParams>,
    ) -> Result<Response, AppError> {
        let path = params.path();
        let page = resources
            .content
            .get_page(path)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Page {path}")))?;
        Ok((StatusCode::OK, Json(page)).into_response())
    }

    async fn handle_save(
        State(resources): State<Arc<ServerResources>>,
        Json(page): Json<PageContent>,
    ) -> Result<Response, AppError> {
        let record = resources.content.save_page(&page).await?;
        Ok((StatusCode::OK, Json(record)).into_response())
    }

    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        Query(params): Query<PagePathParams>,
    ) -> Result<Response, AppError> {
        let path = params
            .path
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| AppError::missing_field("path"))?;
        if resources.content.delete_page(path).await? {
            Ok(StatusCode::NO_CONTENT.into_response())
        } else {
            Err(AppError::not_found(format!("Page {path}")))
        }
    }
}
