// ABOUTME: Admin route handlers for session login/logout, mail settings, and template previews
// ABOUTME: Login issues the HttpOnly session cookie that the admin guard checks on every admin route
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Portal CMS contributors

//! Admin routes
//!
//! `login` and `logout` are reachable without a session; every other route
//! here is mounted behind [`crate::middleware::require_admin_session`].

use crate::{
    errors::AppError,
    logging::AppLogger,
    middleware::{client_addr, AdminContext},
    resources::ServerResources,
    security::cookies::{
        clear_session_cookie, get_cookie_value, set_session_cookie, ADMIN_SESSION_COOKIE,
    },
};
use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use portal_core::models::ContentFields;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

/// Body of `POST /api/admin/login`
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Admin password
    pub password: String,
}

/// Current session state
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    /// Always `true` when returned
    pub authenticated: bool,
    /// Login time
    pub created_at: DateTime<Utc>,
    /// Expiry time
    pub expires_at: DateTime<Utc>,
}

/// Body of `POST /api/admin/templates/:key/preview`
#[derive(Debug, Default, Deserialize)]
pub struct PreviewRequest {
    /// Placeholder values
    #[serde(default)]
    pub variables: HashMap<String, String>,
}

/// Admin routes handler
pub struct AdminRoutes;

impl AdminRoutes {
    /// Session routes that must work without a session, relative to `/api/admin`
    pub fn session_routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/login", post(Self::handle_login))
            .route("/logout", post(Self::handle_logout))
            .with_state(resources)
    }

    /// Guarded admin routes, relative to `/api/admin`
    pub fn admin_routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/session", get(Self::handle_session))
            .route(
                "/mail-config",
                get(Self::handle_get_mail_config).put(Self::handle_save_mail_config),
            )
            .route("/templates/:key/preview", post(Self::handle_preview_template))
            .with_state(resources)
    }

    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        peer: Option<ConnectInfo<SocketAddr>>,
        request_headers: HeaderMap,
        Json(request): Json<LoginRequest>,
    ) -> Result<Response, AppError> {
        let remote = client_addr(&request_headers, peer.map(|ConnectInfo(addr)| addr));
        let issued = match resources.sessions.login(&request.password).await {
            Ok(issued) => issued,
            Err(e) => {
                AppLogger::log_admin_event("login", false, remote.as_deref());
                return Err(e);
            }
        };
        AppLogger::log_admin_event("login", true, remote.as_deref());

        let ttl_secs = u64::try_from(resources.sessions.ttl().num_seconds()).unwrap_or(0);
        let mut headers = HeaderMap::new();
        set_session_cookie(
            &mut headers,
            &issued.token,
            ttl_secs,
            resources.config.admin.secure_cookies,
        );

        Ok((
            StatusCode::OK,
            headers,
            Json(SessionResponse {
                authenticated: true,
                created_at: issued.session.created_at,
                expires_at: issued.session.expires_at,
            }),
        )
            .into_response())
    }

    async fn handle_logout(
        State(resources): State<Arc<ServerResources>>,
        peer: Option<ConnectInfo<SocketAddr>>,
        request_headers: HeaderMap,
    ) -> Result<Response, AppError> {
        if let Some(token) = get_cookie_value(&request_headers, ADMIN_SESSION_COOKIE) {
            if resources.sessions.logout(&token).await {
                let remote = client_addr(&request_headers, peer.map(|ConnectInfo(addr)| addr));
                AppLogger::log_admin_event("logout", true, remote.as_deref());
            }
        }

        let mut headers = HeaderMap::new();
        clear_session_cookie(&mut headers, resources.config.admin.secure_cookies);
        Ok((StatusCode::NO_CONTENT, headers).into_response())
    }

    async fn handle_session(
        Extension(admin): Extension<AdminContext>,
    ) -> Result<Response, AppError> {
        Ok((
            StatusCode::OK,
            Json(SessionResponse {
                authenticated: true,
                created_at: admin.session.created_at,
                expires_at: admin.session.expires_at,
            }),
        )
            .into_response())
    }

    async fn handle_get_mail_config(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let fields = resources.content.mail_config().await?.unwrap_or_default();
        Ok((StatusCode::OK, Json(fields)).into_response())
    }

    async fn handle_save_mail_config(
        State(resources): State<Arc<ServerResources>>,
        Json(fields): Json<ContentFields>,
    ) -> Result<Response, AppError> {
        let item = resources.content.save_mail_config(fields).await?;
        Ok((StatusCode::OK, Json(item.fields.unwrap_or_default())).into_response())
    }

    async fn handle_preview_template(
        State(resources): State<Arc<ServerResources>>,
        Path(key): Path<String>,
        Json(request): Json<PreviewRequest>,
    ) -> Result<Response, AppError> {
        let template = resources.content.email_template(&key).await?;
        let rendered = template.render(&request.variables)?;
        Ok((StatusCode::OK, Json(rendered)).into_response())
    }
}
