// ABOUTME: Admin session guard applied to every /api/admin route except login
// ABOUTME: Resolves the session cookie and returns 401 when it is missing, unknown, or expired
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Portal CMS contributors

//! Admin Authorization Guard
//!
//! Wired with `axum::middleware::from_fn_with_state`, so handlers behind it can
//! rely on an [`AdminContext`] extension being present.

use crate::auth::AdminSession;
use crate::errors::AppError;
use crate::resources::ServerResources;
use crate::security::cookies::{get_cookie_value, ADMIN_SESSION_COOKIE};
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;
use tracing::debug;

/// Session attached to requests that passed the guard
#[derive(Debug, Clone)]
pub struct AdminContext {
    /// Raw session token from the cookie
    pub token: String,
    /// Live session
    pub session: AdminSession,
}

/// Reject the request unless it carries a live admin session cookie
///
/// # Errors
///
/// Returns `AuthRequired` without a known session, `AuthExpired` for an
/// expired one
pub async fn require_admin_session(
    State(resources): State<Arc<ServerResources>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = get_cookie_value(request.headers(), ADMIN_SESSION_COOKIE)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            debug!(path = %request.uri().path(), "Admin request without session cookie");
            AppError::auth_required()
        })?;
    let session = resources.sessions.validate(&token).await?;

    request
        .extensions_mut()
        .insert(AdminContext { token, session });
    Ok(next.run(request).await)
}
