// ABOUTME: Health check route handlers for service monitoring and status endpoints
// ABOUTME: Liveness is static; readiness checks both content stores
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Portal CMS contributors

//! Health check routes for service monitoring
//!
//! `/health` answers as long as the process is serving requests. `/ready`
//! returns 503 until both the content store and the text store respond.

use crate::database_plugins::ContentProvider;
use crate::logging::AppLogger;
use crate::resources::ServerResources;
use crate::services::ContentService;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tracing::error;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health check routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/health", get(Self::handle_health))
            .route("/ready", get(Self::handle_ready))
            .with_state(resources)
    }

    async fn handle_health() -> Json<Value> {
        Json(json!({
            "status": "healthy",
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": chrono::Utc::now().to_rfc3339()
        }))
    }

    async fn handle_ready(State(resources): State<Arc<ServerResources>>) -> Response {
        let (content_ok, content) = Self::check_store("content", &resources.content).await;
        let (texts_ok, texts) = Self::check_store("texts", &resources.texts).await;
        let ready = content_ok && texts_ok;

        let status = if ready {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };
        let body = json!({
            "status": if ready { "ready" } else { "unavailable" },
            "stores": { "content": content, "texts": texts },
            "timestamp": chrono::Utc::now().to_rfc3339()
        });
        (status, Json(body)).into_response()
    }

    async fn check_store(name: &str, service: &ContentService) -> (bool, Value) {
        let store = service.store();
        let started = Instant::now();
        let result = store.health_check().await;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        AppLogger::log_store_operation(
            "health_check",
            store.backend_info(),
            result.is_ok(),
            elapsed_ms,
        );

        match result {
            Ok(()) => (
                true,
                json!({ "backend": store.backend_info(), "status": "ok" }),
            ),
            Err(e) => {
                error!(store = name, "Store health check failed: {e}");
                (
                    false,
                    json!({ "backend": store.backend_info(), "status": "error", "message": e.message }),
                )
            }
        }
    }
}
