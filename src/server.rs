// ABOUTME: HTTP server assembly: router, tower-http layers, listener, and graceful shutdown
// ABOUTME: Applies request IDs, tracing, CORS, timeouts, body limits, and security headers
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Portal CMS contributors

use crate::errors::{AppError, AppResult};
use crate::middleware::{
    attach_request_id_to_errors, create_request_span, setup_cors, RequestIdGenerator,
    REQUEST_ID_HEADER,
};
use crate::resources::ServerResources;
use crate::routes;
use crate::security::SecurityConfig;
use axum::body::Body;
use axum::http::Request;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Build the complete application with all transport layers
pub fn build_app(resources: Arc<ServerResources>) -> Router {
    let config = resources.config.clone();
    let mut app = routes::api_router(resources);

    for (name, value) in SecurityConfig::for_deployment(config.admin.secure_cookies).headers() {
        app = app.layer(SetResponseHeaderLayer::if_not_present(name, value));
    }

    app.layer(axum::middleware::from_fn(attach_request_id_to_errors))
        .layer(RequestBodyLimitLayer::new(config.http.max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.http.request_timeout_secs,
        )))
        .layer(setup_cors(&config))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| create_request_span(request)),
        )
        .layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER))
        .layer(SetRequestIdLayer::new(REQUEST_ID_HEADER, RequestIdGenerator))
}

/// Bind the listener and serve until SIGINT/SIGTERM
///
/// # Errors
///
/// Returns an error if the address is invalid, binding fails, or the server stops abnormally
pub async fn run(resources: Arc<ServerResources>) -> AppResult<()> {
    let addr: SocketAddr = format!("{}:{}", resources.config.host, resources.config.http_port)
        .parse()
        .map_err(|e| {
            AppError::config(format!(
                "Invalid listen address {}:{}: {e}",
                resources.config.host, resources.config.http_port
            ))
        })?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
    info!(%addr, "Portal CMS listening");

    axum::serve(
        listener,
        build_app(resources).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| AppError::internal(format!("HTTP server error: {e}")))?;

    info!("Portal CMS stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("Shutdown signal received, draining connections");
}
