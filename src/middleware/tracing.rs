// ABOUTME: Request tracing helpers for correlation IDs and per-request spans
// ABOUTME: Generates req_<uuid> request IDs and builds the TraceLayer span with method, path, and ID
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Portal CMS contributors

use crate::errors::ErrorResponse;
use axum::body::Body;
use axum::extract::Request as AxumRequest;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;
use std::net::SocketAddr;
use tower_http::request_id::{MakeRequestId, RequestId};
use tracing::Span;
use uuid::Uuid;

/// Header carrying the request correlation ID
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Generates `req_<uuid>` IDs for requests that arrive without one
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestIdGenerator;

impl MakeRequestId for RequestIdGenerator {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        format!("req_{}", Uuid::new_v4().simple())
            .parse()
            .ok()
            .map(RequestId::new)
    }
}

/// Span for one HTTP request, used by `TraceLayer::make_span_with`
pub fn create_request_span<B>(request: &Request<B>) -> Span {
    let request_id = request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id,
    )
}

/// Client address for audit logs
///
/// Prefers the first hop of `X-Forwarded-For` (the portal normally sits
/// behind a reverse proxy), then the socket peer.
pub fn client_addr(headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
}

/// Fill `request_id` into JSON error bodies rendered by `AppError`
///
/// Runs inside `SetRequestIdLayer`, so every request carries the header by
/// the time it gets here. Errors that already name a request ID keep it.
pub async fn attach_request_id_to_errors(request: AxumRequest, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let response = next.run(request).await;

    let Some(request_id) = request_id else {
        return response;
    };
    let Some(mut rendered) = response.extensions().get::<ErrorResponse>().cloned() else {
        return response;
    };
    if rendered.error.request_id.is_some() {
        return response;
    }
    rendered.error.request_id = Some(request_id);

    let Ok(encoded) = serde_json::to_vec(&rendered) else {
        return response;
    };
    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    parts.extensions.insert(rendered);
    Response::from_parts(parts, Body::from(encoded))
}
