// ABOUTME: HTTP middleware for request tracing, CORS, and the admin session gate
// ABOUTME: Layers are assembled into the router by server.rs
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Portal CMS contributors

/// Admin session guard
pub mod admin_guard;
/// CORS configuration
pub mod cors;
/// Request IDs and spans
pub mod tracing;

pub use admin_guard::{require_admin_session, AdminContext};
pub use cors::setup_cors;
pub use self::tracing::{
    attach_request_id_to_errors, client_addr, create_request_span, RequestIdGenerator,
    REQUEST_ID_HEADER,
};
