// ABOUTME: Route module organization for the portal CMS HTTP endpoints
// ABOUTME: Assembles public routes and the session-guarded /api/admin tree
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Portal CMS contributors

//! Route module for the portal CMS
//!
//! Each domain module contains only route definitions and thin handlers that
//! delegate to [`crate::services`].

/// Admin session, mail settings, and template preview routes
pub mod admin;
/// Catalog collection routes
pub mod collections;
/// Generic content routes
pub mod content;
/// Health check routes
pub mod health;
/// Page routes
pub mod pages;
/// Flat text routes
pub mod texts;

pub use admin::AdminRoutes;
pub use collections::CollectionRoutes;
pub use content::ContentRoutes;
pub use health::HealthRoutes;
pub use pages::PageRoutes;
pub use texts::TextRoutes;

use crate::middleware::require_admin_session;
use crate::resources::ServerResources;
use axum::{middleware, Router};
use std::sync::Arc;

/// Every route of the service, without transport layers
pub fn api_router(resources: Arc<ServerResources>) -> Router {
    let guarded = Router::new()
        .merge(AdminRoutes::admin_routes(resources.clone()))
        .merge(ContentRoutes::admin_routes(resources.clone()))
        .merge(TextRoutes::admin_routes(resources.clone()))
        .merge(PageRoutes::admin_routes(resources.clone()))
        .merge(CollectionRoutes::admin_routes(resources.clone()))
        .route_layer(middleware::from_fn_with_state(
            resources.clone(),
            require_admin_session,
        ));

    let admin = AdminRoutes::session_routes(resources.clone()).merge(guarded);

    Router::new()
        .merge(HealthRoutes::routes(resources.clone()))
        .merge(ContentRoutes::routes(resources.clone()))
        .merge(TextRoutes::routes(resources.clone()))
        .merge(PageRoutes::routes(resources.clone()))
        .merge(CollectionRoutes::routes(resources))
        .nest("/api/admin", admin)
}
