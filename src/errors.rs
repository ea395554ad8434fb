// ABOUTME: Unified error handling re-exported from portal-core
// ABOUTME: Keeps crate::errors paths stable for handlers, stores, and binaries
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Portal CMS contributors

//! # Unified Error Handling System
//!
//! Error codes, [`AppError`], and the JSON [`ErrorResponse`] live in
//! `portal-core` so the model crate can return them. With the
//! `http-response` feature `AppError` converts straight into an axum
//! response; with `database-errors` `sqlx::Error` converts into `AppError`.

pub use portal_core::errors::{
    AppError, AppResult, ErrorCode, ErrorContext, ErrorResponse, ErrorResponseDetails,
};
