// ABOUTME: Core types and constants for the consulting portal CMS
// ABOUTME: Foundation crate with error handling, the content model, and shared limits
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Portal CMS contributors

#![deny(unsafe_code)]

//! # Portal Core
//!
//! Foundation crate providing the shared types of the portal CMS. It is kept
//! free of storage and HTTP plumbing so it changes rarely and compiles fast.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and `AppResult`
//! - **models**: The content model (`ContentItem`, `NewContent`, `PageContent`)
//! - **constants**: Key limits, pagination defaults, and well-known categories

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Content data model and its validation rules
pub mod models;

/// Application constants organized by domain
pub mod constants;
