// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Re-exports the environment-driven server configuration types
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Portal CMS contributors

//! Configuration module for the portal CMS
//!
//! Configuration is environment-only; see [`environment::ServerConfig`].

/// Environment and server configuration
pub mod environment;

pub use environment::{
    AdminConfig, CorsConfig, Environment, HttpConfig, LogLevel, ServerConfig, StoreUrl,
};
