// ABOUTME: Shared test helpers and utilities for integration tests
// ABOUTME: Exports the Axum request driver used by HTTP route tests
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Portal CMS contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

pub mod axum_test;
