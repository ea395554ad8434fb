// ABOUTME: HTTP security utilities: hardened response headers and admin session cookies
// ABOUTME: Headers are applied to every response by the server's tower stack
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Portal CMS contributors

//! # Security helpers
//!
//! Response headers protect the JSON API against content sniffing and framing;
//! cookie helpers build the admin session cookie.

/// Secure cookie construction and parsing
pub mod cookies;

use axum::http::{header, HeaderName, HeaderValue};

/// Security headers configuration
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// X-Content-Type-Options header value
    pub content_type_options: &'static str,
    /// X-Frame-Options header value
    pub frame_options: &'static str,
    /// Referrer-Policy header value
    pub referrer_policy: &'static str,
    /// Strict-Transport-Security header value (HTTPS deployments only)
    pub hsts: Option<&'static str>,
}

impl SecurityConfig {
    /// Headers for a deployment; HSTS only when cookies are marked `Secure`
    #[must_use]
    pub const fn for_deployment(secure: bool) -> Self {
        Self {
            content_type_options: "nosniff",
            frame_options: "DENY",
            referrer_policy: "strict-origin-when-cross-origin",
            hsts: if secure {
                Some("max-age=31536000; includeSubDomains")
            } else {
                None
            },
        }
    }

    /// Header pairs to set on every response
    #[must_use]
    pub fn headers(&self) -> Vec<(HeaderName, HeaderValue)> {
        let mut headers = vec![
            (
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static(self.content_type_options),
            ),
            (
                header::X_FRAME_OPTIONS,
                HeaderValue::from_static(self.frame_options),
            ),
            (
                header::REFERRER_POLICY,
                HeaderValue::from_static(self.referrer_policy),
            ),
        ];
        if let Some(hsts) = self.hsts {
            headers.push((
                header::STRICT_TRANSPORT_SECURITY,
                HeaderValue::from_static(hsts),
            ));
        }
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hsts_only_when_secure() {
        assert_eq!(SecurityConfig::for_deployment(false).headers().len(), 3);
        let secure = SecurityConfig::for_deployment(true).headers();
        assert!(secure
            .iter()
            .any(|(name, _)| name == header::STRICT_TRANSPORT_SECURITY));
    }
}
