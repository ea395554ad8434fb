// ABOUTME: Secure cookie builder and parser for the admin session cookie
// ABOUTME: Emits HttpOnly, SameSite=Strict cookies with optional Secure flag
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Portal CMS contributors

use axum::http::{header, HeaderMap, HeaderValue};
use tracing::warn;

/// Name of the admin session cookie
pub const ADMIN_SESSION_COOKIE: &str = "portal_admin_session";

/// Builder for a `Set-Cookie` header value
#[derive(Debug, Clone)]
pub struct SecureCookieConfig {
    /// Cookie name
    pub name: String,
    /// Cookie value
    pub value: String,
    /// Lifetime in seconds (0 expires the cookie)
    pub max_age_secs: u64,
    /// Hide from JavaScript
    pub http_only: bool,
    /// Only send over HTTPS
    pub secure: bool,
    /// `SameSite` attribute
    pub same_site: &'static str,
    /// Cookie path
    pub path: &'static str,
}

impl SecureCookieConfig {
    /// Cookie with the strict defaults (`HttpOnly`, `Secure`, `SameSite=Strict`, `Path=/`)
    #[must_use]
    pub const fn new(name: String, value: String, max_age_secs: u64) -> Self {
        Self {
            name,
            value,
            max_age_secs,
            http_only: true,
            secure: true,
            same_site: "Strict",
            path: "/",
        }
    }

    /// Override the `Secure` flag
    #[must_use]
    pub const fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Render the `Set-Cookie` value
    #[must_use]
    pub fn build(&self) -> String {
        let mut cookie = format!(
            "{}={}; Max-Age={}; Path={}; SameSite={}",
            self.name, self.value, self.max_age_secs, self.path, self.same_site
        );
        if self.http_only {
            cookie.push_str("; HttpOnly");
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }

    /// Append as a `Set-Cookie` header
    pub fn apply(&self, headers: &mut HeaderMap) {
        match HeaderValue::from_str(&self.build()) {
            Ok(value) => {
                headers.append(header::SET_COOKIE, value);
            }
            Err(e) => warn!(cookie = %self.name, "Cookie value is not a valid header: {e}"),
        }
    }
}

/// Set the admin session cookie
pub fn set_session_cookie(headers: &mut HeaderMap, token: &str, max_age_secs: u64, secure: bool) {
    SecureCookieConfig::new(ADMIN_SESSION_COOKIE.to_owned(), token.to_owned(), max_age_secs)
        .with_secure(secure)
        .apply(headers);
}

/// Expire the admin session cookie
pub fn clear_session_cookie(headers: &mut HeaderMap, secure: bool) {
    SecureCookieConfig::new(ADMIN_SESSION_COOKIE.to_owned(), String::new(), 0)
        .with_secure(secure)
        .apply(headers);
}

/// Read a cookie from the request `Cookie` headers
#[must_use]
pub fn get_cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_owned())
}
