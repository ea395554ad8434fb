// ABOUTME: Admin session management with password login and expiring session tokens
// ABOUTME: Compares passwords in constant time and stores only SHA-256 digests of tokens
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Portal CMS contributors

//! Admin session gate
//!
//! Editors log in with a single shared password. A successful login issues a
//! random token that the browser holds in an `HttpOnly` cookie; the server only
//! keeps its SHA-256 digest, so a memory dump does not reveal live tokens.
//! Sessions live in process memory and do not survive a restart.

use crate::config::AdminConfig;
use crate::errors::{AppError, AppResult, ErrorCode};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tokio::sync::RwLock;
use tracing::debug;

/// Session token length in bytes (32 bytes = 256 bits)
const SESSION_TOKEN_LENGTH: usize = 32;

/// Upper bound on session lifetime (one year)
const MAX_SESSION_TTL_SECS: i64 = 365 * 24 * 60 * 60;

/// Metadata for a live admin session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminSession {
    /// Login time
    pub created_at: DateTime<Utc>,
    /// Expiry time
    pub expires_at: DateTime<Utc>,
}

/// Token handed to the client after login
#[derive(Debug, Clone)]
pub struct IssuedSession {
    /// Raw token (only ever sent to the client)
    pub token: String,
    /// Session metadata
    pub session: AdminSession,
}

/// In-memory admin session table
#[derive(Clone)]
pub struct AdminSessionManager {
    password_digest: Option<[u8; 32]>,
    ttl: Duration,
    sessions: Arc<RwLock<HashMap<String, AdminSession>>>,
}

fn digest(input: &[u8]) -> [u8; 32] {
    Sha256::digest(input).into()
}

fn token_key(token: &str) -> String {
    hex::encode(digest(token.as_bytes()))
}

impl AdminSessionManager {
    /// Create a manager from admin configuration
    #[must_use]
    pub fn new(config: &AdminConfig) -> Self {
        Self {
            password_digest: config.password.as_deref().map(|p| digest(p.as_bytes())),
            ttl: Duration::seconds(
                i64::try_from(config.session_ttl_secs)
                    .unwrap_or(MAX_SESSION_TTL_SECS)
                    .min(MAX_SESSION_TTL_SECS),
            ),
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Whether a password is configured
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.password_digest.is_some()
    }

    /// Session lifetime
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Check a password and open a session
    ///
    /// # Errors
    ///
    /// Returns `ResourceUnavailable` when no password is configured and
    /// `AuthInvalid` when the password does not match
    pub async fn login(&self, password: &str) -> AppResult<IssuedSession> {
        let Some(expected) = self.password_digest else {
            return Err(AppError::new(
                ErrorCode::ResourceUnavailable,
                "Admin login is disabled: no admin password configured",
            ));
        };
        let candidate = digest(password.as_bytes());
        if !bool::from(candidate.ct_eq(&expected)) {
            return Err(AppError::auth_invalid("Invalid admin password"));
        }

        let random_bytes: Vec<u8> = (0..SESSION_TOKEN_LENGTH)
            .map(|_| rand::thread_rng().gen())
            .collect();
        let token = hex::encode(random_bytes);
        let now = Utc::now();
        let session = AdminSession {
            created_at: now,
            expires_at: now + self.ttl,
        };

        let mut sessions = self.sessions.write().await;
        sessions.insert(token_key(&token), session);
        Self::cleanup_expired_locked(&mut sessions, now);
        debug!(active = sessions.len(), "Admin session opened");
        drop(sessions);

        Ok(IssuedSession { token, session })
    }

    /// Resolve a token to its live session
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` for unknown tokens and `AuthExpired` for expired ones
    pub async fn validate(&self, token: &str) -> AppResult<AdminSession> {
        let key = token_key(token);
        let session = {
            let sessions = self.sessions.read().await;
            sessions.get(&key).copied()
        }
        .ok_or_else(AppError::auth_required)?;

        if Utc::now() >= session.expires_at {
            self.sessions.write().await.remove(&key);
            return Err(AppError::auth_expired());
        }
        Ok(session)
    }

    /// Revoke a session; `true` if it existed
    pub async fn logout(&self, token: &str) -> bool {
        self.sessions
            .write()
            .await
            .remove(&token_key(token))
            .is_some()
    }

    /// Number of sessions currently held, expired or not
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    fn cleanup_expired_locked(sessions: &mut HashMap<String, AdminSession>, now: DateTime<Utc>) {
        sessions.retain(|_, session| session.expires_at > now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(password: Option<&str>, ttl: u64) -> AdminConfig {
        AdminConfig {
            password: password.map(str::to_owned),
            session_ttl_secs: ttl,
            secure_cookies: false,
        }
    }

    #[tokio::test]
    async fn test_login_validate_logout() {
        let manager = AdminSessionManager::new(&config(Some("hunter2"), 60));
        let issued = manager.login("hunter2").await.unwrap();
        assert_eq!(issued.token.len(), SESSION_TOKEN_LENGTH * 2);

        manager.validate(&issued.token).await.unwrap();
        assert!(manager.logout(&issued.token).await);
        let err = manager.validate(&issued.token).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AuthRequired);
    }

    #[tokio::test]
    async fn test_wrong_password_rejected() {
        let manager = AdminSessionManager::new(&config(Some("hunter2"), 60));
        let err = manager.login("hunter3").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AuthInvalid);
        assert_eq!(manager.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_login_disabled_without_password() {
        let manager = AdminSessionManager::new(&config(None, 60));
        assert!(!manager.is_enabled());
        let err = manager.login("").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ResourceUnavailable);
    }

    #[tokio::test]
    async fn test_expired_session_rejected_and_purged() {
        let manager = AdminSessionManager::new(&config(Some("pw"), 0));
        let issued = manager.login("pw").await.unwrap();
        let err = manager.validate(&issued.token).await.unwrap_err();
        assert!(matches!(err.code, ErrorCode::AuthExpired | ErrorCode::AuthRequired));
        assert_eq!(manager.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_tokens_are_stored_hashed() {
        let manager = AdminSessionManager::new(&config(Some("pw"), 60));
        let issued = manager.login("pw").await.unwrap();
        let sessions = manager.sessions.read().await;
        assert!(!sessions.contains_key(&issued.token));
        assert!(sessions.contains_key(&token_key(&issued.token)));
    }
}
