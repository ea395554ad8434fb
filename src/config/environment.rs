// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses ports, content store URLs, admin session and CORS settings from the environment
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Portal CMS contributors

//! Environment-based configuration management for production deployment
//!
//! The portal is configured from environment variables only. Parsing goes
//! through [`ServerConfig::from_lookup`] so tests can supply a map instead of
//! mutating the process environment.

use crate::errors::{AppError, AppResult, ErrorCode};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;
use tracing::{info, warn};

/// Environment variable names
pub mod vars {
    /// HTTP listen port
    pub const HTTP_PORT: &str = "HTTP_PORT";
    /// HTTP listen address
    pub const HOST: &str = "HOST";
    /// Deployment environment
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
    /// Log level
    pub const RUST_LOG: &str = "RUST_LOG";
    /// Store backing the content API
    pub const CONTENT_DATABASE_URL: &str = "CONTENT_DATABASE_URL";
    /// Store backing the texts API
    pub const TEXT_STORE_URL: &str = "TEXT_STORE_URL";
    /// Admin password (login disabled when unset)
    pub const ADMIN_PASSWORD: &str = "PORTAL_ADMIN_PASSWORD";
    /// Admin session lifetime in seconds
    pub const ADMIN_SESSION_TTL_SECS: &str = "PORTAL_ADMIN_SESSION_TTL_SECS";
    /// Force the `Secure` cookie attribute on or off
    pub const SECURE_COOKIES: &str = "PORTAL_SECURE_COOKIES";
    /// Comma-separated CORS origins or `*`
    pub const CORS_ALLOWED_ORIGINS: &str = "CORS_ALLOWED_ORIGINS";
    /// Per-request timeout in seconds
    pub const REQUEST_TIMEOUT_SECS: &str = "REQUEST_TIMEOUT_SECS";
    /// Maximum request body size in bytes
    pub const MAX_BODY_BYTES: &str = "MAX_BODY_BYTES";
}

/// Default values
pub mod defaults {
    /// Default HTTP port
    pub const HTTP_PORT: u16 = 8080;
    /// Default listen address
    pub const HOST: &str = "127.0.0.1";
    /// Default content store
    pub const CONTENT_DATABASE_URL: &str = "sqlite:./data/content.db";
    /// Default texts store
    pub const TEXT_STORE_URL: &str = "file:./data/texts.json";
    /// Default admin session lifetime (8 hours)
    pub const ADMIN_SESSION_TTL_SECS: u64 = 8 * 60 * 60;
    /// Default request timeout
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
    /// Default body limit (1 MiB)
    pub const MAX_BODY_BYTES: usize = 1024 * 1024;
}

/// Strongly typed log level configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Normal operation
    #[default]
    Info,
    /// Verbose
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Environment type for security and other configurations
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }

    /// Check if this is a development environment
    #[must_use]
    pub const fn is_development(self) -> bool {
        matches!(self, Self::Development)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Type-safe content store location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreUrl {
    /// `SQLite` database file
    Sqlite {
        /// Database file path
        path: PathBuf,
    },
    /// In-memory `SQLite` (for testing)
    SqliteMemory,
    /// JSON document on disk
    JsonFile {
        /// Document path
        path: PathBuf,
    },
}

impl StoreUrl {
    /// Parse from string with validation
    ///
    /// Accepts `sqlite:<path>`, `sqlite::memory:`, `file:<path>`, `json:<path>`,
    /// or a bare path ending in `.json`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` for empty or unrecognized locations.
    pub fn parse_url(s: &str) -> AppResult<Self> {
        let s = s.trim();
        if s == "sqlite::memory:" || s == "sqlite://:memory:" {
            return Ok(Self::SqliteMemory);
        }
        if let Some(rest) = s.strip_prefix("sqlite:") {
            let path = rest.trim_start_matches("//");
            return non_empty_path(path, s).map(|path| Self::Sqlite { path });
        }
        if let Some(rest) = s.strip_prefix("file:").or_else(|| s.strip_prefix("json:")) {
            let path = rest.trim_start_matches("//");
            return non_empty_path(path, s).map(|path| Self::JsonFile { path });
        }
        if s.ends_with(".json") {
            return Ok(Self::JsonFile {
                path: PathBuf::from(s),
            });
        }
        Err(AppError::new(
            ErrorCode::ConfigInvalid,
            format!(
                "Unsupported store URL: {s}. Supported formats: sqlite:path/to/content.db, \
                 sqlite::memory:, file:path/to/texts.json"
            ),
        ))
    }

    /// Convert to connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::Sqlite { path } => format!("sqlite:{}", path.display()),
            Self::SqliteMemory => "sqlite::memory:".to_owned(),
            Self::JsonFile { path } => format!("file:{}", path.display()),
        }
    }

    /// Whether two URLs address the same backing store
    ///
    /// File paths are compared after resolving them against the working
    /// directory, so `file:data/t.json` and `file:./data/t.json` match.
    #[must_use]
    pub fn same_location(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::SqliteMemory, Self::SqliteMemory) => true,
            (Self::Sqlite { path: a }, Self::Sqlite { path: b })
            | (Self::JsonFile { path: a }, Self::JsonFile { path: b }) => {
                normalize_path(a) == normalize_path(b)
            }
            _ => false,
        }
    }

    /// Whether this is a SQL backend
    #[must_use]
    pub const fn is_sqlite(&self) -> bool {
        matches!(self, Self::Sqlite { .. } | Self::SqliteMemory)
    }

    /// Whether this is a JSON file backend
    #[must_use]
    pub const fn is_json_file(&self) -> bool {
        matches!(self, Self::JsonFile { .. })
    }
}

fn non_empty_path(path: &str, original: &str) -> AppResult<PathBuf> {
    if path.is_empty() {
        return Err(AppError::new(
            ErrorCode::ConfigInvalid,
            format!("Store URL has no path: {original}"),
        ));
    }
    Ok(PathBuf::from(path))
}

/// Absolute form of a store path, with symlinks resolved when it exists
fn normalize_path(path: &Path) -> PathBuf {
    if let Ok(canonical) = std::fs::canonicalize(path) {
        return canonical;
    }
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
    };
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

impl FromStr for StoreUrl {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_url(s)
    }
}

impl fmt::Display for StoreUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_connection_string())
    }
}

/// Admin session gate configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Admin password; login is disabled when absent
    #[serde(skip_serializing, default)]
    pub password: Option<String>,
    /// Session lifetime in seconds
    pub session_ttl_secs: u64,
    /// Emit the `Secure` cookie attribute
    pub secure_cookies: bool,
}

impl fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminConfig")
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("session_ttl_secs", &self.session_ttl_secs)
            .field("secure_cookies", &self.secure_cookies)
            .finish()
    }
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated origins, or `*`
    pub allowed_origins: String,
}

/// HTTP limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Maximum request body size in bytes
    pub max_body_bytes: usize,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    pub host: String,
    /// HTTP API port
    pub http_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Log level
    pub log_level: LogLevel,
    /// Store behind `/api/content`, `/api/pages` and collections
    pub content_store: StoreUrl,
    /// Store behind `/api/texts`
    pub text_store: StoreUrl,
    /// Admin session settings
    pub admin: AdminConfig,
    /// CORS settings
    pub cors: CorsConfig,
    /// HTTP limits
    pub http: HttpConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` if any variable is present but malformed.
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");
        let config = Self::from_lookup(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Build configuration from an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` if any variable is present but malformed.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup(vars::ENVIRONMENT)
            .map(|v| Environment::from_str_or_default(&v))
            .unwrap_or_default();

        let secure_cookies = match lookup(vars::SECURE_COOKIES) {
            Some(v) => parse_var(vars::SECURE_COOKIES, &v)?,
            None => !environment.is_development(),
        };

        Ok(Self {
            host: lookup(vars::HOST).unwrap_or_else(|| defaults::HOST.to_owned()),
            http_port: parse_or(&lookup, vars::HTTP_PORT, defaults::HTTP_PORT)?,
            environment,
            log_level: lookup(vars::RUST_LOG)
                .map(|v| LogLevel::from_str_or_default(&v))
                .unwrap_or_default(),
            content_store: StoreUrl::parse_url(
                &lookup(vars::CONTENT_DATABASE_URL)
                    .unwrap_or_else(|| defaults::CONTENT_DATABASE_URL.to_owned()),
            )?,
            text_store: StoreUrl::parse_url(
                &lookup(vars::TEXT_STORE_URL)
                    .unwrap_or_else(|| defaults::TEXT_STORE_URL.to_owned()),
            )?,
            admin: AdminConfig {
                password: lookup(vars::ADMIN_PASSWORD).filter(|p| !p.is_empty()),
                session_ttl_secs: parse_or(
                    &lookup,
                    vars::ADMIN_SESSION_TTL_SECS,
                    defaults::ADMIN_SESSION_TTL_SECS,
                )?,
                secure_cookies,
            },
            cors: CorsConfig {
                allowed_origins: lookup(vars::CORS_ALLOWED_ORIGINS).unwrap_or_else(|| "*".to_owned()),
            },
            http: HttpConfig {
                request_timeout_secs: parse_or(
                    &lookup,
                    vars::REQUEST_TIMEOUT_SECS,
                    defaults::REQUEST_TIMEOUT_SECS,
                )?,
                max_body_bytes: parse_or(&lookup, vars::MAX_BODY_BYTES, defaults::MAX_BODY_BYTES)?,
            },
        })
    }

    /// Configuration for tests: in-memory SQL content store and the given texts file
    #[must_use]
    pub fn for_testing(text_store: StoreUrl, admin_password: Option<&str>) -> Self {
        Self {
            host: defaults::HOST.to_owned(),
            http_port: 0,
            environment: Environment::Testing,
            log_level: LogLevel::Warn,
            content_store: StoreUrl::SqliteMemory,
            text_store,
            admin: AdminConfig {
                password: admin_password.map(str::to_owned),
                session_ttl_secs: defaults::ADMIN_SESSION_TTL_SECS,
                secure_cookies: false,
            },
            cors: CorsConfig {
                allowed_origins: "*".to_owned(),
            },
            http: HttpConfig {
                request_timeout_secs: defaults::REQUEST_TIMEOUT_SECS,
                max_body_bytes: defaults::MAX_BODY_BYTES,
            },
        }
    }

    /// Validate cross-field constraints
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` when a setting is out of range.
    pub fn validate(&self) -> AppResult<()> {
        if self.admin.session_ttl_secs == 0 {
            return Err(AppError::new(
                ErrorCode::ConfigInvalid,
                format!("{} must be greater than zero", vars::ADMIN_SESSION_TTL_SECS),
            ));
        }
        if self.http.request_timeout_secs == 0 {
            return Err(AppError::new(
                ErrorCode::ConfigInvalid,
                format!("{} must be greater than zero", vars::REQUEST_TIMEOUT_SECS),
            ));
        }
        if self.admin.password.is_none() {
            warn!(
                "{} is not set; admin login is disabled",
                vars::ADMIN_PASSWORD
            );
        }
        if self.environment.is_production() && !self.admin.secure_cookies {
            warn!("Secure cookies are disabled in production");
        }
        Ok(())
    }

    /// Human-readable configuration summary for startup logs
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Portal CMS Configuration:\n\
             - Listen: {}:{}\n\
             - Environment: {}\n\
             - Log Level: {}\n\
             - Content Store: {}\n\
             - Text Store: {}\n\
             - Admin Login: {}\n\
             - CORS Origins: {}",
            self.host,
            self.http_port,
            self.environment,
            self.log_level,
            self.content_store,
            self.text_store,
            if self.admin.password.is_some() {
                "Enabled"
            } else {
                "Disabled"
            },
            self.cors.allowed_origins,
        )
    }
}

fn parse_var<T: FromStr>(key: &str, raw: &str) -> AppResult<T> {
    raw.trim().parse().map_err(|_| {
        AppError::new(
            ErrorCode::ConfigInvalid,
            format!("Invalid {key} value: {raw}"),
        )
    })
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> AppResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(key).map_or(Ok(default), |raw| parse_var(key, &raw))
}
