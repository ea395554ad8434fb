// ABOUTME: Constants for content keys, pagination, and well-known content categories
// ABOUTME: Shared by the storage backends, the service layer, and request validation
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Portal CMS contributors

//! Constants module
//!
//! Grouped by domain so callers import `limits::MAX_KEY_LENGTH` rather than a
//! flat list of unrelated values.

/// Size and pagination limits
pub mod limits {
    /// Maximum length of a content key (page paths included)
    pub const MAX_KEY_LENGTH: usize = 255;

    /// Maximum length of a category name
    pub const MAX_CATEGORY_LENGTH: usize = 64;

    /// Maximum length of a text value (256 KiB)
    pub const MAX_TEXT_VALUE_BYTES: usize = 256 * 1024;

    /// Default page size for list operations
    pub const DEFAULT_LIST_LIMIT: u32 = 100;

    /// Upper bound for list and search page sizes
    pub const MAX_LIST_LIMIT: u32 = 500;

    /// Default number of search hits
    pub const DEFAULT_SEARCH_LIMIT: u32 = 50;

    /// Minimum search term length (shorter terms match nearly everything)
    pub const MIN_SEARCH_TERM_LENGTH: usize = 2;
}

/// Well-known categories used by the admin editors
pub mod categories {
    /// Consulting services catalog entries
    pub const SERVICES: &str = "services";

    /// Workshop catalog entries
    pub const WORKSHOPS: &str = "workshops";

    /// Downloadable resources and links
    pub const RESOURCES: &str = "resources";

    /// Email templates (structured items with `subject` and `body`)
    pub const EMAIL_TEMPLATES: &str = "email_templates";

    /// Site-wide settings such as the mail configuration
    pub const SETTINGS: &str = "settings";

    /// Data domains editable as collections through the admin API
    pub const COLLECTION_DOMAINS: [&str; 3] = [SERVICES, WORKSHOPS, RESOURCES];

    /// Check whether a name is one of the collection domains
    #[must_use]
    pub fn is_collection_domain(name: &str) -> bool {
        COLLECTION_DOMAINS.contains(&name)
    }
}

/// Well-known content keys
pub mod keys {
    /// Structured item holding the mail configuration
    pub const MAIL_CONFIG: &str = "mail_config";

    /// Path of the landing page
    pub const LANDING_PAGE_PATH: &str = "/";
}

/// JSON file store format
pub mod file_store {
    /// Current on-disk document version
    pub const FORMAT_VERSION: u32 = 1;
}
