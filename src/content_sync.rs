// ABOUTME: Copies content items from one store URL to another by natural-key upsert
// ABOUTME: Opens the source read-only so a sync or dry run never modifies it
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Portal CMS contributors

//! Store-to-store content copy used by the `content-sync` binary

use crate::config::StoreUrl;
use crate::database_plugins::{ContentProvider, ContentStore};
use crate::errors::{AppError, AppResult};
use crate::services::ContentService;
use portal_core::models::{ContentItem, ContentQuery, ContentType, NewContent};
use tracing::{info, warn};

/// What to copy
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Only copy items of this type
    pub content_type: Option<ContentType>,
    /// Read the source and report, without opening the target
    pub dry_run: bool,
}

/// Outcome of one sync run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Items read from the source
    pub read: usize,
    /// Items upserted into the target
    pub copied: usize,
    /// Items the target rejected
    pub failed: usize,
    /// Item count of the target afterwards; `None` on a dry run
    pub target_total: Option<u64>,
}

fn to_new_content(item: &ContentItem) -> NewContent {
    NewContent {
        content_type: item.content_type,
        key: item.key.clone(),
        value: item.value.clone(),
        fields: item.fields.clone(),
        category: item.category.clone(),
    }
}

/// Copy every matching item from `from` into `to`
///
/// Items are upserted by `(type, key)`, so repeated runs converge and target
/// ids survive. Per-item failures are counted rather than aborting the run.
///
/// # Errors
///
/// Returns `InvalidInput` when both URLs address the same store,
/// `ResourceNotFound` when the source does not exist, or a store error
pub async fn sync_content(from: &str, to: &str, options: SyncOptions) -> AppResult<SyncReport> {
    if StoreUrl::parse_url(from)?.same_location(&StoreUrl::parse_url(to)?) {
        return Err(AppError::invalid_input(format!(
            "Source and target store are the same: {from}"
        )));
    }

    let source = ContentService::new(ContentStore::open_read_only(from).await?);
    let query = options
        .content_type
        .map_or_else(ContentQuery::default, ContentQuery::of_type);
    let items = source.list_all(&query).await?;
    info!(
        from,
        backend = source.store().backend_info(),
        items = items.len(),
        "Read source store"
    );

    let mut report = SyncReport {
        read: items.len(),
        ..SyncReport::default()
    };
    if options.dry_run {
        for item in &items {
            info!(content.type = %item.content_type, content.key = %item.key, "Would copy");
        }
        return Ok(report);
    }

    let target = ContentService::new(ContentStore::new(to).await?);
    for item in &items {
        match target.upsert(&to_new_content(item)).await {
            Ok(_) => report.copied += 1,
            Err(e) => {
                report.failed += 1;
                warn!(content.type = %item.content_type, content.key = %item.key, "Copy failed: {e}");
            }
        }
    }
    report.target_total = Some(target.store().count_content().await?);
    Ok(report)
}
