// ABOUTME: Copies every content item from one store URL to another
// ABOUTME: Used to move content between the SQLite and JSON file backends, with a dry-run mode
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Portal CMS contributors

//! # Content Sync
//!
//! ```bash
//! content-sync --from file:./data/texts.json --to sqlite:./data/content.db --dry-run
//! ```
//!
//! The source must already exist and is never written, not even to upgrade
//! a legacy JSON file. Items are upserted by `(type, key)`, so running the
//! sync twice is harmless.

use anyhow::{bail, Result};
use clap::Parser;
use portal_cms::{
    content_sync::{sync_content, SyncOptions},
    logging,
    models::ContentType,
};
use std::time::Instant;
use tracing::info;

#[derive(Parser)]
#[command(name = "content-sync")]
#[command(about = "Copy content items between portal CMS stores")]
pub struct Args {
    /// Source store URL (must exist; opened read-only)
    #[arg(long)]
    from: String,

    /// Target store URL
    #[arg(long)]
    to: String,

    /// Only copy items of this type
    #[arg(long = "type")]
    content_type: Option<String>,

    /// Report what would be copied without writing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_from_env()?;

    let options = SyncOptions {
        content_type: args
            .content_type
            .as_deref()
            .map(str::parse::<ContentType>)
            .transpose()?,
        dry_run: args.dry_run,
    };

    let started = Instant::now();
    let report = sync_content(&args.from, &args.to, options).await?;
    if args.dry_run {
        info!(items = report.read, "Dry run complete; nothing written");
        return Ok(());
    }

    info!(
        to = %args.to,
        copied = report.copied,
        failed = report.failed,
        target_total = report.target_total,
        elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        "Content sync finished"
    );
    if report.failed > 0 {
        bail!("{} item(s) could not be copied", report.failed);
    }
    Ok(())
}
