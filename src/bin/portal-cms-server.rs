// ABOUTME: Server binary for the portal CMS HTTP API
// ABOUTME: Loads environment configuration, opens both content stores, and serves until shutdown
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Portal CMS contributors

//! # Portal CMS Server Binary
//!
//! Starts the public content API and the admin editing API.

use anyhow::Result;
use clap::Parser;
use portal_cms::{
    config::{ServerConfig, StoreUrl},
    logging,
    resources::ServerResources,
    server,
};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "portal-cms-server")]
#[command(about = "Portal CMS - content API for the consulting portal")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override the listen address
    #[arg(long)]
    host: Option<String>,

    /// Override the content store URL (`sqlite:...` or `file:...`)
    #[arg(long)]
    content_store: Option<String>,

    /// Override the text store URL (`sqlite:...` or `file:...`)
    #[arg(long)]
    text_store: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(url) = args.content_store.as_deref() {
        config.content_store = StoreUrl::parse_url(url)?;
    }
    if let Some(url) = args.text_store.as_deref() {
        config.text_store = StoreUrl::parse_url(url)?;
    }

    info!("{}", config.summary());

    let resources = Arc::new(ServerResources::new(config).await?);
    if let Err(e) = server::run(resources).await {
        error!("Server error: {e}");
        return Err(e.into());
    }
    Ok(())
}
