use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::sync::RwLock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aistrack_core::{ReferenceDataStore, TrackerSettings};
use aistrack_server::{AisServer, ServerConfig, SharedTracker};

const DEFAULT_LOG_FILTER: &str = "info,aistrack_server=debug";

/// Track AIS traffic passing a fixed observation point.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// UDP address receiving NMEA sentences
    #[arg(long)]
    udp_bind: Option<SocketAddr>,

    /// HTTP address serving /data.json
    #[arg(long)]
    http_bind: Option<SocketAddr>,

    /// Tab-separated MID to country table
    #[arg(long)]
    country_table: Option<PathBuf>,

    /// Tab-separated ship type table
    #[arg(long)]
    ship_type_table: Option<PathBuf>,

    /// Append-only log of static reports
    #[arg(long)]
    static_log: Option<PathBuf>,

    /// Tracing filter, overrides RUST_LOG
    #[arg(long)]
    log_filter: Option<String>,
}

impl Args {
    fn settings(&self) -> anyhow::Result<TrackerSettings> {
        let mut settings = match &self.config {
            Some(path) => TrackerSettings::load(path)?,
            None => TrackerSettings::default(),
        };
        if let Some(addr) = self.udp_bind {
            settings.udp_bind = addr;
        }
        if let Some(addr) = self.http_bind {
            settings.http_bind = addr;
        }
        if let Some(path) = &self.country_table {
            settings.country_table = path.clone();
        }
        if let Some(path) = &self.ship_type_table {
            settings.ship_type_table = path.clone();
        }
        if let Some(path) = &self.static_log {
            settings.static_log = path.clone();
        }
        Ok(settings)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = args
        .log_filter
        .clone()
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.into());
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("AIS tracker starting...");

    let settings = args.settings()?;
    let reference = ReferenceDataStore::load(&settings.country_table, &settings.ship_type_table)
        .context("Reference tables are required")?;

    let tracker: SharedTracker = Arc::new(RwLock::new(settings.build_tracker(reference)));
    let config = ServerConfig {
        bind_addr: settings.udp_bind,
        static_log: Some(settings.static_log.clone()),
    };
    let server = AisServer::with_shared(config, tracker.clone());

    let listener = tokio::net::TcpListener::bind(settings.http_bind)
        .await
        .with_context(|| format!("Failed to bind HTTP endpoint {}", settings.http_bind))?;

    let ingest_handle = tokio::spawn(async move {
        if let Err(e) = server.run().await {
            tracing::error!("Ingest stopped: {}", e);
        }
    });

    let app = aistrack_web::create_router(tracker);
    let http_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("HTTP server error: {}", e);
        }
    });

    tracing::info!("AIS tracker ready");
    tracing::info!("   Ingest:  udp://{}", settings.udp_bind);
    tracing::info!("   Ships:   http://{}/data.json", settings.http_bind);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        _ = ingest_handle => {
            tracing::warn!("Ingest stopped");
        }
        _ = http_handle => {
            tracing::warn!("HTTP server stopped");
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
