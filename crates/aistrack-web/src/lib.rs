//! # aistrack-web
//!
//! HTTP read endpoint for the AIS ship tracker.
//!
//! ## Architecture
//!
//! The web layer is built on Axum and serves a single resource:
//!
//! - `/data.json` - live ships grouped into the four canal corridors
//!
//! Every other path answers 404. Cross-origin reads are allowed.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use aistrack_web::create_router;
//!
//! let app = create_router(tracker.clone());
//!
//! let listener = TcpListener::bind("0.0.0.0:9999").await?;
//! axum::serve(listener, app).await?;
//! ```

pub mod routes;

pub use routes::create_router;

use std::sync::Arc;

use aistrack_core::ShipTracker;
use tokio::sync::RwLock;

/// Shared state for all route handlers.
///
/// The same lock the ingest loop writes through; handlers only take read
/// guards.
pub type AppState = Arc<RwLock<ShipTracker>>;
