//! # aistrack-server
//!
//! Tokio ingest loop for AIS traffic.
//!
//! Datagrams received on a UDP socket are framed, reassembled, decoded and
//! applied to a [`SharedTracker`] that the read endpoint queries
//! concurrently. Static reports are appended to a [`StaticLog`].

pub mod server;
pub mod sink;

pub use server::{AisServer, IngestSnapshot, IngestStats, ServerConfig, ServerError, SharedTracker};
pub use sink::{LogError, StaticLog};
