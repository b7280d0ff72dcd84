//! # aistrack-core
//!
//! Core AIS ship tracking model and engine.
//!
//! This crate provides:
//! - Great-circle distance and bearing
//! - Decoded message, static info and snapshot types
//! - Reference tables (country by MID, ship type descriptions)
//! - Static ship registry
//! - Ship tracker with live table and eviction
//! - Corridor query view
//!
//! This crate is intentionally runtime-agnostic and contains no async code.

pub mod config;
pub mod geo;
pub mod model;
pub mod query;
pub mod reference;
pub mod registry;
pub mod tracker;

pub use config::{SettingsError, TrackerSettings};
pub use geo::Coordinate;
pub use model::*;
pub use query::{CorridorView, QueryService};
pub use reference::{ReferenceDataStore, ReferenceError};
pub use registry::StaticShipRegistry;
pub use tracker::{LiveShipTable, Outcome, ShipTracker};
