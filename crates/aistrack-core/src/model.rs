//! AIS tracking data model types.
//!
//! These types describe what flows through the tracker:
//! - Decoded messages handed over by a message decoder
//! - Static vessel attributes learned from static reports
//! - Live snapshots published in the ship table

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// Maritime Mobile Service Identity of a vessel.
pub type Mmsi = u32;

/// A decoded AIS message, tagged by message type.
///
/// Only the variants the tracker acts on carry fields; every other message
/// type is reduced to its type id and sender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DecodedMessage {
    /// Class A position report (message types 1, 2 and 3).
    Position(PositionReport),
    /// Static and voyage related data (message type 5).
    Static(StaticReport),
    /// Any other message type.
    Other { message_type: u8, mmsi: Mmsi },
}

impl DecodedMessage {
    /// The AIS message type id.
    pub fn message_type(&self) -> u8 {
        match self {
            DecodedMessage::Position(report) => report.message_type,
            DecodedMessage::Static(report) => report.message_type,
            DecodedMessage::Other { message_type, .. } => *message_type,
        }
    }

    /// The MMSI of the sending station.
    pub fn mmsi(&self) -> Mmsi {
        match self {
            DecodedMessage::Position(report) => report.mmsi,
            DecodedMessage::Static(report) => report.mmsi,
            DecodedMessage::Other { mmsi, .. } => *mmsi,
        }
    }
}

/// Position, course and speed of a vessel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionReport {
    pub message_type: u8,
    pub mmsi: Mmsi,
    /// Latitude in decimal degrees (91 = not available)
    pub latitude: f64,
    /// Longitude in decimal degrees (181 = not available)
    pub longitude: f64,
    /// Course over ground in degrees
    pub cog: f64,
    /// Speed over ground in knots
    pub sog: f64,
}

impl PositionReport {
    pub fn position(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    /// Whether the reported coordinates are inside the valid range.
    pub fn has_position(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Static report as transmitted, before any normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticReport {
    pub message_type: u8,
    pub mmsi: Mmsi,
    /// Vessel name, possibly padded with `@` and spaces
    pub name: String,
    /// Distance from the reference point to the bow, meters
    pub dim_a: u16,
    /// Distance from the reference point to the stern, meters
    pub dim_b: u16,
    /// Distance from the reference point to port, meters
    pub dim_c: u16,
    /// Distance from the reference point to starboard, meters
    pub dim_d: u16,
    /// Maximum present static draught, meters
    pub draught: f64,
    /// Type of ship and cargo code
    pub type_and_cargo: Option<u8>,
}

/// Static vessel attributes kept for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipStaticInfo {
    pub mmsi: Mmsi,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draught: Option<f64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub ship_type: Option<String>,
}

impl ShipStaticInfo {
    /// Entry that only knows the vessel's name.
    pub fn named(mmsi: Mmsi, name: impl Into<String>) -> Self {
        Self {
            mmsi,
            name: name.into(),
            country: None,
            length: None,
            width: None,
            draught: None,
            ship_type: None,
        }
    }
}

/// Travel direction through the canal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "west -> east")]
    WestToEast,
    #[serde(rename = "east -> west")]
    EastToWest,
    #[serde(rename = "unknown")]
    Unknown,
}

/// Whether a vessel approaches or moves away from the observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Coming,
    Leaving,
    Unknown,
}

/// Live state of one vessel as published in the ship table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShipSnapshot {
    pub mmsi: Mmsi,
    pub name: String,
    pub country: String,
    /// Distance to the observer in meters
    #[serde(rename = "distance")]
    pub distance_m: f64,
    /// Speed over ground in km/h
    #[serde(rename = "speed")]
    pub speed_kmh: f64,
    pub direction: Direction,
    pub status: Status,
    #[serde(rename = "seconds_to_arrival")]
    pub eta_seconds: f64,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draught: Option<f64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub ship_type: Option<String>,
}
