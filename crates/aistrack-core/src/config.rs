//! Tracker settings.
//!
//! Settings are read from an optional JSON file. Every field has a default
//! so an empty object (or no file at all) yields a working configuration
//! for the Rendsburg observation post.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::Coordinate;
use crate::model::Mmsi;
use crate::registry::StaticShipRegistry;
use crate::tracker::{ShipTracker, DEFAULT_EVICTION_SECONDS};
use crate::reference::ReferenceDataStore;

/// Errors that can occur while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("Failed to read settings {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid JSON for [`TrackerSettings`].
    #[error("Invalid settings {path}: {source}")]
    InvalidData {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Complete tracker configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackerSettings {
    /// Fixed observation point.
    pub observer: Coordinate,

    /// UDP endpoint receiving NMEA sentences.
    pub udp_bind: SocketAddr,

    /// HTTP endpoint serving `/data.json`.
    pub http_bind: SocketAddr,

    /// Vessels that are never tracked.
    pub excluded_vessels: Vec<Mmsi>,

    /// Names known before any static report arrives.
    pub known_vessels: BTreeMap<Mmsi, String>,

    /// Maximum snapshot age in seconds.
    pub eviction_seconds: i64,

    /// Tab-separated MID to country table.
    pub country_table: PathBuf,

    /// Tab-separated ship type table.
    pub ship_type_table: PathBuf,

    /// Append-only log of static reports.
    pub static_log: PathBuf,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            observer: Coordinate::new(54.36441, 9.82202),
            udp_bind: SocketAddr::from(([127, 0, 0, 1], 2947)),
            http_bind: SocketAddr::from(([0, 0, 0, 0], 9999)),
            excluded_vessels: vec![211457860, 211274960],
            known_vessels: BTreeMap::from([
                (211457860, "PILLAU".to_string()),
                (218627000, "VERA RAMBOW".to_string()),
            ]),
            eviction_seconds: DEFAULT_EVICTION_SECONDS,
            country_table: PathBuf::from("mid.csv"),
            ship_type_table: PathBuf::from("shiptypes.txt"),
            static_log: PathBuf::from("/tmp/ships.txt"),
        }
    }
}

impl TrackerSettings {
    /// Load settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| SettingsError::InvalidData {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Build a tracker from these settings and loaded reference tables.
    pub fn build_tracker(&self, reference: ReferenceDataStore) -> ShipTracker {
        let registry = StaticShipRegistry::with_known_names(
            self.known_vessels
                .iter()
                .map(|(mmsi, name)| (*mmsi, name.clone())),
        );
        ShipTracker::new(self.observer, reference)
            .with_excluded(self.excluded_vessels.iter().copied())
            .with_max_age(chrono::Duration::seconds(self.eviction_seconds))
            .with_registry(registry)
    }
}
