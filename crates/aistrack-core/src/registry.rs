//! Static vessel attributes learned from static reports.

use std::collections::HashMap;

use tracing::debug;

use crate::model::{Mmsi, ShipStaticInfo, StaticReport};
use crate::reference::ReferenceDataStore;

/// Strip the `@` padding and trailing blanks AIS uses to fill text fields.
pub fn normalize_name(raw: &str) -> String {
    raw.trim_end_matches('@').trim_end_matches(' ').to_string()
}

/// Per-vessel static attributes, kept for the lifetime of the tracker.
#[derive(Debug, Clone, Default)]
pub struct StaticShipRegistry {
    ships: HashMap<Mmsi, ShipStaticInfo>,
}

impl StaticShipRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with vessel names known ahead of time.
    pub fn with_known_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = (Mmsi, S)>,
        S: Into<String>,
    {
        let ships = names
            .into_iter()
            .map(|(mmsi, name)| (mmsi, ShipStaticInfo::named(mmsi, name)))
            .collect();
        Self { ships }
    }

    /// Replace the stored attributes of the reporting vessel.
    pub fn record(&mut self, report: &StaticReport, reference: &ReferenceDataStore) -> &ShipStaticInfo {
        let mmsi_text = report.mmsi.to_string();
        let info = ShipStaticInfo {
            mmsi: report.mmsi,
            name: normalize_name(&report.name),
            country: Some(reference.country(&mmsi_text).to_string()),
            length: Some(u32::from(report.dim_a) + u32::from(report.dim_b)),
            width: Some(u32::from(report.dim_c) + u32::from(report.dim_d)),
            draught: Some(report.draught),
            ship_type: Some(reference.ship_type(report.type_and_cargo).to_string()),
        };
        debug!("Static info for {}: {:?}", report.mmsi, info);

        self.ships.insert(report.mmsi, info);
        &self.ships[&report.mmsi]
    }

    pub fn get(&self, mmsi: Mmsi) -> Option<&ShipStaticInfo> {
        self.ships.get(&mmsi)
    }

    pub fn len(&self) -> usize {
        self.ships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ships.is_empty()
    }
}
