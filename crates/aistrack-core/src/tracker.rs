//! Live ship tracking.
//!
//! The tracker owns every piece of mutable tracking state: the live ship
//! table, the static registry and the reference tables it reads from. Each
//! decoded message is applied through [`ShipTracker::handle`], which keeps
//! the table free of observer vessels and stale entries.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::geo::{self, Coordinate};
use crate::model::{
    DecodedMessage, Direction, Mmsi, PositionReport, ShipSnapshot, StaticReport, Status,
};
use crate::reference::ReferenceDataStore;
use crate::registry::StaticShipRegistry;

/// Snapshots older than this are evicted.
pub const DEFAULT_EVICTION_SECONDS: i64 = 360;

/// Knots to km/h.
const KNOTS_TO_KMH: f64 = 1.852;

/// Speed assumed for vessels reporting zero speed, km/h.
const MIN_SPEED_KMH: f64 = 0.1;

/// Live vessel snapshots keyed by MMSI.
pub type LiveShipTable = HashMap<Mmsi, ShipSnapshot>;

/// Classify travel direction and approach status.
///
/// `cog` is the vessel's course over ground, `bearing` the bearing from the
/// vessel to the observer. Courses between 110 and 230 degrees are left
/// unclassified.
pub fn classify(cog: f64, bearing: f64) -> (Direction, Status) {
    if cog < 110.0 {
        let status = if bearing < 90.0 {
            Status::Leaving
        } else if bearing > 250.0 {
            Status::Coming
        } else {
            Status::Unknown
        };
        (Direction::WestToEast, status)
    } else if cog > 230.0 {
        let status = if bearing < 90.0 {
            Status::Coming
        } else if bearing > 250.0 {
            Status::Leaving
        } else {
            Status::Unknown
        };
        (Direction::EastToWest, status)
    } else {
        (Direction::Unknown, Status::Unknown)
    }
}

/// Speed in km/h, never below [`MIN_SPEED_KMH`] for a stopped vessel.
pub fn speed_kmh(sog_knots: f64) -> f64 {
    let speed = sog_knots * KNOTS_TO_KMH;
    if speed == 0.0 {
        MIN_SPEED_KMH
    } else {
        speed
    }
}

/// Seconds until a vessel covers `distance_m` at its current speed.
pub fn compute_eta(distance_m: f64, sog_knots: f64) -> f64 {
    distance_m / (speed_kmh(sog_knots) / 3.6)
}

/// What [`ShipTracker::handle`] did with a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A snapshot was created or replaced.
    Tracked,
    /// Static attributes were recorded.
    Registered,
    /// The message came from an excluded vessel.
    Excluded,
    /// The message carried nothing the tracker uses.
    Ignored,
}

/// Tracks vessels around a fixed observation point.
#[derive(Debug, Clone)]
pub struct ShipTracker {
    observer: Coordinate,
    excluded: HashSet<Mmsi>,
    max_age: Duration,
    reference: ReferenceDataStore,
    registry: StaticShipRegistry,
    table: LiveShipTable,
}

impl ShipTracker {
    /// Create a tracker for the given observation point.
    pub fn new(observer: Coordinate, reference: ReferenceDataStore) -> Self {
        Self {
            observer,
            excluded: HashSet::new(),
            max_age: Duration::seconds(DEFAULT_EVICTION_SECONDS),
            reference,
            registry: StaticShipRegistry::new(),
            table: LiveShipTable::new(),
        }
    }

    /// Vessels that are never tracked, typically the observer's own ships.
    pub fn with_excluded(mut self, excluded: impl IntoIterator<Item = Mmsi>) -> Self {
        self.excluded = excluded.into_iter().collect();
        self
    }

    /// Maximum snapshot age before eviction.
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    /// Start from a pre-populated static registry.
    pub fn with_registry(mut self, registry: StaticShipRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn observer(&self) -> Coordinate {
        self.observer
    }

    pub fn table(&self) -> &LiveShipTable {
        &self.table
    }

    pub fn registry(&self) -> &StaticShipRegistry {
        &self.registry
    }

    pub fn is_excluded(&self, mmsi: Mmsi) -> bool {
        self.excluded.contains(&mmsi)
    }

    /// Apply one decoded message.
    ///
    /// Message types 1 and 3 update the live table, type 5 updates the
    /// static registry. Everything else is ignored.
    pub fn handle(&mut self, message: &DecodedMessage, now: DateTime<Utc>) -> Outcome {
        match message {
            DecodedMessage::Position(report) if matches!(report.message_type, 1 | 3) => {
                self.update(report, now)
            }
            DecodedMessage::Static(report) => self.record_static(report),
            other => {
                debug!(
                    "Ignoring message type {} from {}",
                    other.message_type(),
                    other.mmsi()
                );
                Outcome::Ignored
            }
        }
    }

    /// Build a snapshot from a position report and publish it, then sweep.
    pub fn update(&mut self, report: &PositionReport, now: DateTime<Utc>) -> Outcome {
        let mmsi = report.mmsi;
        if self.is_excluded(mmsi) {
            return Outcome::Excluded;
        }
        if !report.has_position() {
            debug!("Position of {} not available", mmsi);
            return Outcome::Ignored;
        }

        let position = report.position();
        let distance_m = geo::distance(position, self.observer);
        let bearing = geo::bearing(position, self.observer);
        let (direction, status) = classify(report.cog, bearing);

        let mmsi_text = mmsi.to_string();
        let country = self.reference.country(&mmsi_text).to_string();
        let known = self.registry.get(mmsi);

        let snapshot = ShipSnapshot {
            mmsi,
            name: known.map(|s| s.name.clone()).unwrap_or(mmsi_text),
            country,
            distance_m,
            speed_kmh: speed_kmh(report.sog),
            direction,
            status,
            eta_seconds: compute_eta(distance_m, report.sog),
            timestamp: now,
            length: known.and_then(|s| s.length),
            width: known.and_then(|s| s.width),
            draught: known.and_then(|s| s.draught),
            ship_type: known.and_then(|s| s.ship_type.clone()),
        };
        debug!(
            "{} ({}) {:.0} m, {:?} {:?}, eta {:.0} s",
            snapshot.name, mmsi, distance_m, direction, status, snapshot.eta_seconds
        );

        self.table.insert(mmsi, snapshot);
        self.evict(now);
        Outcome::Tracked
    }

    /// Record static attributes unless the vessel is excluded.
    ///
    /// Every excluded vessel is skipped, not only the observer ferry.
    pub fn record_static(&mut self, report: &StaticReport) -> Outcome {
        if self.is_excluded(report.mmsi) {
            return Outcome::Excluded;
        }
        self.registry.record(report, &self.reference);
        Outcome::Registered
    }

    /// Remove every snapshot more than the maximum age older than `now`.
    pub fn evict(&mut self, now: DateTime<Utc>) -> usize {
        let max_age = self.max_age;
        let before = self.table.len();
        self.table
            .retain(|_, snapshot| now.signed_duration_since(snapshot.timestamp) <= max_age);

        let evicted = before - self.table.len();
        if evicted > 0 {
            debug!("Evicted {} stale ships", evicted);
        }
        evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    const OBSERVER: Coordinate = Coordinate::new(54.36441, 9.82202);

    fn reference() -> ReferenceDataStore {
        ReferenceDataStore::new(
            HashMap::from([("211".to_string(), "Germany".to_string())]),
            HashMap::from([("70".to_string(), "Cargo".to_string())]),
        )
    }

    fn tracker() -> ShipTracker {
        ShipTracker::new(OBSERVER, reference()).with_excluded([211457860, 211274960])
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn position(mmsi: Mmsi, longitude: f64, cog: f64, sog: f64) -> PositionReport {
        PositionReport {
            message_type: 1,
            mmsi,
            latitude: OBSERVER.latitude,
            longitude,
            cog,
            sog,
        }
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(50.0, 45.0), (Direction::WestToEast, Status::Leaving));
        assert_eq!(classify(50.0, 300.0), (Direction::WestToEast, Status::Coming));
        assert_eq!(classify(50.0, 180.0), (Direction::WestToEast, Status::Unknown));
        assert_eq!(classify(250.0, 300.0), (Direction::EastToWest, Status::Leaving));
        assert_eq!(classify(250.0, 45.0), (Direction::EastToWest, Status::Coming));
        assert_eq!(classify(250.0, 90.0), (Direction::EastToWest, Status::Unknown));
    }

    #[test]
    fn test_classify_mid_band_is_unknown() {
        for bearing in [0.0, 45.0, 180.0, 300.0, 359.9] {
            assert_eq!(classify(150.0, bearing), (Direction::Unknown, Status::Unknown));
        }
        assert_eq!(classify(110.0, 45.0), (Direction::Unknown, Status::Unknown));
        assert_eq!(classify(230.0, 45.0), (Direction::Unknown, Status::Unknown));
    }

    #[test]
    fn test_compute_eta() {
        assert!((compute_eta(1000.0, 0.0) - 36000.0).abs() < 1e-6);
        // 10 knots = 18.52 km/h = 5.1444 m/s
        assert!((compute_eta(1852.0, 10.0) - 360.0).abs() < 1e-6);
    }

    #[test]
    fn test_update_builds_snapshot() {
        let mut tracker = tracker();
        // West of the observer, heading east
        let outcome = tracker.update(&position(211000001, 9.80, 90.0, 5.0), t0());
        assert_eq!(outcome, Outcome::Tracked);

        let snapshot = &tracker.table()[&211000001];
        assert_eq!(snapshot.name, "211000001");
        assert_eq!(snapshot.country, "Germany");
        assert_eq!(snapshot.direction, Direction::WestToEast);
        assert_eq!(snapshot.status, Status::Leaving);
        assert!((snapshot.speed_kmh - 9.26).abs() < 1e-9);
        assert!(snapshot.distance_m > 1000.0 && snapshot.distance_m < 2000.0);
        assert_eq!(snapshot.timestamp, t0());
        assert!(snapshot.length.is_none());
    }

    #[test]
    fn test_update_merges_static_info() {
        let mut tracker = tracker();
        tracker.record_static(&StaticReport {
            message_type: 5,
            mmsi: 211000001,
            name: "ANNA@@@@".to_string(),
            dim_a: 70,
            dim_b: 20,
            dim_c: 5,
            dim_d: 7,
            draught: 4.2,
            type_and_cargo: Some(70),
        });
        tracker.update(&position(211000001, 9.80, 270.0, 8.0), t0());

        let snapshot = &tracker.table()[&211000001];
        assert_eq!(snapshot.name, "ANNA");
        assert_eq!(snapshot.length, Some(90));
        assert_eq!(snapshot.width, Some(12));
        assert_eq!(snapshot.draught, Some(4.2));
        assert_eq!(snapshot.ship_type.as_deref(), Some("Cargo"));
    }

    #[test]
    fn test_update_replaces_snapshot() {
        let mut tracker = tracker();
        tracker.update(&position(211000001, 9.80, 90.0, 5.0), t0());
        tracker.update(&position(211000001, 9.81, 90.0, 6.0), t0() + Duration::seconds(10));

        assert_eq!(tracker.table().len(), 1);
        let snapshot = &tracker.table()[&211000001];
        assert_eq!(snapshot.timestamp, t0() + Duration::seconds(10));
        assert!((snapshot.speed_kmh - 6.0 * 1.852).abs() < 1e-9);
    }

    #[test]
    fn test_excluded_vessels_never_tracked() {
        let mut tracker = tracker();
        assert_eq!(
            tracker.update(&position(211457860, 9.80, 90.0, 5.0), t0()),
            Outcome::Excluded
        );
        let msg = DecodedMessage::Position(PositionReport {
            message_type: 3,
            ..position(211274960, 9.80, 90.0, 5.0)
        });
        assert_eq!(tracker.handle(&msg, t0()), Outcome::Excluded);
        assert!(tracker.table().is_empty());
    }

    #[test]
    fn test_excluded_static_reports_not_registered() {
        let registry = StaticShipRegistry::with_known_names([(211457860, "PILLAU")]);
        let mut tracker = tracker().with_registry(registry);

        for mmsi in [211457860, 211274960] {
            let report = StaticReport {
                message_type: 5,
                mmsi,
                name: "RENAMED@@@".to_string(),
                dim_a: 30,
                dim_b: 10,
                dim_c: 4,
                dim_d: 4,
                draught: 2.0,
                type_and_cargo: Some(60),
            };
            assert_eq!(
                tracker.handle(&DecodedMessage::Static(report), t0()),
                Outcome::Excluded
            );
        }

        assert_eq!(tracker.registry().get(211457860).unwrap().name, "PILLAU");
        assert!(tracker.registry().get(211274960).is_none());
        assert_eq!(tracker.registry().len(), 1);
    }

    #[test]
    fn test_handle_dispatch() {
        let mut tracker = tracker();
        let type2 = DecodedMessage::Position(PositionReport {
            message_type: 2,
            ..position(211000001, 9.80, 90.0, 5.0)
        });
        assert_eq!(tracker.handle(&type2, t0()), Outcome::Ignored);

        let other = DecodedMessage::Other {
            message_type: 4,
            mmsi: 2111234,
        };
        assert_eq!(tracker.handle(&other, t0()), Outcome::Ignored);
        assert!(tracker.table().is_empty());
    }

    #[test]
    fn test_unavailable_position_ignored() {
        let mut tracker = tracker();
        let mut report = position(211000001, 181.0, 90.0, 5.0);
        report.latitude = 91.0;
        assert_eq!(tracker.update(&report, t0()), Outcome::Ignored);
        assert!(tracker.table().is_empty());
    }

    #[test]
    fn test_eviction_threshold() {
        let mut tracker = tracker();
        let now = t0() + Duration::seconds(1000);
        tracker.update(&position(211000001, 9.80, 90.0, 5.0), now - Duration::seconds(359));
        tracker.update(&position(211000002, 9.80, 90.0, 5.0), now - Duration::seconds(361));
        tracker.update(&position(211000003, 9.80, 90.0, 5.0), now - Duration::seconds(360));

        assert_eq!(tracker.evict(now), 1);
        assert!(tracker.table().contains_key(&211000001));
        assert!(!tracker.table().contains_key(&211000002));
        assert!(tracker.table().contains_key(&211000003));
    }

    #[test]
    fn test_update_sweeps_stale_entries() {
        let mut tracker = tracker();
        tracker.update(&position(211000001, 9.80, 90.0, 5.0), t0());
        tracker.update(&position(211000002, 9.80, 90.0, 5.0), t0() + Duration::seconds(400));

        assert_eq!(tracker.table().len(), 1);
        assert!(tracker.table().contains_key(&211000002));
    }
}
