//! Read-only corridor view of the live ship table.
//!
//! The observation point sits on the Kiel Canal between Rendsburg (west)
//! and Kiel (east). Each tracked vessel is placed in exactly one of four
//! corridor groups:
//!
//! | direction      | status   | group            |
//! |----------------|----------|------------------|
//! | east -> west   | coming   | `from_kiel`      |
//! | east -> west   | other    | `to_rendsburg`   |
//! | west -> east   | coming   | `from_rendsburg` |
//! | west -> east   | other    | `to_kiel`        |
//!
//! Vessels of unknown direction are grouped with west -> east traffic.

use serde::Serialize;

use crate::model::{Direction, ShipSnapshot, Status};
use crate::tracker::LiveShipTable;

/// Corridor groups, each ordered by distance to the observer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CorridorView {
    pub from_kiel: Vec<ShipSnapshot>,
    pub to_kiel: Vec<ShipSnapshot>,
    pub from_rendsburg: Vec<ShipSnapshot>,
    pub to_rendsburg: Vec<ShipSnapshot>,
}

impl CorridorView {
    pub fn len(&self) -> usize {
        self.from_kiel.len() + self.to_kiel.len() + self.from_rendsburg.len() + self.to_rendsburg.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Builds corridor views without touching the table.
pub struct QueryService;

impl QueryService {
    /// Partition the table into the four corridor groups.
    pub fn corridors(table: &LiveShipTable) -> CorridorView {
        let mut view = CorridorView::default();

        for snapshot in table.values() {
            let group = match (snapshot.direction, snapshot.status) {
                (Direction::EastToWest, Status::Coming) => &mut view.from_kiel,
                (Direction::EastToWest, _) => &mut view.to_rendsburg,
                (_, Status::Coming) => &mut view.from_rendsburg,
                (_, _) => &mut view.to_kiel,
            };
            group.push(snapshot.clone());
        }

        for group in [
            &mut view.from_kiel,
            &mut view.to_kiel,
            &mut view.from_rendsburg,
            &mut view.to_rendsburg,
        ] {
            group.sort_by(|a, b| {
                a.distance_m
                    .total_cmp(&b.distance_m)
                    .then(a.mmsi.cmp(&b.mmsi))
            });
        }

        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn snapshot(mmsi: u32, direction: Direction, status: Status, distance_m: f64) -> ShipSnapshot {
        ShipSnapshot {
            mmsi,
            name: mmsi.to_string(),
            country: "Germany".to_string(),
            distance_m,
            speed_kmh: 10.0,
            direction,
            status,
            eta_seconds: distance_m / (10.0 / 3.6),
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            length: None,
            width: None,
            draught: None,
            ship_type: None,
        }
    }

    fn table(snapshots: Vec<ShipSnapshot>) -> LiveShipTable {
        snapshots.into_iter().map(|s| (s.mmsi, s)).collect()
    }

    fn ids(group: &[ShipSnapshot]) -> Vec<u32> {
        group.iter().map(|s| s.mmsi).collect()
    }

    #[test]
    fn test_corridor_partition() {
        let table = table(vec![
            snapshot(1, Direction::EastToWest, Status::Coming, 100.0),
            snapshot(2, Direction::EastToWest, Status::Leaving, 100.0),
            snapshot(3, Direction::WestToEast, Status::Coming, 100.0),
            snapshot(4, Direction::WestToEast, Status::Leaving, 100.0),
        ]);

        let view = QueryService::corridors(&table);
        assert_eq!(ids(&view.from_kiel), vec![1]);
        assert_eq!(ids(&view.to_rendsburg), vec![2]);
        assert_eq!(ids(&view.from_rendsburg), vec![3]);
        assert_eq!(ids(&view.to_kiel), vec![4]);
    }

    #[test]
    fn test_unknown_status_and_direction_grouping() {
        let table = table(vec![
            snapshot(1, Direction::EastToWest, Status::Unknown, 100.0),
            snapshot(2, Direction::Unknown, Status::Unknown, 100.0),
            snapshot(3, Direction::WestToEast, Status::Unknown, 100.0),
        ]);

        let view = QueryService::corridors(&table);
        assert_eq!(ids(&view.to_rendsburg), vec![1]);
        assert_eq!(ids(&view.to_kiel), vec![2, 3]);
        assert_eq!(view.len(), table.len());
    }

    #[test]
    fn test_groups_ordered_by_distance() {
        let table = table(vec![
            snapshot(7, Direction::EastToWest, Status::Coming, 3000.0),
            snapshot(8, Direction::EastToWest, Status::Coming, 500.0),
            snapshot(9, Direction::EastToWest, Status::Coming, 1200.0),
        ]);

        let view = QueryService::corridors(&table);
        assert_eq!(ids(&view.from_kiel), vec![8, 9, 7]);
    }

    #[test]
    fn test_serialized_shape() {
        let view = QueryService::corridors(&LiveShipTable::new());
        let json = serde_json::to_value(&view).unwrap();

        for key in ["from_kiel", "to_kiel", "from_rendsburg", "to_rendsburg"] {
            assert_eq!(json[key], serde_json::json!([]), "{}", key);
        }
        assert!(view.is_empty());
    }
}
