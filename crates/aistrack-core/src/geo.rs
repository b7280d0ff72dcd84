//! Great-circle geometry on a spherical earth.
//!
//! Positions are plain latitude/longitude pairs in decimal degrees.

use serde::{Deserialize, Serialize};

/// Mean earth radius used by the great-circle formula, in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Great-circle distance between two positions, in meters.
///
/// Haversine formulation.
pub fn distance(p1: Coordinate, p2: Coordinate) -> f64 {
    let lat1 = p1.latitude.to_radians();
    let lat2 = p2.latitude.to_radians();
    let delta_lat = (p2.latitude - p1.latitude).to_radians();
    let delta_lon = (p2.longitude - p1.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_M * c
}

/// Initial bearing from `p1` towards `p2`, in degrees within `[0, 360)`.
pub fn bearing(p1: Coordinate, p2: Coordinate) -> f64 {
    let lat1 = p1.latitude.to_radians();
    let lat2 = p2.latitude.to_radians();
    let delta_lon = (p2.longitude - p1.longitude).to_radians();

    let y = delta_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lon.cos();

    let mut degrees = y.atan2(x).to_degrees();
    if degrees < 0.0 {
        degrees += 360.0;
    }
    // tiny negative angles round up to exactly 360.0
    if degrees >= 360.0 {
        degrees -= 360.0;
    }
    degrees
}
