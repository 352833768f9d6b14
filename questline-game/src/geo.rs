//! Geofence math and sensor error classification.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::GeoRef;
use crate::constants::EARTH_RADIUS_M;

/// A sampled device position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Advisory proximity report for a stop's geofence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCheck {
    pub distance_m: f64,
    pub within_range: bool,
}

/// Classified failure from the location sampler. These reach the player as
/// display text; they never gate submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SensorError {
    #[error("location is not available on this device")]
    Unavailable,
    #[error("location permission was denied")]
    PermissionDenied,
    #[error("timed out waiting for a location fix")]
    Timeout,
}

/// Great-circle distance between two points in meters, via the Haversine
/// formula over a mean Earth radius of 6 371 000 m.
#[must_use]
pub fn distance_meters(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Check a position against a stop's geofence.
#[must_use]
pub fn check_geofence(geo: &GeoRef, position: Coordinates) -> GeoCheck {
    let target = Coordinates {
        lat: geo.lat,
        lng: geo.lng,
    };
    let distance_m = distance_meters(position, target);
    GeoCheck {
        distance_m,
        within_range: distance_m <= geo.radius_m,
    }
}
