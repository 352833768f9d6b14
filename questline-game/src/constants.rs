//! Centralized tuning constants for Questline progression logic.
//!
//! Keeping them together ensures that game balance can only be adjusted via
//! code changes reviewed in version control, rather than through external
//! JSON assets.

/// Points deducted the first time a hint is granted at a stop.
pub(crate) const HINT_COST: u32 = 5;

/// Geofence radius applied when a stop does not configure one, in meters.
pub(crate) const DEFAULT_GEOFENCE_RADIUS_M: f64 = 150.0;

/// Mean Earth radius used by the Haversine distance, in meters.
pub(crate) const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Shown when a hint is granted but the stop has no hint text configured.
pub(crate) const FALLBACK_HINT: &str = "No hint available for this stop.";
