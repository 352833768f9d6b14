//! Shape checks over the catalog the web build actually ships.

use chrono::{TimeZone, Utc};
use questline_game::StopCatalog;

fn shipped_catalog() -> StopCatalog {
    StopCatalog::from_json(include_str!(
        "../../questline-web/static/assets/data/stops.json"
    ))
    .unwrap()
}

#[test]
fn shipped_catalog_has_expected_stops() {
    let catalog = shipped_catalog();
    assert_eq!(catalog.len(), 4);

    let ids: Vec<&str> = catalog.stops().iter().map(|s| s.id.as_str()).collect();
    assert_eq!(
        ids,
        ["plaza-fountain", "old-bridge", "clock-tower", "sunset-lookout"]
    );
}

#[test]
fn shipped_requirements_cover_every_gate_kind() {
    let catalog = shipped_catalog();

    let fountain = catalog.get(0).unwrap();
    assert!(fountain.kind.requires_code());
    assert!(!fountain.kind.requires_photo());
    assert_eq!(fountain.expected_code().as_deref(), Some("marlow"));

    let bridge = catalog.get(1).unwrap();
    assert!(bridge.kind.requires_photo());
    // radius_m falls back to the 150 m default when absent.
    let radius = bridge.geo.as_ref().unwrap().radius_m;
    assert!((radius - 150.0).abs() < f64::EPSILON);

    let tower = catalog.get(2).unwrap();
    assert!(tower.kind.requires_code() && tower.kind.requires_photo());

    let lookout = catalog.get(3).unwrap();
    assert!(lookout.photo_waived());
    assert_eq!(
        lookout.not_before,
        Some(Utc.with_ymd_and_hms(2025, 6, 1, 18, 0, 0).unwrap())
    );
}

#[test]
fn shipped_points_total_matches_design() {
    let total: u32 = shipped_catalog().stops().iter().map(|s| s.points).sum();
    assert_eq!(total, 50);
}
