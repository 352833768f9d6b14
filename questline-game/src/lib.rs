//! Questline Progression Engine
//!
//! Platform-agnostic core logic for the Questline browser scavenger hunt.
//! This crate provides the stop-progression rules without UI or
//! platform-specific dependencies: rendering, sensor sampling, and storage
//! all live behind traits implemented by the calling layer.

pub mod catalog;
pub mod constants;
pub mod geo;
pub mod persist;
pub mod session;
pub mod state;

// Re-export commonly used types
pub use catalog::{Answer, CatalogError, GeoRef, RequirementTags, StopCatalog, StopDefinition};
pub use geo::{Coordinates, GeoCheck, SensorError, check_geofence, distance_meters};
pub use persist::{
    KEY_HINTS, KEY_POINTS, KEY_STOP, KEY_TEAM, KeyValueStore, load_state, save_state,
};
pub use session::{
    HintOutcome, HuntSession, JoinError, SkipBlockReason, SkipOutcome, SubmitBlockReason,
    SubmitInput, SubmitOutcome,
};
pub use state::HuntState;

/// Trait for abstracting catalog loading operations.
/// Platform-specific implementations should provide this.
pub trait CatalogLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the stop catalog from the platform-specific source.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded or parsed.
    fn load_catalog(&self) -> Result<StopCatalog, Self::Error>;
}

/// Engine facade pairing a catalog source with flat storage.
pub struct HuntEngine<L, S>
where
    L: CatalogLoader,
    S: KeyValueStore,
{
    loader: L,
    storage: S,
}

impl<L, S> HuntEngine<L, S>
where
    L: CatalogLoader,
    S: KeyValueStore,
{
    /// Create a new engine with the provided catalog loader and storage.
    pub const fn new(loader: L, storage: S) -> Self {
        Self { loader, storage }
    }

    /// Load the catalog and restore persisted state into a live session.
    ///
    /// # Errors
    ///
    /// Fails when the catalog cannot be loaded, parses to zero stops, or the
    /// persisted snapshot cannot be read.
    pub fn create_session(&self) -> Result<HuntSession, anyhow::Error>
    where
        L::Error: Into<anyhow::Error>,
        S::Error: Into<anyhow::Error>,
    {
        let catalog = self.loader.load_catalog().map_err(Into::into)?;
        let state = persist::load_state(&self.storage).map_err(Into::into)?;
        HuntSession::new(catalog, state).map_err(anyhow::Error::from)
    }

    /// Persist the session's state as one four-key snapshot. Callers invoke
    /// this after every operation that reports a mutation.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    pub fn save_session(&self, session: &HuntSession) -> Result<(), S::Error> {
        persist::save_state(&self.storage, session.state())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::convert::Infallible;

    #[derive(Clone, Copy)]
    struct FixtureLoader(&'static str);

    impl CatalogLoader for FixtureLoader {
        type Error = CatalogError;

        fn load_catalog(&self) -> Result<StopCatalog, Self::Error> {
            StopCatalog::from_json(self.0)
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        values: RefCell<HashMap<String, String>>,
    }

    impl KeyValueStore for MemoryStore {
        type Error = Infallible;

        fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
            Ok(self.values.borrow().get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
            self.values
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    const TWO_STOPS: &str = r#"[
        {"id": "s1", "clueTitle": "Fountain", "clueText": "Find it",
         "type": ["code"], "answer": {"code": "fox"}, "points": 10},
        {"id": "s2", "clueTitle": "Bridge", "clueText": "Cross it"}
    ]"#;

    #[test]
    fn engine_creates_and_round_trips_session() {
        let engine = HuntEngine::new(FixtureLoader(TWO_STOPS), MemoryStore::default());
        let mut session = engine.create_session().unwrap();

        session.join("Team A").unwrap();
        let outcome = session.submit(
            &SubmitInput {
                code: Some("FOX".to_string()),
                has_photo: false,
            },
            Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
        );
        assert!(matches!(outcome, SubmitOutcome::Completed { .. }));
        engine.save_session(&session).unwrap();

        let restored = engine.create_session().unwrap();
        assert_eq!(restored.state().team, "Team A");
        assert_eq!(restored.state().points, 10);
        assert_eq!(restored.state().current_stop_index, 1);
    }

    #[test]
    fn engine_rejects_empty_catalog() {
        let engine = HuntEngine::new(FixtureLoader("[]"), MemoryStore::default());
        let err = engine.create_session().unwrap_err();
        assert!(err.to_string().contains("no stops"));
    }
}
