//! Web-side collaborators for the Questline engine.
//!
//! This crate provides the browser implementations of the engine's traits:
//! a localStorage-backed key-value store, a catalog loader over the embedded
//! static asset, and the launch-time GM flag parser. DOM rendering and the
//! service worker live outside this crate.

use questline_game::{CatalogLoader, HuntEngine, KeyValueStore, StopCatalog};
use wasm_bindgen::JsValue;

/// Catalog loader over the embedded static asset.
pub struct WebCatalogLoader;

#[derive(Debug, thiserror::Error)]
pub enum WebCatalogError {
    #[error("embedded catalog failed to parse: {0}")]
    Catalog(#[from] questline_game::CatalogError),
}

impl CatalogLoader for WebCatalogLoader {
    type Error = WebCatalogError;

    fn load_catalog(&self) -> Result<StopCatalog, Self::Error> {
        let json = include_str!("../static/assets/data/stops.json");
        StopCatalog::from_json(json).map_err(WebCatalogError::Catalog)
    }
}

/// localStorage store for the legacy `tq_*` keys.
///
/// Values go through the raw string API on purpose: the deployed game never
/// JSON-quoted the team name, and typed wrappers would break those existing
/// entries.
pub struct WebKeyValueStore;

#[derive(Debug, thiserror::Error)]
pub enum WebStorageError {
    #[error("localStorage is unavailable: {0}")]
    Unavailable(String),
    #[error("localStorage rejected the write: {0}")]
    WriteRejected(String),
}

impl KeyValueStore for WebKeyValueStore {
    type Error = WebStorageError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        local_storage()?
            .get_item(key)
            .map_err(|err| WebStorageError::Unavailable(describe(&err)))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        local_storage()?.set_item(key, value).map_err(|err| {
            // Quota exhaustion or private-mode restrictions end up here.
            let detail = describe(&err);
            log::warn!("failed to persist {key}: {detail}");
            WebStorageError::WriteRejected(detail)
        })
    }
}

fn local_storage() -> Result<web_sys::Storage, WebStorageError> {
    web_sys::window()
        .ok_or_else(|| WebStorageError::Unavailable("no window".to_string()))?
        .local_storage()
        .map_err(|err| WebStorageError::Unavailable(describe(&err)))?
        .ok_or_else(|| WebStorageError::Unavailable("storage disabled".to_string()))
}

fn describe(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

/// Whether the launch URL carries the GM flag.
///
/// The engine itself never inspects the URL; the calling layer derives this
/// boolean once and hands it to `gm_skip`. Accepted spellings: `?gm=1`,
/// `?gm=true`, or a bare `?gm`. This is a UI convenience, not access
/// control.
#[must_use]
pub fn gm_flag_from_query(query: &str) -> bool {
    query.trim_start_matches('?').split('&').any(|pair| {
        let mut parts = pair.splitn(2, '=');
        let key = parts.next().unwrap_or("");
        let value = parts.next();
        key == "gm" && matches!(value, None | Some("1") | Some("true"))
    })
}

/// Engine wired to the embedded catalog and localStorage.
#[must_use]
pub fn create_web_engine() -> HuntEngine<WebCatalogLoader, WebKeyValueStore> {
    HuntEngine::new(WebCatalogLoader, WebKeyValueStore)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use questline_game::{HuntSession, HuntState, SubmitBlockReason, SubmitInput, SubmitOutcome};

    #[test]
    fn embedded_catalog_parses_and_is_playable() {
        let catalog = WebCatalogLoader.load_catalog().unwrap();
        assert!(!catalog.is_empty());

        let mut session = HuntSession::new(catalog, HuntState::default()).unwrap();
        session.join("Smoke Test").unwrap();

        // First shipped stop is the code stop.
        let outcome = session.submit(
            &SubmitInput {
                code: Some(" MARLOW ".to_string()),
                has_photo: false,
            },
            Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
        );
        assert!(matches!(outcome, SubmitOutcome::Completed { .. }));
    }

    #[test]
    fn shipped_time_gate_blocks_before_evening() {
        let catalog = WebCatalogLoader.load_catalog().unwrap();
        let last = catalog.last_index();
        let state = HuntState {
            current_stop_index: last,
            ..HuntState::default()
        };
        let mut session = HuntSession::new(catalog, state).unwrap();

        let afternoon = Utc.with_ymd_and_hms(2025, 6, 1, 15, 0, 0).unwrap();
        let outcome = session.submit(&SubmitInput::default(), afternoon);
        assert_eq!(outcome, SubmitOutcome::Blocked(SubmitBlockReason::TooEarly));

        // Photo is explicitly waived on the lookout stop.
        let evening = Utc.with_ymd_and_hms(2025, 6, 1, 18, 0, 0).unwrap();
        let outcome = session.submit(&SubmitInput::default(), evening);
        assert!(matches!(outcome, SubmitOutcome::Completed { .. }));
    }

    #[test]
    fn gm_flag_spellings() {
        assert!(gm_flag_from_query("?gm=1"));
        assert!(gm_flag_from_query("?gm=true"));
        assert!(gm_flag_from_query("?gm"));
        assert!(gm_flag_from_query("?team=a&gm=1"));

        assert!(!gm_flag_from_query(""));
        assert!(!gm_flag_from_query("?gm=0"));
        assert!(!gm_flag_from_query("?gmx=1"));
        assert!(!gm_flag_from_query("?team=gm"));
    }
}
