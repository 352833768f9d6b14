//! Four-key snapshot persistence in the legacy on-device format.
//!
//! The deployed game stored its state as four flat localStorage values. The
//! codec here keeps that exact wire shape so progress on existing devices
//! survives the engine swap: the team name is stored raw, the two counters
//! as decimal strings, and the used-hint set as a JSON object of
//! `id -> true`.
//!
//! There is a single writer per device; multi-tab races against shared
//! storage are a known, accepted limitation.

use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::state::HuntState;

pub const KEY_TEAM: &str = "tq_team";
pub const KEY_POINTS: &str = "tq_points";
pub const KEY_STOP: &str = "tq_stop";
pub const KEY_HINTS: &str = "tq_hints";

/// Abstract flat key-value storage (localStorage in the browser build).
/// Platform-specific implementations should provide this.
pub trait KeyValueStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read a stored value.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying storage cannot be reached.
    fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Write a value.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying storage rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error>;
}

/// Write all four keys as one logical snapshot.
///
/// # Errors
///
/// Returns the first storage error encountered; a partially written snapshot
/// is repaired by the next successful save.
pub fn save_state<S: KeyValueStore>(store: &S, state: &HuntState) -> Result<(), S::Error> {
    store.set(KEY_TEAM, &state.team)?;
    store.set(KEY_POINTS, &state.points.to_string())?;
    store.set(KEY_STOP, &state.current_stop_index.to_string())?;
    store.set(KEY_HINTS, &encode_hints(&state.used_hints))?;
    Ok(())
}

/// Restore a snapshot, treating missing or unparseable values as the
/// fresh-session defaults.
///
/// # Errors
///
/// Returns an error only when the underlying storage cannot be read at all;
/// corrupt individual values degrade to defaults instead.
pub fn load_state<S: KeyValueStore>(store: &S) -> Result<HuntState, S::Error> {
    let team = store.get(KEY_TEAM)?.unwrap_or_default();
    let points = store
        .get(KEY_POINTS)?
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(0);
    let current_stop_index = store
        .get(KEY_STOP)?
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(0);
    let used_hints = store
        .get(KEY_HINTS)?
        .map(|raw| decode_hints(&raw))
        .unwrap_or_default();
    Ok(HuntState {
        team,
        points,
        current_stop_index,
        used_hints,
    })
}

fn encode_hints(used: &HashSet<String>) -> String {
    let map: Map<String, Value> = used
        .iter()
        .map(|id| (id.clone(), Value::Bool(true)))
        .collect();
    Value::Object(map).to_string()
}

fn decode_hints(raw: &str) -> HashSet<String> {
    match serde_json::from_str::<Map<String, Value>>(raw) {
        Ok(map) => map
            .into_iter()
            .filter(|(_, used)| used.as_bool() == Some(true))
            .map(|(id, _)| id)
            .collect(),
        Err(_) => HashSet::new(),
    }
}
