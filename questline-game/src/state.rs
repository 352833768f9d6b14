//! Mutable per-device hunt state.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Everything a device remembers about its hunt in progress.
///
/// Constructed from persisted values at session start and written back after
/// every mutation. `points` cannot go negative (unsigned, saturating math)
/// and `current_stop_index` only ever moves forward within catalog bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HuntState {
    /// Team name; empty means the device has not joined yet.
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub points: u32,
    #[serde(default)]
    pub current_stop_index: usize,
    /// Stop ids whose hint has already been granted this session.
    #[serde(default)]
    pub used_hints: HashSet<String>,
}

impl HuntState {
    #[must_use]
    pub fn has_joined(&self) -> bool {
        !self.team.is_empty()
    }

    /// Clamp a restored index into catalog bounds. Persisted state can point
    /// past the end when the catalog shrank between sessions.
    pub fn clamp_to(&mut self, catalog_len: usize) {
        if catalog_len > 0 && self.current_stop_index >= catalog_len {
            self.current_stop_index = catalog_len - 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_has_defaults() {
        let state = HuntState::default();
        assert!(!state.has_joined());
        assert_eq!(state.points, 0);
        assert_eq!(state.current_stop_index, 0);
        assert!(state.used_hints.is_empty());
    }

    #[test]
    fn clamp_pulls_out_of_range_index_back() {
        let mut state = HuntState {
            current_stop_index: 9,
            ..HuntState::default()
        };
        state.clamp_to(4);
        assert_eq!(state.current_stop_index, 3);

        state.clamp_to(4);
        assert_eq!(state.current_stop_index, 3);
    }

    #[test]
    fn state_round_trips_through_json() {
        let mut state = HuntState {
            team: "Team A".to_string(),
            points: 25,
            current_stop_index: 2,
            ..HuntState::default()
        };
        state.used_hints.insert("s1".to_string());

        let json = serde_json::to_string(&state).unwrap();
        let restored: HuntState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);
    }
}
