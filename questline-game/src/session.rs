//! The stop-progression state machine.
//!
//! [`HuntSession`] owns the mutable [`HuntState`] and consults the read-only
//! [`StopCatalog`]. It performs no I/O: sensor samples and the current time
//! arrive as arguments, and callers persist the state after every call that
//! reports a mutation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{CatalogError, StopCatalog, StopDefinition};
use crate::constants::{FALLBACK_HINT, HINT_COST};
use crate::geo::{Coordinates, GeoCheck, check_geofence};
use crate::state::HuntState;

/// Player-provided proof handed to [`HuntSession::submit`]. Photo presence
/// is passed in rather than tracked, so the session holds no hidden state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubmitInput {
    pub code: Option<String>,
    pub has_photo: bool,
}

/// Why a join attempt was rejected. State is untouched in either case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    #[error("team name is empty")]
    EmptyName,
    #[error("this device already joined as {0}")]
    AlreadyJoined(String),
}

/// Result of a hint request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HintOutcome {
    /// Hint granted; the point cost has been applied.
    Granted { text: String },
    /// The hint for this stop was already consumed; nothing changed.
    AlreadyUsed,
}

/// Gate that blocked a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitBlockReason {
    TooEarly,
    CodeIncorrect,
    PhotoRequired,
}

/// Result of a submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitOutcome {
    Completed {
        /// False only when the final stop was completed in place.
        advanced: bool,
        new_index: usize,
        points_awarded: u32,
    },
    Blocked(SubmitBlockReason),
}

/// Why a GM skip did not advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipBlockReason {
    Unauthorized,
    FinalStop,
}

/// Result of a GM skip attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipOutcome {
    Skipped { new_index: usize },
    Blocked(SkipBlockReason),
}

/// One live hunt on one device: catalog plus mutable progression state.
#[derive(Debug, Clone)]
pub struct HuntSession {
    catalog: StopCatalog,
    state: HuntState,
}

impl HuntSession {
    /// Build a session over a loaded catalog, clamping any restored index
    /// into bounds.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Empty` when the catalog has no stops; there is
    /// no valid current index without at least one.
    pub fn new(catalog: StopCatalog, mut state: HuntState) -> Result<Self, CatalogError> {
        if catalog.is_empty() {
            return Err(CatalogError::Empty);
        }
        state.clamp_to(catalog.len());
        Ok(Self { catalog, state })
    }

    #[must_use]
    pub fn state(&self) -> &HuntState {
        &self.state
    }

    #[must_use]
    pub fn into_state(self) -> HuntState {
        self.state
    }

    #[must_use]
    pub fn catalog(&self) -> &StopCatalog {
        &self.catalog
    }

    /// The stop the team is currently working on.
    ///
    /// # Panics
    ///
    /// Never panics: the index is clamped at construction and only advanced
    /// within bounds.
    #[must_use]
    pub fn current_stop(&self) -> &StopDefinition {
        self.catalog
            .get(self.state.current_stop_index)
            .expect("index clamped into catalog bounds")
    }

    /// `"3 / 7"` style progress label for display.
    #[must_use]
    pub fn progress_label(&self) -> String {
        format!(
            "{} / {}",
            self.state.current_stop_index + 1,
            self.catalog.len()
        )
    }

    /// Register the team name, trimming surrounding whitespace. Joining
    /// again with the same name is a no-op; the team is otherwise immutable
    /// for the session.
    ///
    /// # Errors
    ///
    /// Returns an error for a blank name or a conflicting re-join. No state
    /// changes on failure.
    pub fn join(&mut self, name: &str) -> Result<(), JoinError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(JoinError::EmptyName);
        }
        if self.state.has_joined() {
            if self.state.team == trimmed {
                return Ok(());
            }
            return Err(JoinError::AlreadyJoined(self.state.team.clone()));
        }
        self.state.team = trimmed.to_string();
        Ok(())
    }

    /// Grant the current stop's hint, charging the point cost exactly once
    /// per stop id. Points floor at zero rather than going negative.
    pub fn request_hint(&mut self) -> HintOutcome {
        let (id, hint) = {
            let stop = self.current_stop();
            (stop.id.clone(), stop.hint.clone())
        };
        if self.state.used_hints.contains(&id) {
            return HintOutcome::AlreadyUsed;
        }
        self.state.used_hints.insert(id);
        self.state.points = self.state.points.saturating_sub(HINT_COST);
        HintOutcome::Granted {
            text: hint.unwrap_or_else(|| FALLBACK_HINT.to_string()),
        }
    }

    /// Attempt to complete the current stop.
    ///
    /// Gates are evaluated in strict order (time, code, photo) and the first
    /// failure wins with no state change. On success the stop's points are
    /// awarded and the index advances by exactly one, staying put on the
    /// final stop.
    ///
    /// The geofence is deliberately absent here: proximity is advisory and
    /// shown to the player, never enforced.
    pub fn submit(&mut self, input: &SubmitInput, now: DateTime<Utc>) -> SubmitOutcome {
        let stop = self.current_stop();

        if let Some(gate) = stop.not_before {
            if now < gate {
                return SubmitOutcome::Blocked(SubmitBlockReason::TooEarly);
            }
        }

        if stop.kind.requires_code() {
            let provided = input.code.as_deref().unwrap_or("").trim().to_lowercase();
            match stop.expected_code() {
                Some(expected) if provided == expected => {}
                // No usable code configured means the stop cannot be
                // completed; that is the deployed behavior, kept on purpose.
                _ => return SubmitOutcome::Blocked(SubmitBlockReason::CodeIncorrect),
            }
        }

        if stop.kind.requires_photo() && !input.has_photo && !stop.photo_waived() {
            return SubmitOutcome::Blocked(SubmitBlockReason::PhotoRequired);
        }

        let points_awarded = stop.points;
        self.state.points = self.state.points.saturating_add(points_awarded);
        let advanced = self.state.current_stop_index < self.catalog.last_index();
        if advanced {
            self.state.current_stop_index += 1;
        }
        SubmitOutcome::Completed {
            advanced,
            new_index: self.state.current_stop_index,
            points_awarded,
        }
    }

    /// Force-advance past the current stop, bypassing every gate and
    /// awarding no points. Authorization is decided entirely by the caller;
    /// the session holds no secret.
    pub fn gm_skip(&mut self, is_authorized_gm: bool) -> SkipOutcome {
        if !is_authorized_gm {
            return SkipOutcome::Blocked(SkipBlockReason::Unauthorized);
        }
        if self.state.current_stop_index >= self.catalog.last_index() {
            return SkipOutcome::Blocked(SkipBlockReason::FinalStop);
        }
        self.state.current_stop_index += 1;
        SkipOutcome::Skipped {
            new_index: self.state.current_stop_index,
        }
    }

    /// Advisory proximity report against the current stop's geofence.
    /// `None` when the stop has no coordinates configured.
    #[must_use]
    pub fn check_geofence(&self, position: Coordinates) -> Option<GeoCheck> {
        self.current_stop()
            .geo
            .as_ref()
            .map(|geo| check_geofence(geo, position))
    }
}
