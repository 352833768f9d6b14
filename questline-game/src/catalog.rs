//! Stop catalog data model.
//!
//! The catalog is fetched once at startup and treated as immutable for the
//! rest of the session. Field names mirror the published `stops.json` shape,
//! so existing hunt data keeps loading unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::DEFAULT_GEOFENCE_RADIUS_M;

/// Requirement tags attached to a stop (the `type` field in catalog JSON).
///
/// Tags are matched by containment rather than exact equality, so legacy
/// spellings such as `"code+photo"` keep working. A stop may require a code,
/// a photo, both, or neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct RequirementTags(pub Vec<String>);

impl RequirementTags {
    /// Construct a tag set from string-like values.
    #[must_use]
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(tags.into_iter().map(Into::into).collect())
    }

    fn has(&self, needle: &str) -> bool {
        self.0.iter().any(|tag| tag.contains(needle))
    }

    /// Whether completing the stop demands the secret code.
    #[must_use]
    pub fn requires_code(&self) -> bool {
        self.has("code")
    }

    /// Whether completing the stop demands photo proof.
    #[must_use]
    pub fn requires_photo(&self) -> bool {
        self.has("photo")
    }
}

/// Expected proof for a stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    /// Secret code compared case-insensitively after trimming.
    #[serde(default)]
    pub code: Option<String>,
    /// Explicit `false` waives photo proof even when the stop is tagged
    /// `photo`.
    #[serde(default = "default_photo_required", rename = "photoRequired")]
    pub photo_required: bool,
}

impl Default for Answer {
    fn default() -> Self {
        Self {
            code: None,
            photo_required: true,
        }
    }
}

fn default_photo_required() -> bool {
    true
}

/// Advisory geofence around a stop. Displayed to the player, never enforced
/// at submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoRef {
    pub lat: f64,
    pub lng: f64,
    #[serde(default = "default_radius_m")]
    pub radius_m: f64,
}

fn default_radius_m() -> f64 {
    DEFAULT_GEOFENCE_RADIUS_M
}

/// One waypoint in the hunt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopDefinition {
    /// Unique id, also the key for hint tracking.
    pub id: String,
    #[serde(rename = "clueTitle")]
    pub clue_title: String,
    #[serde(rename = "clueText")]
    pub clue_text: String,
    /// Media shown with the clue; opaque to progression logic.
    #[serde(default)]
    pub assets: Vec<String>,
    #[serde(rename = "type", default)]
    pub kind: RequirementTags,
    #[serde(default)]
    pub answer: Option<Answer>,
    #[serde(default)]
    pub hint: Option<String>,
    /// Reward granted on successful completion.
    #[serde(default)]
    pub points: u32,
    /// Completion is blocked strictly before this instant.
    #[serde(rename = "notBefore", default)]
    pub not_before: Option<DateTime<Utc>>,
    #[serde(default)]
    pub geo: Option<GeoRef>,
}

impl StopDefinition {
    /// Expected code, trimmed and lowercased. `None` when the stop has no
    /// usable code configured; a stop tagged `code` without one can never be
    /// completed, which matches the deployed behavior.
    #[must_use]
    pub fn expected_code(&self) -> Option<String> {
        let code = self.answer.as_ref()?.code.as_deref()?.trim().to_lowercase();
        if code.is_empty() { None } else { Some(code) }
    }

    /// Whether an explicit `photoRequired: false` waives photo proof.
    #[must_use]
    pub fn photo_waived(&self) -> bool {
        self.answer.as_ref().is_some_and(|a| !a.photo_required)
    }
}

/// Ordered, immutable list of stops for one hunt instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct StopCatalog {
    stops: Vec<StopDefinition>,
}

/// Failure to obtain a usable catalog. Fatal for progression: with no stops
/// there is no valid current index.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog JSON is invalid: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog contains no stops")]
    Empty,
}

impl StopCatalog {
    /// Parse a catalog from its JSON representation.
    ///
    /// # Errors
    ///
    /// Returns an error when the JSON does not describe a list of stops.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let stops = serde_json::from_str(json)?;
        Ok(Self { stops })
    }

    /// Build a catalog from pre-parsed stops (useful for tests).
    #[must_use]
    pub fn from_stops(stops: Vec<StopDefinition>) -> Self {
        Self { stops }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&StopDefinition> {
        self.stops.get(index)
    }

    /// Index of the final stop. Zero for an empty catalog.
    #[must_use]
    pub fn last_index(&self) -> usize {
        self.stops.len().saturating_sub(1)
    }

    #[must_use]
    pub fn stops(&self) -> &[StopDefinition] {
        &self.stops
    }
}
