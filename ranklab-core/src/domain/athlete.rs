//! Athletes and their per-event results.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One athlete's outcome in one event.
///
/// `place` is always defined for a recorded result. `points` is `None` until
/// a scoring pass has produced a copy of the dataset with points filled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventResult {
    pub place: u32,
    /// Raw performance as recorded: a time (`"4:32.10"`), a load (`"265 lb"`),
    /// a capped result (`"CAP+6"`) or a rep count.
    #[serde(default, rename = "time", skip_serializing_if = "Option::is_none")]
    pub raw_performance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<f64>,
}

impl EventResult {
    pub fn new(place: u32) -> Self {
        Self {
            place,
            raw_performance: None,
            points: None,
        }
    }

    pub fn with_raw(place: u32, raw: impl Into<String>) -> Self {
        Self {
            place,
            raw_performance: Some(raw.into()),
            points: None,
        }
    }
}

/// A competitor. Events the athlete did not compete in have no entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Athlete {
    pub name: String,
    #[serde(default)]
    pub results: BTreeMap<String, EventResult>,
}

impl Athlete {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            results: BTreeMap::new(),
        }
    }

    /// Builder-style helper used by fixtures and loaders.
    pub fn with_result(mut self, event: impl Into<String>, result: EventResult) -> Self {
        self.results.insert(event.into(), result);
        self
    }

    pub fn result(&self, event: &str) -> Option<&EventResult> {
        self.results.get(event)
    }

    pub fn place_in(&self, event: &str) -> Option<u32> {
        self.results.get(event).map(|r| r.place)
    }

    /// Points for `event`; unscored or missing events count as zero.
    pub fn points_in(&self, event: &str) -> f64 {
        self.results
            .get(event)
            .and_then(|r| r.points)
            .unwrap_or(0.0)
    }
}
