//! Dataset loading from the leaderboard JSON snapshot.
//!
//! The snapshot is the converter's output:
//!
//! ```json
//! {
//!   "events": ["Event 1", "Event 2"],
//!   "point_system": {"1st": 100, "2nd": 97},
//!   "official_event_point_map_2024": {"Event 1": {"1st": 100}},
//!   "athletes": [
//!     {"name": "...", "events": {"Event 1": {"place": 3, "time": "4:32.10", "points": 94}, "Event 2": null}}
//!   ]
//! }
//! ```
//!
//! Scale resolution: `point_system` is the default table; per-event tables
//! come from `official_event_point_map_2024`, falling back to
//! `event_point_map`. With no scale at all, the official table for the
//! largest field is used. Ordinal place keys are parsed here and nowhere
//! else. Observed `points` are ignored; every analysis re-scores.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use ranklab_core::domain::parse_place_key;
use ranklab_core::{Athlete, Dataset, DatasetError, EventResult, PointScale};

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("malformed dataset JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid place key '{key}' in point scale '{scale}'")]
    InvalidPlaceKey { scale: String, key: String },

    #[error("invalid dataset: {0}")]
    Dataset(#[from] DatasetError),
}

type RawScale = BTreeMap<String, f64>;

#[derive(Debug, Deserialize)]
struct RawSnapshot {
    events: Vec<String>,
    #[serde(default)]
    point_system: Option<RawScale>,
    #[serde(default)]
    event_point_map: BTreeMap<String, RawScale>,
    #[serde(default)]
    official_event_point_map_2024: BTreeMap<String, RawScale>,
    athletes: Vec<RawAthlete>,
}

#[derive(Debug, Deserialize)]
struct RawAthlete {
    name: String,
    #[serde(default)]
    events: BTreeMap<String, Option<RawResult>>,
}

#[derive(Debug, Deserialize)]
struct RawResult {
    place: u32,
    #[serde(default)]
    time: Option<serde_json::Value>,
}

/// Load a dataset snapshot from a JSON file.
pub fn load_dataset(path: &Path) -> Result<Dataset, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let dataset = parse_dataset(&content)?;
    debug!(
        path = %path.display(),
        athletes = dataset.athlete_count(),
        events = dataset.event_count(),
        "loaded dataset"
    );
    Ok(dataset)
}

/// Parse a dataset snapshot from a JSON string.
pub fn parse_dataset(json: &str) -> Result<Dataset, LoadError> {
    let raw: RawSnapshot = serde_json::from_str(json)?;

    let mut athletes = Vec::with_capacity(raw.athletes.len());
    for ra in raw.athletes {
        let mut athlete = Athlete::new(ra.name);
        for (event, result) in ra.events {
            // `null` means the athlete did not compete.
            let Some(result) = result else { continue };
            if !raw.events.contains(&event) {
                warn!(athlete = %athlete.name, event = %event, "dropping result for unlisted event");
                continue;
            }
            let raw_performance = result.time.and_then(performance_text);
            athlete.results.insert(
                event,
                EventResult {
                    place: result.place,
                    raw_performance,
                    points: None,
                },
            );
        }
        athletes.push(athlete);
    }

    let largest_field = raw
        .events
        .iter()
        .map(|e| athletes.iter().filter(|a| a.results.contains_key(e)).count())
        .max()
        .unwrap_or(0);

    let scale = resolve_scale(
        raw.point_system,
        raw.official_event_point_map_2024,
        raw.event_point_map,
        largest_field,
    )?;

    Ok(Dataset::new(raw.events, athletes, scale)?)
}

fn resolve_scale(
    default: Option<RawScale>,
    official: BTreeMap<String, RawScale>,
    observed: BTreeMap<String, RawScale>,
    largest_field: usize,
) -> Result<PointScale, LoadError> {
    let per_event_raw = if official.is_empty() { observed } else { official };

    if default.is_none() && per_event_raw.is_empty() {
        warn!(
            field = largest_field,
            "dataset carries no point scale; using the official table for its field size"
        );
        return Ok(PointScale::official_for_field(largest_field));
    }

    let mut scale = match default {
        Some(table) => PointScale::new(parse_scale("point_system", table)?),
        None => PointScale::default(),
    };
    for (event, table) in per_event_raw {
        let parsed = parse_scale(&event, table)?;
        scale = scale.with_event_scale(event, parsed);
    }
    Ok(scale)
}

fn parse_scale(name: &str, table: RawScale) -> Result<BTreeMap<u32, f64>, LoadError> {
    table
        .into_iter()
        .map(|(key, points)| {
            parse_place_key(&key)
                .map(|place| (place, points))
                .ok_or_else(|| LoadError::InvalidPlaceKey {
                    scale: name.to_string(),
                    key,
                })
        })
        .collect()
}

fn performance_text(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
