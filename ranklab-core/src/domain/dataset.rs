//! The competition snapshot: ordered events, athletes and the reference scale.
//!
//! A `Dataset` is never mutated in place by the engine. Scoring and
//! perturbation produce new datasets. The parts no trial ever changes (event
//! order, point scale, name index) sit behind `Arc`, so a per-trial copy only
//! duplicates the athlete records.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;

use super::athlete::Athlete;
use super::point_scale::PointScale;

/// Structural problems detected while assembling a dataset.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DatasetError {
    #[error("duplicate athlete name '{0}'")]
    DuplicateAthlete(String),
    #[error("duplicate event '{0}'")]
    DuplicateEvent(String),
    #[error("athlete '{athlete}' has place 0 in event '{event}' (places start at 1)")]
    InvalidPlace { athlete: String, event: String },
    #[error("athlete '{athlete}' has a result for unknown event '{event}'")]
    UnknownEvent { athlete: String, event: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct DatasetSnapshot {
    events: Vec<String>,
    athletes: Vec<Athlete>,
    #[serde(default)]
    point_scale: PointScale,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "DatasetSnapshot", into = "DatasetSnapshot")]
pub struct Dataset {
    events: Arc<Vec<String>>,
    point_scale: Arc<PointScale>,
    index: Arc<HashMap<String, usize>>,
    athletes: Vec<Athlete>,
}

impl Dataset {
    pub fn new(
        events: Vec<String>,
        athletes: Vec<Athlete>,
        point_scale: PointScale,
    ) -> Result<Self, DatasetError> {
        let mut seen = HashSet::with_capacity(events.len());
        for event in &events {
            if !seen.insert(event.as_str()) {
                return Err(DatasetError::DuplicateEvent(event.clone()));
            }
        }

        let mut index = HashMap::with_capacity(athletes.len());
        for (i, athlete) in athletes.iter().enumerate() {
            if index.insert(athlete.name.clone(), i).is_some() {
                return Err(DatasetError::DuplicateAthlete(athlete.name.clone()));
            }
            for (event, result) in &athlete.results {
                if !seen.contains(event.as_str()) {
                    return Err(DatasetError::UnknownEvent {
                        athlete: athlete.name.clone(),
                        event: event.clone(),
                    });
                }
                if result.place == 0 {
                    return Err(DatasetError::InvalidPlace {
                        athlete: athlete.name.clone(),
                        event: event.clone(),
                    });
                }
            }
        }

        Ok(Self {
            events: Arc::new(events),
            point_scale: Arc::new(point_scale),
            index: Arc::new(index),
            athletes,
        })
    }

    pub(crate) fn athletes_mut(&mut self) -> &mut [Athlete] {
        &mut self.athletes
    }

    pub fn events(&self) -> &[String] {
        &self.events
    }

    pub fn athletes(&self) -> &[Athlete] {
        &self.athletes
    }

    pub fn point_scale(&self) -> &PointScale {
        &self.point_scale
    }

    pub fn athlete_count(&self) -> usize {
        self.athletes.len()
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    pub fn athlete_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn athlete(&self, name: &str) -> Option<&Athlete> {
        self.athlete_index(name).map(|i| &self.athletes[i])
    }

    pub fn has_event(&self, event: &str) -> bool {
        self.events.iter().any(|e| e == event)
    }

    /// Athletes with a placement in `event`, best first. Ties on place (out
    /// of scope for real data) fall back to name order so the result is
    /// always deterministic.
    pub fn competitors(&self, event: &str) -> Vec<(usize, u32)> {
        let mut field: Vec<(usize, u32)> = self
            .athletes
            .iter()
            .enumerate()
            .filter_map(|(i, a)| a.place_in(event).map(|p| (i, p)))
            .collect();
        field.sort_by(|a, b| {
            a.1.cmp(&b.1)
                .then_with(|| self.athletes[a.0].name.cmp(&self.athletes[b.0].name))
        });
        field
    }

    /// Number of athletes with a placement in `event`.
    pub fn field_size(&self, event: &str) -> usize {
        self.athletes
            .iter()
            .filter(|a| a.results.contains_key(event))
            .count()
    }

    /// Content hash (BLAKE3 over canonical JSON) for provenance in exports.
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::to_vec(self)?;
        Ok(blake3::hash(&json).to_hex().to_string())
    }
}

impl PartialEq for Dataset {
    fn eq(&self, other: &Self) -> bool {
        self.events == other.events
            && self.point_scale == other.point_scale
            && self.athletes == other.athletes
    }
}

impl TryFrom<DatasetSnapshot> for Dataset {
    type Error = DatasetError;

    fn try_from(s: DatasetSnapshot) -> Result<Self, Self::Error> {
        Dataset::new(s.events, s.athletes, s.point_scale)
    }
}

impl From<Dataset> for DatasetSnapshot {
    fn from(d: Dataset) -> Self {
        Self {
            events: d.events.as_ref().clone(),
            athletes: d.athletes,
            point_scale: d.point_scale.as_ref().clone(),
        }
    }
}
