//! Scoring methods: placements (and raw performances) to points.
//!
//! Scoring is a pure transform. [`score`] returns a new dataset with every
//! recorded result's `points` filled in and never touches the input. All
//! methods work event by event, so a single event can be re-scored on its
//! own after a perturbation ([`score_event`]).

pub mod continuous;
pub mod performance;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::domain::Dataset;

pub use continuous::continuous_points;
pub use performance::{parse_performance, ParsedPerformance};

/// Method names accepted by [`ScoringMethod::from_name`].
pub const METHOD_NAMES: [&str; 5] = ["official", "linear", "normalized", "continuous", "decay"];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Wire shape of a scoring request: `{ method, k }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringRequest {
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub k: Option<f64>,
}

/// A validated scoring method.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ScoringRequest", into = "ScoringRequest")]
pub enum ScoringMethod {
    /// Lookup in the dataset's reference point scale.
    Official,
    /// `N - place + 1`.
    Linear,
    /// Linear divided by `N`.
    Normalized,
    /// Min-max normalized raw performance, 0-100.
    Continuous,
    /// `100 * e^(-k * (place - 1))`, rounded to 4 decimals.
    Decay { k: f64 },
}

impl ScoringMethod {
    /// Build a method from its name and optional decay constant.
    ///
    /// `k` is required for `decay` and ignored otherwise. It must be finite
    /// and non-negative; `k = 0` gives every place the same 100 points.
    pub fn from_name(name: &str, k: Option<f64>) -> Result<Self, ScoringError> {
        match name.trim() {
            "official" => Ok(Self::Official),
            "linear" => Ok(Self::Linear),
            "normalized" => Ok(Self::Normalized),
            "continuous" => Ok(Self::Continuous),
            "decay" => {
                let k = k.ok_or_else(|| {
                    ScoringError::InvalidConfiguration(
                        "decay scoring requires a decay constant k".into(),
                    )
                })?;
                Self::decay(k)
            }
            other => Err(ScoringError::InvalidConfiguration(format!(
                "unknown scoring method '{other}'. Valid: {}",
                METHOD_NAMES.join(", ")
            ))),
        }
    }

    pub fn decay(k: f64) -> Result<Self, ScoringError> {
        if !k.is_finite() || k < 0.0 {
            return Err(ScoringError::InvalidConfiguration(format!(
                "decay constant k must be a finite non-negative number, got {k}"
            )));
        }
        Ok(Self::Decay { k })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Official => "official",
            Self::Linear => "linear",
            Self::Normalized => "normalized",
            Self::Continuous => "continuous",
            Self::Decay { .. } => "decay",
        }
    }

    /// Display label: the method name, or `decay_k=<k>` for decay.
    pub fn label(&self) -> String {
        match self {
            Self::Decay { k } => format!("decay_k={}", format_k(*k)),
            other => other.name().to_string(),
        }
    }

    /// Points for a placement under a place-only method. `field_size` is the
    /// number of athletes placed in the event.
    ///
    /// Returns `None` for [`ScoringMethod::Continuous`], which needs the
    /// whole event's raw performances.
    pub fn place_points(
        &self,
        dataset: &Dataset,
        event: &str,
        place: u32,
        field_size: usize,
    ) -> Option<f64> {
        let n = field_size as f64;
        let p = f64::from(place);
        match self {
            Self::Official => Some(dataset.point_scale().points(event, place)),
            Self::Linear => Some(n - p + 1.0),
            Self::Normalized => Some((n - p + 1.0) / n),
            Self::Decay { k } => Some(round4(100.0 * (-k * (p - 1.0)).exp())),
            Self::Continuous => None,
        }
    }
}

impl fmt::Display for ScoringMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl TryFrom<ScoringRequest> for ScoringMethod {
    type Error = ScoringError;

    fn try_from(req: ScoringRequest) -> Result<Self, Self::Error> {
        Self::from_name(&req.method, req.k)
    }
}

impl From<ScoringMethod> for ScoringRequest {
    fn from(method: ScoringMethod) -> Self {
        let k = match method {
            ScoringMethod::Decay { k } => Some(k),
            _ => None,
        };
        Self {
            method: method.name().to_string(),
            k,
        }
    }
}

/// Score every event of `dataset` with `method`, returning a new dataset.
pub fn score(dataset: &Dataset, method: &ScoringMethod) -> Dataset {
    let mut scored = dataset.clone();
    for event in dataset.events() {
        score_event(&mut scored, event, method);
    }
    scored
}

/// Re-score a single event in place on an owned dataset.
pub fn score_event(dataset: &mut Dataset, event: &str, method: &ScoringMethod) {
    let updates: Vec<(usize, f64)> = match method {
        ScoringMethod::Continuous => continuous_points(dataset, event),
        _ => {
            let field_size = dataset.field_size(event);
            dataset
                .athletes()
                .iter()
                .enumerate()
                .filter_map(|(i, a)| {
                    let place = a.place_in(event)?;
                    method
                        .place_points(dataset, event, place, field_size)
                        .map(|p| (i, p))
                })
                .collect()
        }
    };

    let athletes = dataset.athletes_mut();
    for (i, points) in updates {
        if let Some(result) = athletes[i].results.get_mut(event) {
            result.points = Some(points);
        }
    }
}

fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

/// Render k with at least one decimal place (`1.0`, `0.05`, `1.25`).
fn format_k(k: f64) -> String {
    if k.fract() == 0.0 && k.abs() < 1e15 {
        format!("{k:.1}")
    } else {
        format!("{k}")
    }
}
