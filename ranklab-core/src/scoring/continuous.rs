//! Continuous scoring: min-max normalized raw performance, 0-100 per event.

use super::performance::{parse_performance, ParsedPerformance};
use crate::domain::Dataset;

/// Points awarded to every parseable result when an event has no spread.
pub const FLAT_FIELD_POINTS: f64 = 100.0;

/// Continuous points for every athlete with a result in `event`, as
/// `(athlete index, points)` pairs. Unparseable results score 0.
pub fn continuous_points(dataset: &Dataset, event: &str) -> Vec<(usize, f64)> {
    let parsed: Vec<(usize, Option<ParsedPerformance>)> = dataset
        .athletes()
        .iter()
        .enumerate()
        .filter_map(|(i, a)| {
            a.result(event)
                .map(|r| (i, parse_performance(event, r.raw_performance.as_deref())))
        })
        .collect();

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for p in parsed.iter().filter_map(|(_, p)| *p) {
        min = min.min(p.value);
        max = max.max(p.value);
    }

    parsed
        .into_iter()
        .map(|(i, p)| {
            let points = match p {
                None => 0.0,
                Some(_) if max <= min => FLAT_FIELD_POINTS,
                Some(p) if p.lower_is_better => (max - p.value) / (max - min) * 100.0,
                Some(p) => (p.value - min) / (max - min) * 100.0,
            };
            (i, points)
        })
        .collect()
}
