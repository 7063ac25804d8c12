//! Place -> points lookup tables for the official scoring method.
//!
//! Scales are keyed by integer place. Upstream data spells places as
//! ordinal strings (`"1st"`, `"22nd"`); [`parse_place_key`] converts those at
//! the loading boundary so nothing downstream touches strings.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 2024 official scale for fields of up to 40 athletes.
const SCALE_40: [u32; 40] = [
    100, 97, 94, 91, 88, 85, 82, 79, 76, 73, 70, 67, 64, 61, 58, 55, 52, 49, 46, 43, 40, 37, 34,
    32, 30, 28, 26, 24, 22, 20, 18, 16, 14, 12, 10, 8, 6, 4, 2, 0,
];

/// 2024 official scale for fields of up to 30 athletes.
const SCALE_30: [u32; 30] = [
    100, 96, 92, 88, 84, 80, 76, 72, 68, 64, 60, 56, 52, 48, 45, 42, 39, 36, 33, 30, 27, 24, 21,
    18, 15, 12, 9, 6, 3, 0,
];

/// 2024 official scale for fields of up to 20 athletes.
const SCALE_20: [u32; 20] = [
    100, 95, 90, 85, 80, 75, 70, 65, 60, 55, 50, 45, 40, 35, 30, 25, 20, 15, 10, 0,
];

/// 2024 official scale for fields of up to 10 athletes.
const SCALE_10: [u32; 10] = [100, 90, 80, 70, 60, 50, 40, 30, 20, 10];

/// Reference point scale: a default table plus optional per-event tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointScale {
    #[serde(default)]
    pub default: BTreeMap<u32, f64>,
    #[serde(default)]
    pub per_event: BTreeMap<String, BTreeMap<u32, f64>>,
}

impl PointScale {
    pub fn new(default: BTreeMap<u32, f64>) -> Self {
        Self {
            default,
            per_event: BTreeMap::new(),
        }
    }

    /// Build a scale from a points list where index 0 is first place.
    pub fn from_points(points: &[f64]) -> Self {
        let default = points
            .iter()
            .enumerate()
            .map(|(i, &p)| (i as u32 + 1, p))
            .collect();
        Self::new(default)
    }

    /// Official 2024 scale chosen by field size, truncated to `field_size` places.
    pub fn official_for_field(field_size: usize) -> Self {
        let column: &[u32] = match field_size {
            n if n >= 31 => &SCALE_40,
            n if n >= 21 => &SCALE_30,
            n if n >= 11 => &SCALE_20,
            _ => &SCALE_10,
        };
        let points: Vec<f64> = column
            .iter()
            .take(field_size)
            .map(|&p| f64::from(p))
            .collect();
        Self::from_points(&points)
    }

    pub fn with_event_scale(mut self, event: impl Into<String>, scale: BTreeMap<u32, f64>) -> Self {
        self.per_event.insert(event.into(), scale);
        self
    }

    /// Points for `place` in `event`. An event-specific table wins over the
    /// default; places outside the table score 0.
    pub fn points(&self, event: &str, place: u32) -> f64 {
        let table = self.per_event.get(event).unwrap_or(&self.default);
        table.get(&place).copied().unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.default.is_empty() && self.per_event.is_empty()
    }
}

/// Parse an ordinal place key such as `"1st"`, `"2nd"`, `"23rd"`, `"40th"`
/// (or a bare `"7"`) into an integer place. Returns `None` for anything else,
/// including place 0.
pub fn parse_place_key(key: &str) -> Option<u32> {
    let key = key.trim();
    let digits_end = key
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(key.len());
    let (digits, suffix) = key.split_at(digits_end);
    if !matches!(suffix, "" | "st" | "nd" | "rd" | "th") {
        return None;
    }
    digits.parse::<u32>().ok().filter(|&p| p > 0)
}
