//! Overall standings: per-athlete totals in a total, deterministic order.
//!
//! Totals are summed in the dataset's event order so the floating point sum
//! is identical on every run. Sort key is `(-total, name)`; `f64::total_cmp`
//! keeps the order total even for odd values.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::Dataset;

/// Athlete name -> 1-based overall rank.
pub type RankMap = HashMap<String, usize>;

/// One row of the overall leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingEntry {
    pub name: String,
    pub total: f64,
}

/// The derived leaderboard plus its rank lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct Standings {
    entries: Vec<StandingEntry>,
    ranks: RankMap,
}

impl Standings {
    pub fn entries(&self) -> &[StandingEntry] {
        &self.entries
    }

    pub fn ranks(&self) -> &RankMap {
        &self.ranks
    }

    pub fn rank_of(&self, name: &str) -> Option<usize> {
        self.ranks.get(name).copied()
    }

    pub fn leader(&self) -> Option<&StandingEntry> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Top `n` rows (fewer if the field is smaller).
    pub fn top(&self, n: usize) -> &[StandingEntry] {
        &self.entries[..n.min(self.entries.len())]
    }
}

/// Build the leaderboard for a scored dataset.
pub fn rank(dataset: &Dataset) -> Standings {
    let events = dataset.events();
    let mut entries: Vec<StandingEntry> = dataset
        .athletes()
        .iter()
        .map(|a| StandingEntry {
            name: a.name.clone(),
            total: events.iter().map(|e| a.points_in(e)).sum(),
        })
        .collect();

    entries.sort_by(|a, b| b.total.total_cmp(&a.total).then_with(|| a.name.cmp(&b.name)));

    let ranks = entries
        .iter()
        .enumerate()
        .map(|(i, e)| (e.name.clone(), i + 1))
        .collect();

    Standings { entries, ranks }
}
