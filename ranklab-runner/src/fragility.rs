//! Fragility analysis — how often a one-place swap reshuffles bystanders.
//!
//! For a scoring method, every (athlete, event, direction) trial swaps the
//! athlete with its neighbour in that event, re-scores, re-ranks, and compares
//! against the baseline leaderboard. A trial where the mover keeps its rank
//! but somebody else's rank changes is a displacement event. The Fragility
//! Index is the share of the full trial space (athletes x events x 2) that
//! produced one.
//!
//! Trials are independent: each owns its perturbed copy, which is dropped as
//! soon as the copy's standings exist. They run on the rayon pool unless
//! parallelism is disabled; either way the output is in trial order.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use ranklab_core::{
    perturb, rank, score, swap_partner, Dataset, Direction, ScoringMethod, Standings,
};

/// Displacements that touch ranks at or above this cutoff count as top-tier.
pub const TOP_TIER: usize = 10;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// One athlete's rank before and after a trial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankChange {
    pub athlete: String,
    pub old_rank: usize,
    pub new_rank: usize,
}

impl RankChange {
    pub fn touches_top(&self, cutoff: usize) -> bool {
        self.old_rank <= cutoff || self.new_rank <= cutoff
    }
}

/// A trial where the mover kept its rank and others did not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplacementEvent {
    pub athlete: String,
    pub event: String,
    pub direction: Direction,
    /// Every athlete whose rank differs from baseline, in baseline rank order.
    pub changes: Vec<RankChange>,
}

impl DisplacementEvent {
    pub fn ripple_count(&self) -> usize {
        self.changes.len()
    }

    pub fn touches_top(&self, cutoff: usize) -> bool {
        self.changes.iter().any(|c| c.touches_top(cutoff))
    }

    /// Only the changes that involve the top `cutoff` ranks.
    pub fn top_changes(&self, cutoff: usize) -> impl Iterator<Item = &RankChange> {
        self.changes.iter().filter(move |c| c.touches_top(cutoff))
    }
}

/// Headline numbers for one scoring configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FragilitySummary {
    pub method_label: String,
    pub leader_name: String,
    pub leader_points: f64,
    pub total_displacements: usize,
    pub top10_displacements: usize,
    pub fragility_index: f64,
}

/// Trial bookkeeping alongside the summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialStats {
    /// Size of the trial space: athletes x events x 2.
    pub trial_space: usize,
    /// Perturbations actually applied.
    pub trials_run: usize,
    /// Boundary moves and missing placements (no trial).
    pub boundary_skips: usize,
    /// Trials where the mover's rank changed *and* someone other than the
    /// mover and its swap partner changed rank too. Not part of the index.
    pub coupled_ripples: usize,
}

/// Full output of one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FragilityReport {
    pub method: ScoringMethod,
    pub summary: FragilitySummary,
    pub stats: TrialStats,
    pub displacements: Vec<DisplacementEvent>,
}

impl FragilityReport {
    /// Displacement events that touch the top tier.
    pub fn top_tier(&self) -> impl Iterator<Item = &DisplacementEvent> {
        self.displacements.iter().filter(|d| d.touches_top(TOP_TIER))
    }
}

enum TrialOutcome {
    Skipped,
    Quiet,
    MoverShifted { coupled: bool },
    Displacement(DisplacementEvent),
}

/// Runs the perturbation trials for one scoring method.
#[derive(Debug, Clone)]
pub struct FragilityAnalyzer {
    method: ScoringMethod,
    parallel: bool,
}

impl FragilityAnalyzer {
    pub fn new(method: ScoringMethod) -> Self {
        Self {
            method,
            parallel: true,
        }
    }

    /// Enables or disables parallel trial execution.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn method(&self) -> &ScoringMethod {
        &self.method
    }

    /// Analyze `dataset` (unscored or scored; it is re-scored with this
    /// analyzer's method first).
    ///
    /// Fails with `InvalidConfiguration` for a dataset with no athletes or
    /// no events, before any trial runs.
    pub fn analyze(&self, dataset: &Dataset) -> Result<FragilityReport, AnalysisError> {
        let athletes = dataset.athlete_count();
        let events = dataset.event_count();
        if athletes == 0 || events == 0 {
            return Err(AnalysisError::InvalidConfiguration(format!(
                "fragility needs at least one athlete and one event (got {athletes} athletes, {events} events)"
            )));
        }

        let label = self.method.label();
        let scored = score(dataset, &self.method);
        let baseline = rank(&scored);

        let trials: Vec<(usize, usize, Direction)> = (0..athletes)
            .flat_map(|a| {
                (0..events).flat_map(move |e| Direction::ALL.into_iter().map(move |d| (a, e, d)))
            })
            .collect();
        debug!(method = %label, trials = trials.len(), parallel = self.parallel, "running perturbation trials");

        let outcomes: Vec<TrialOutcome> = if self.parallel {
            trials
                .par_iter()
                .map(|&(a, e, d)| self.run_trial(&scored, &baseline, a, e, d))
                .collect()
        } else {
            trials
                .iter()
                .map(|&(a, e, d)| self.run_trial(&scored, &baseline, a, e, d))
                .collect()
        };

        let mut stats = TrialStats {
            trial_space: trials.len(),
            ..TrialStats::default()
        };
        let mut displacements = Vec::new();
        for outcome in outcomes {
            match outcome {
                TrialOutcome::Skipped => stats.boundary_skips += 1,
                TrialOutcome::Quiet => stats.trials_run += 1,
                TrialOutcome::MoverShifted { coupled } => {
                    stats.trials_run += 1;
                    if coupled {
                        stats.coupled_ripples += 1;
                    }
                }
                TrialOutcome::Displacement(d) => {
                    stats.trials_run += 1;
                    displacements.push(d);
                }
            }
        }

        let top10 = displacements
            .iter()
            .filter(|d| d.touches_top(TOP_TIER))
            .count();
        let fragility_index = displacements.len() as f64 / stats.trial_space as f64;

        // Non-empty by the guard above.
        let leader = baseline.entries().first();
        let summary = FragilitySummary {
            method_label: label,
            leader_name: leader.map(|e| e.name.clone()).unwrap_or_default(),
            leader_points: leader.map(|e| e.total).unwrap_or_default(),
            total_displacements: displacements.len(),
            top10_displacements: top10,
            fragility_index,
        };

        info!(
            method = %summary.method_label,
            leader = %summary.leader_name,
            displacements = summary.total_displacements,
            top10 = summary.top10_displacements,
            fi = summary.fragility_index,
            "fragility analysis complete"
        );

        Ok(FragilityReport {
            method: self.method,
            summary,
            stats,
            displacements,
        })
    }

    fn run_trial(
        &self,
        scored: &Dataset,
        baseline: &Standings,
        athlete: usize,
        event: usize,
        direction: Direction,
    ) -> TrialOutcome {
        let name = &scored.athletes()[athlete].name;
        let event_name = &scored.events()[event];

        let standings = match perturb(scored, name, event_name, direction, &self.method) {
            Some(perturbed) => rank(&perturbed),
            None => return TrialOutcome::Skipped,
        };

        let changes: Vec<RankChange> = baseline
            .entries()
            .iter()
            .enumerate()
            .filter_map(|(i, entry)| {
                let old_rank = i + 1;
                let new_rank = standings.rank_of(&entry.name)?;
                (old_rank != new_rank).then(|| RankChange {
                    athlete: entry.name.clone(),
                    old_rank,
                    new_rank,
                })
            })
            .collect();

        if changes.is_empty() {
            return TrialOutcome::Quiet;
        }

        if baseline.rank_of(name) != standings.rank_of(name) {
            let partner = swap_partner(scored, name, event_name, direction)
                .map(|i| scored.athletes()[i].name.as_str());
            let coupled = changes
                .iter()
                .any(|c| &c.athlete != name && Some(c.athlete.as_str()) != partner);
            return TrialOutcome::MoverShifted { coupled };
        }

        TrialOutcome::Displacement(DisplacementEvent {
            athlete: name.clone(),
            event: event_name.clone(),
            direction,
            changes,
        })
    }
}
