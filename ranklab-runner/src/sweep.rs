//! Sweep driver — one fragility analysis per scoring configuration.
//!
//! Output order is request order. The driver never deduplicates or sorts
//! configurations; [`SweepResults::sorted_by_fragility`] is a view for
//! presentation only.

use std::collections::HashMap;

use thiserror::Error;
use tracing::info;

use ranklab_core::{Dataset, ScoringMethod};

use crate::config::{ConfigError, SweepConfig};
use crate::fragility::{AnalysisError, FragilityAnalyzer, FragilityReport, FragilitySummary};

/// Errors from a sweep run.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("analysis error: {0}")]
    Analysis(#[from] AnalysisError),
}

/// Sweep executor.
#[derive(Debug, Clone)]
pub struct FragilitySweep {
    parallel: bool,
}

impl Default for FragilitySweep {
    fn default() -> Self {
        Self::new()
    }
}

impl FragilitySweep {
    pub fn new() -> Self {
        Self { parallel: true }
    }

    /// Enables or disables parallel trials inside each analysis.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Analyze `dataset` once per method, in order.
    pub fn sweep(
        &self,
        dataset: &Dataset,
        methods: &[ScoringMethod],
    ) -> Result<SweepResults, AnalysisError> {
        self.sweep_with_progress(dataset, methods, |_, _, _| {})
    }

    /// Executes a sweep with progress reporting.
    ///
    /// The callback is invoked after each analysis completes with:
    /// - Current index (0-based)
    /// - Total number of configurations
    /// - The completed report
    pub fn sweep_with_progress<F>(
        &self,
        dataset: &Dataset,
        methods: &[ScoringMethod],
        progress_callback: F,
    ) -> Result<SweepResults, AnalysisError>
    where
        F: Fn(usize, usize, &FragilityReport),
    {
        let total = methods.len();
        info!(
            configurations = total,
            athletes = dataset.athlete_count(),
            events = dataset.event_count(),
            "starting fragility sweep"
        );

        let mut reports = Vec::with_capacity(total);
        for (idx, method) in methods.iter().enumerate() {
            let report = FragilityAnalyzer::new(*method)
                .with_parallelism(self.parallel)
                .analyze(dataset)?;
            progress_callback(idx, total, &report);
            reports.push(report);
        }

        Ok(SweepResults::new(reports))
    }
}

/// Validate `config`, then sweep. Nothing runs if any entry is invalid.
pub fn run_sweep(dataset: &Dataset, config: &SweepConfig) -> Result<SweepResults, SweepError> {
    let plan = config.plan()?;
    let results = FragilitySweep::new()
        .with_parallelism(config.parallel)
        .sweep(dataset, &plan)?;
    Ok(results)
}

/// Results from a sweep, in request order.
#[derive(Debug, Clone)]
pub struct SweepResults {
    reports: Vec<FragilityReport>,
    by_label: HashMap<String, usize>,
}

impl SweepResults {
    fn new(reports: Vec<FragilityReport>) -> Self {
        let mut by_label = HashMap::with_capacity(reports.len());
        for (i, r) in reports.iter().enumerate() {
            by_label.entry(r.summary.method_label.clone()).or_insert(i);
        }
        Self { reports, by_label }
    }

    /// Returns all reports as a slice.
    pub fn all(&self) -> &[FragilityReport] {
        &self.reports
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Gets a report by method label (`"official"`, `"decay_k=0.5"`).
    ///
    /// If a label was requested twice, the first run is returned.
    pub fn get(&self, label: &str) -> Option<&FragilityReport> {
        self.by_label.get(label).map(|&i| &self.reports[i])
    }

    /// One summary per configuration, in request order.
    pub fn summaries(&self) -> Vec<FragilitySummary> {
        self.reports.iter().map(|r| r.summary.clone()).collect()
    }

    /// Reports ordered from least to most fragile (ties keep request order).
    pub fn sorted_by_fragility(&self) -> Vec<&FragilityReport> {
        let mut sorted: Vec<_> = self.reports.iter().collect();
        sorted.sort_by(|a, b| {
            a.summary
                .fragility_index
                .total_cmp(&b.summary.fragility_index)
        });
        sorted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ranklab_core::{Athlete, EventResult, PointScale};

    fn small_dataset() -> Dataset {
        let rows: [(&str, [u32; 3]); 4] = [
            ("Alex", [1, 1, 1]),
            ("Blair", [2, 3, 3]),
            ("Casey", [3, 4, 2]),
            ("Cameron", [4, 2, 4]),
        ];
        let events = vec!["E1".to_string(), "E2".to_string(), "E3".to_string()];
        let athletes = rows
            .iter()
            .map(|(name, places)| {
                places
                    .iter()
                    .zip(&events)
                    .fold(Athlete::new(*name), |a, (&p, ev)| {
                        a.with_result(ev.clone(), EventResult::new(p))
                    })
            })
            .collect();
        Dataset::new(events, athletes, PointScale::official_for_field(4)).unwrap()
    }

    #[test]
    fn sweep_keeps_request_order() {
        let methods = vec![
            ScoringMethod::Decay { k: 1.0 },
            ScoringMethod::Official,
            ScoringMethod::Decay { k: 0.1 },
        ];
        let results = FragilitySweep::new()
            .sweep(&small_dataset(), &methods)
            .unwrap();
        let labels: Vec<String> = results
            .summaries()
            .into_iter()
            .map(|s| s.method_label)
            .collect();
        assert_eq!(labels, vec!["decay_k=1.0", "official", "decay_k=0.1"]);
        assert!(results.get("official").is_some());
        assert!(results.get("linear").is_none());
    }

    #[test]
    fn progress_reports_every_configuration() {
        use std::cell::RefCell;
        let seen = RefCell::new(Vec::new());
        let methods = vec![ScoringMethod::Linear, ScoringMethod::Normalized];
        FragilitySweep::new()
            .with_parallelism(false)
            .sweep_with_progress(&small_dataset(), &methods, |i, total, r| {
                seen.borrow_mut().push((i, total, r.summary.method_label.clone()));
            })
            .unwrap();
        assert_eq!(
            seen.into_inner(),
            vec![(0, 2, "linear".to_string()), (1, 2, "normalized".to_string())]
        );
    }

    #[test]
    fn invalid_config_runs_nothing() {
        let config = SweepConfig {
            methods: vec!["linear".into(), "bogus".into()],
            ..SweepConfig::default()
        };
        assert!(matches!(
            run_sweep(&small_dataset(), &config),
            Err(SweepError::Config(_))
        ));
    }

    #[test]
    fn empty_dataset_fails_sweep() {
        let ds = Dataset::new(vec![], vec![], PointScale::default()).unwrap();
        let err = run_sweep(&ds, &SweepConfig::default()).unwrap_err();
        assert!(matches!(err, SweepError::Analysis(_)));
    }

    #[test]
    fn sorted_view_does_not_reorder_results() {
        let methods = vec![ScoringMethod::Linear, ScoringMethod::Decay { k: 0.0 }];
        let results = FragilitySweep::new()
            .sweep(&small_dataset(), &methods)
            .unwrap();
        let sorted = results.sorted_by_fragility();
        assert_eq!(sorted[0].summary.fragility_index, 0.0);
        assert_eq!(results.all()[0].summary.method_label, "linear");
    }
}
