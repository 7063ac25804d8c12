use std::path::PathBuf;

use ranklab_core::{rank, score, ScoringMethod};
use ranklab_runner::{load_dataset, FragilityAnalyzer, LoadError};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn fixture_loads_with_declared_events_and_scale() {
    let ds = load_dataset(&fixture("open_2024_sample.json")).unwrap();
    assert_eq!(ds.athlete_count(), 6);
    assert_eq!(ds.event_count(), 3);
    assert_eq!(ds.field_size("Event 1"), 5);
    assert_eq!(ds.field_size("Back Squat"), 6);
    assert_eq!(ds.point_scale().points("Event 2", 4), 84.0);
}

#[test]
fn official_rescore_reproduces_observed_totals() {
    let ds = load_dataset(&fixture("open_2024_sample.json")).unwrap();
    let standings = rank(&score(&ds, &ScoringMethod::Official));
    let order: Vec<(&str, f64)> = standings
        .entries()
        .iter()
        .map(|e| (e.name.as_str(), e.total))
        .collect();
    assert_eq!(
        order,
        vec![
            ("Ava Lindqvist", 282.0),
            ("Cleo Park", 278.0),
            ("Bea Moreno", 274.0),
            ("Dana Okafor", 256.0),
            ("Eli Santos", 248.0),
            ("Fay Ito", 152.0),
        ]
    );
}

#[test]
fn trial_accounting_on_fixture() {
    let ds = load_dataset(&fixture("open_2024_sample.json")).unwrap();
    let report = FragilityAnalyzer::new(ScoringMethod::Official)
        .analyze(&ds)
        .unwrap();
    // 6 athletes x 3 events x 2 directions.
    assert_eq!(report.stats.trial_space, 36);
    // One edge per end of each event, plus both directions for Fay's missing Event 1.
    assert_eq!(report.stats.boundary_skips, 8);
    assert_eq!(report.stats.trials_run, 28);
    assert_eq!(
        report.summary.fragility_index,
        report.summary.total_displacements as f64 / 36.0
    );
}

#[test]
fn continuous_scores_follow_raw_performance() {
    let ds = load_dataset(&fixture("open_2024_sample.json")).unwrap();
    let scored = score(&ds, &ScoringMethod::Continuous);

    let squat = |name: &str| scored.athlete(name).unwrap().points_in("Back Squat");
    assert_eq!(squat("Cleo Park"), 100.0);
    assert_eq!(squat("Fay Ito"), 0.0);
    assert!(squat("Ava Lindqvist") > squat("Dana Okafor"));

    // DNF sorts behind every capped score.
    let e1 = |name: &str| scored.athlete(name).unwrap().points_in("Event 1");
    assert_eq!(e1("Eli Santos"), 0.0);
    assert_eq!(e1("Fay Ito"), 0.0);
}

#[test]
fn snapshot_in_tempdir_round_trips_through_loader() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tiny.json");
    std::fs::write(
        &path,
        r#"{"events": ["E1"], "point_system": {"1": 50, "2nd": 25},
            "athletes": [{"name": "A", "events": {"E1": {"place": 2}}},
                         {"name": "B", "events": {"E1": {"place": 1}}}]}"#,
    )
    .unwrap();
    let ds = load_dataset(&path).unwrap();
    let standings = rank(&score(&ds, &ScoringMethod::Official));
    assert_eq!(standings.leader().unwrap().name, "B");
    assert_eq!(standings.leader().unwrap().total, 50.0);
}

#[test]
fn missing_fixture_is_reported() {
    let err = load_dataset(&fixture("does_not_exist.json")).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
    assert!(err.to_string().contains("does_not_exist.json"));
}
