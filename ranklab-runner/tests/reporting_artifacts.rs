use std::path::PathBuf;

use ranklab_runner::{
    load_dataset, load_manifest, run_sweep, save_artifacts, SweepConfig, SCHEMA_VERSION, TOP_TIER,
};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn sweep_artifacts_are_written_and_readable() {
    let ds = load_dataset(&fixture("open_2024_sample.json")).unwrap();
    let config = SweepConfig::from_file(&fixture("sweep_small.toml")).unwrap();
    let results = run_sweep(&ds, &config).unwrap();
    assert_eq!(results.len(), 4);

    let out = tempfile::tempdir().unwrap();
    let dir = save_artifacts(&results, &ds.fingerprint().unwrap(), out.path()).unwrap();

    let manifest = load_manifest(&dir).unwrap();
    assert_eq!(manifest.schema_version, SCHEMA_VERSION);
    assert_eq!(manifest.dataset_fingerprint, ds.fingerprint().unwrap());
    assert_eq!(
        manifest.configurations,
        vec!["official", "linear", "decay_k=0.1", "decay_k=1.0"]
    );

    let csv = std::fs::read_to_string(dir.join("fragility_sweep.csv")).unwrap();
    let rows: Vec<&str> = csv.lines().collect();
    assert_eq!(rows[0], "method,top1,top1_pts,total,top10,FI");
    assert_eq!(rows.len(), 5);
    assert!(rows[1].starts_with("official,Ava Lindqvist,282.0000,"));

    let json = std::fs::read_to_string(dir.join("fragility_sweep.json")).unwrap();
    let summaries: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(summaries.as_array().unwrap().len(), 4);

    for stem in ["official", "linear", "decay_k_0.1", "decay_k_1.0"] {
        let path = dir.join("displacements").join(format!("{stem}.json"));
        let body = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert!(parsed.is_array(), "{} is not a JSON array", path.display());
        for record in parsed.as_array().unwrap() {
            let changes = record["changes"].as_array().unwrap();
            assert_eq!(record["ripple_count"], changes.len());
        }

        let path = dir.join("displacements").join(format!("{stem}_top10.json"));
        let body = std::fs::read_to_string(&path).unwrap();
        let top: serde_json::Value = serde_json::from_str(&body).unwrap();
        for record in top.as_array().unwrap() {
            let top_changes = record["top10_changes"].as_array().unwrap();
            assert!(!top_changes.is_empty());
            assert_eq!(record["top10_ripple_count"], top_changes.len());
            assert!(top_changes.len() <= record["ripple_count"].as_u64().unwrap() as usize);
            for c in top_changes {
                let old = c["old_rank"].as_u64().unwrap();
                let new = c["new_rank"].as_u64().unwrap();
                assert!(old.min(new) <= TOP_TIER as u64);
            }
        }
    }

    // With six athletes every displacement reaches the top tier.
    let official = results.get("official").unwrap();
    let top: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(dir.join("displacements").join("official_top10.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(
        top.as_array().unwrap().len(),
        official.summary.top10_displacements
    );
    assert_eq!(
        official.summary.top10_displacements,
        official.summary.total_displacements
    );
}

#[test]
fn missing_manifest_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_manifest(dir.path()).is_err());
}
