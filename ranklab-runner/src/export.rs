//! Reporting and export — CSV and JSON sweep artifacts.
//!
//! - **CSV**: one summary row per configuration, for spreadsheets
//! - **JSON**: summaries, per-configuration displacement lists, and the
//!   top-tier subset of each list
//!
//! Persisted manifests carry a `schema_version`. Unknown versions are
//! rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use ranklab_core::Direction;

use crate::fragility::{DisplacementEvent, FragilityReport, FragilitySummary, RankChange, TOP_TIER};
use crate::sweep::SweepResults;

/// Version of the artifact layout written by [`save_artifacts`].
pub const SCHEMA_VERSION: u32 = 1;

/// Top-level record written to `manifest.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepManifest {
    pub schema_version: u32,
    pub dataset_fingerprint: String,
    pub generated_at: String,
    /// Method labels in request order.
    pub configurations: Vec<String>,
}

/// Exported form of one displacement event.
#[derive(Debug, Serialize)]
struct DisplacementRecord<'a> {
    athlete: &'a str,
    event: &'a str,
    direction: Direction,
    ripple_count: usize,
    changes: &'a [RankChange],
}

impl<'a> From<&'a DisplacementEvent> for DisplacementRecord<'a> {
    fn from(d: &'a DisplacementEvent) -> Self {
        Self {
            athlete: &d.athlete,
            event: &d.event,
            direction: d.direction,
            ripple_count: d.ripple_count(),
            changes: &d.changes,
        }
    }
}

/// A displacement that reaches the top tier, with the top-tier changes split out.
#[derive(Debug, Serialize)]
struct TopTierRecord<'a> {
    #[serde(flatten)]
    displacement: DisplacementRecord<'a>,
    top10_ripple_count: usize,
    top10_changes: Vec<&'a RankChange>,
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Export sweep summaries as CSV.
///
/// Columns: method, top1, top1_pts, total, top10, FI
pub fn export_summaries_csv(summaries: &[FragilitySummary]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["method", "top1", "top1_pts", "total", "top10", "FI"])?;

    for s in summaries {
        wtr.write_record([
            &s.method_label,
            &s.leader_name,
            &format!("{:.4}", s.leader_points),
            &s.total_displacements.to_string(),
            &s.top10_displacements.to_string(),
            &format!("{:.4}", s.fragility_index),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── JSON export ────────────────────────────────────────────────────

pub fn export_summaries_json(summaries: &[FragilitySummary]) -> Result<String> {
    serde_json::to_string_pretty(summaries).context("failed to serialize summaries to JSON")
}

/// Every displacement event, each with its `ripple_count`.
pub fn export_displacements_json(displacements: &[DisplacementEvent]) -> Result<String> {
    let records: Vec<DisplacementRecord<'_>> = displacements.iter().map(Into::into).collect();
    serde_json::to_string_pretty(&records)
        .context("failed to serialize displacement events to JSON")
}

/// Displacement events touching the top tier, with `top10_changes` and
/// `top10_ripple_count` alongside the full change list.
pub fn export_top_tier_json(report: &FragilityReport) -> Result<String> {
    let records: Vec<TopTierRecord<'_>> = report
        .top_tier()
        .map(|d| {
            let top10_changes: Vec<&RankChange> = d.top_changes(TOP_TIER).collect();
            TopTierRecord {
                displacement: d.into(),
                top10_ripple_count: top10_changes.len(),
                top10_changes,
            }
        })
        .collect();
    serde_json::to_string_pretty(&records)
        .context("failed to serialize top-tier displacement events to JSON")
}

/// Read a manifest, rejecting unknown schema versions.
pub fn import_manifest(json: &str) -> Result<SweepManifest> {
    let manifest: SweepManifest =
        serde_json::from_str(json).context("failed to deserialize sweep manifest")?;
    if manifest.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            manifest.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(manifest)
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the artifact set for a sweep.
///
/// Creates `sweep_{timestamp}/` under `output_dir` containing:
/// - `manifest.json` — schema version, dataset fingerprint, labels
/// - `fragility_sweep.csv` — one summary row per configuration
/// - `fragility_sweep.json` — the same summaries as JSON
/// - `displacements/{label}.json` — every displacement event per configuration
/// - `displacements/{label}_top10.json` — the events that reach the top tier
///
/// Returns the path to the created directory.
pub fn save_artifacts(
    results: &SweepResults,
    dataset_fingerprint: &str,
    output_dir: &Path,
) -> Result<PathBuf> {
    let now = chrono::Local::now();
    let run_dir = output_dir.join(format!("sweep_{}", now.format("%Y%m%d_%H%M%S")));
    let disp_dir = run_dir.join("displacements");
    std::fs::create_dir_all(&disp_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    let summaries = results.summaries();

    let manifest = SweepManifest {
        schema_version: SCHEMA_VERSION,
        dataset_fingerprint: dataset_fingerprint.to_string(),
        generated_at: now.to_rfc3339(),
        configurations: summaries.iter().map(|s| s.method_label.clone()).collect(),
    };
    let json = serde_json::to_string_pretty(&manifest).context("failed to serialize manifest")?;
    write_file(&run_dir.join("manifest.json"), &json)?;

    write_file(
        &run_dir.join("fragility_sweep.csv"),
        &export_summaries_csv(&summaries)?,
    )?;
    write_file(
        &run_dir.join("fragility_sweep.json"),
        &export_summaries_json(&summaries)?,
    )?;

    for report in results.all() {
        let stem = file_stem(&report.summary.method_label);
        write_file(
            &disp_dir.join(format!("{stem}.json")),
            &export_displacements_json(&report.displacements)?,
        )?;
        write_file(
            &disp_dir.join(format!("{stem}_top10.json")),
            &export_top_tier_json(report)?,
        )?;
    }

    info!(dir = %run_dir.display(), configurations = results.len(), "saved sweep artifacts");
    Ok(run_dir)
}

/// Load the manifest from an artifact directory.
pub fn load_manifest(dir: &Path) -> Result<SweepManifest> {
    let path = dir.join("manifest.json");
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_manifest(&json)
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

/// `decay_k=0.5` -> `decay_k_0.5`
fn file_stem(label: &str) -> String {
    label
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
