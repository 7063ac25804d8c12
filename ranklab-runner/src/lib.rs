//! RankLab Runner — fragility analysis, sweeps, loading, export.
//!
//! This crate builds on `ranklab-core` to provide:
//! - Dataset loading from the leaderboard JSON snapshot
//! - The fragility analyzer (serial or rayon-parallel trials)
//! - Sweeps over scoring configurations, driven by a TOML config
//! - CSV/JSON artifact export with a fingerprinted manifest

pub mod config;
pub mod data_loader;
pub mod export;
pub mod fragility;
pub mod sweep;

pub use config::{ConfigError, SweepConfig, DEFAULT_DECAY_KS, DEFAULT_METHODS};
pub use data_loader::{load_dataset, parse_dataset, LoadError};
pub use export::{
    export_displacements_json, export_summaries_csv, export_summaries_json, export_top_tier_json,
    load_manifest, save_artifacts, SweepManifest, SCHEMA_VERSION,
};
pub use fragility::{
    AnalysisError, DisplacementEvent, FragilityAnalyzer, FragilityReport, FragilitySummary,
    RankChange, TrialStats, TOP_TIER,
};
pub use sweep::{run_sweep, FragilitySweep, SweepError, SweepResults};
