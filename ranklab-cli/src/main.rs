//! RankLab CLI — leaderboard, fragility analysis, and sweep commands.
//!
//! Commands:
//! - `leaderboard` — re-score a dataset under one method and print the standings
//! - `analyze` — fragility analysis for one method, with sample displacements
//! - `sweep` — fragility analysis across a set of methods, optionally saving artifacts

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ranklab_core::{rank, score, Dataset, ScoringMethod};
use ranklab_runner::{
    load_dataset, save_artifacts, DisplacementEvent, FragilityAnalyzer, FragilityReport,
    FragilitySweep, SweepConfig, SweepResults, TOP_TIER,
};

#[derive(Parser)]
#[command(
    name = "ranklab",
    about = "RankLab CLI — how fragile is a multi-event leaderboard?"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Re-score a dataset and print the leaderboard.
    Leaderboard {
        /// Path to the dataset JSON snapshot.
        #[arg(long)]
        data: PathBuf,

        /// Scoring method: official, linear, normalized, continuous, decay.
        #[arg(long, default_value = "official")]
        method: String,

        /// Decay constant (required with --method decay).
        #[arg(long)]
        k: Option<f64>,

        /// Number of rows to print. Defaults to the whole field.
        #[arg(long)]
        top: Option<usize>,
    },
    /// Run the fragility analysis for one scoring method.
    Analyze {
        /// Path to the dataset JSON snapshot.
        #[arg(long)]
        data: PathBuf,

        /// Scoring method: official, linear, normalized, continuous, decay.
        #[arg(long, default_value = "official")]
        method: String,

        /// Decay constant (required with --method decay).
        #[arg(long)]
        k: Option<f64>,

        /// Number of top-tier displacement events to print.
        #[arg(long, default_value_t = 5)]
        show: usize,

        /// Run trials on one thread.
        #[arg(long, default_value_t = false)]
        sequential: bool,
    },
    /// Run the fragility analysis across many scoring configurations.
    Sweep {
        /// Path to the dataset JSON snapshot.
        #[arg(long)]
        data: PathBuf,

        /// Sweep TOML. Defaults to every method and the standard decay constants.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write CSV/JSON artifacts under this directory.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Run trials on one thread.
        #[arg(long, default_value_t = false)]
        sequential: bool,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Leaderboard {
            data,
            method,
            k,
            top,
        } => run_leaderboard(&data, &method, k, top),
        Commands::Analyze {
            data,
            method,
            k,
            show,
            sequential,
        } => run_analyze(&data, &method, k, show, sequential),
        Commands::Sweep {
            data,
            config,
            output_dir,
            sequential,
        } => run_sweep_cmd(&data, config.as_deref(), output_dir.as_deref(), sequential),
    }
}

/// Logs go to stderr so stdout stays a clean table.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load(path: &Path) -> Result<Dataset> {
    let dataset =
        load_dataset(path).with_context(|| format!("failed to load {}", path.display()))?;
    if dataset.athlete_count() == 0 {
        bail!("{} contains no athletes", path.display());
    }
    Ok(dataset)
}

fn run_leaderboard(data: &Path, method: &str, k: Option<f64>, top: Option<usize>) -> Result<()> {
    let dataset = load(data)?;
    let method = ScoringMethod::from_name(method, k)?;
    let standings = rank(&score(&dataset, &method));
    let rows = top.unwrap_or(standings.len());

    println!("Leaderboard ({method})");
    println!("{:>4}  {:<32} {:>12}", "Rank", "Athlete", "Points");
    for (i, entry) in standings.top(rows).iter().enumerate() {
        println!("{:>4}  {:<32} {:>12.4}", i + 1, entry.name, entry.total);
    }
    Ok(())
}

fn run_analyze(
    data: &Path,
    method: &str,
    k: Option<f64>,
    show: usize,
    sequential: bool,
) -> Result<()> {
    let dataset = load(data)?;
    let method = ScoringMethod::from_name(method, k)?;
    let report = FragilityAnalyzer::new(method)
        .with_parallelism(!sequential)
        .analyze(&dataset)?;

    print_report(&report);

    let samples: Vec<&DisplacementEvent> = report.top_tier().take(show).collect();
    if !samples.is_empty() {
        println!();
        println!("Top-{TOP_TIER} displacement events (first {}):", samples.len());
        for d in samples {
            print_displacement(d);
        }
    }
    Ok(())
}

fn run_sweep_cmd(
    data: &Path,
    config_path: Option<&Path>,
    output_dir: Option<&Path>,
    sequential: bool,
) -> Result<()> {
    let dataset = load(data)?;
    let mut config = match config_path {
        Some(path) => SweepConfig::from_file(path)?,
        None => SweepConfig::default(),
    };
    if sequential {
        config.parallel = false;
    }

    // Validate the whole plan before the first trial.
    let plan = config.plan()?;
    let results = FragilitySweep::new()
        .with_parallelism(config.parallel)
        .sweep_with_progress(&dataset, &plan, |i, total, report| {
            info!(
                "[{}/{}] {} FI={:.4}",
                i + 1,
                total,
                report.summary.method_label,
                report.summary.fragility_index
            );
        })?;

    print_sweep_table(&results);

    if let Some(dir) = output_dir {
        let fingerprint = dataset
            .fingerprint()
            .context("failed to fingerprint dataset")?;
        let run_dir = save_artifacts(&results, &fingerprint, dir)?;
        println!("Artifacts saved to: {}", run_dir.display());
    }
    Ok(())
}

fn print_report(report: &FragilityReport) {
    let s = &report.summary;
    let st = &report.stats;
    println!("Fragility analysis ({})", s.method_label);
    println!("  Leader:              {} ({:.4} pts)", s.leader_name, s.leader_points);
    println!("  Displacement events: {}", s.total_displacements);
    println!("  Top-{TOP_TIER} displacements:  {}", s.top10_displacements);
    println!("  Fragility index:     {:.4}", s.fragility_index);
    println!(
        "  Trials:              {} run, {} skipped at a boundary, {} total",
        st.trials_run, st.boundary_skips, st.trial_space
    );
    if st.coupled_ripples > 0 {
        println!(
            "  Coupled ripples:     {} (mover's rank changed too; not counted in FI)",
            st.coupled_ripples
        );
    }
}

fn print_displacement(d: &DisplacementEvent) {
    println!("  {} {} in {}:", d.athlete, d.direction, d.event);
    for c in &d.changes {
        println!("    {:<32} {:>3} -> {:<3}", c.athlete, c.old_rank, c.new_rank);
    }
}

fn print_sweep_table(results: &SweepResults) {
    println!(
        "{:<16} {:<28} {:>10} {:>7} {:>7} {:>8}",
        "Method", "Leader", "Points", "Total", "Top10", "FI"
    );
    for s in results.summaries() {
        println!(
            "{:<16} {:<28} {:>10.4} {:>7} {:>7} {:>8.4}",
            s.method_label,
            s.leader_name,
            s.leader_points,
            s.total_displacements,
            s.top10_displacements,
            s.fragility_index
        );
    }
    if let Some(most_stable) = results.sorted_by_fragility().first() {
        println!();
        println!(
            "Most stable: {} (FI={:.4})",
            most_stable.summary.method_label, most_stable.summary.fragility_index
        );
    }
}
