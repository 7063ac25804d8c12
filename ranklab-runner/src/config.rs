//! Sweep configuration — which scoring methods and decay constants to run.
//!
//! Loaded from TOML:
//!
//! ```toml
//! methods = ["official", "linear", "normalized", "continuous", "decay"]
//! decay_k = [0.1, 0.5, 1.0]
//! parallel = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use ranklab_core::{ScoringError, ScoringMethod};

/// Decay constants swept by default.
pub const DEFAULT_DECAY_KS: [f64; 16] = [
    0.01, 0.05, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0, 1.25, 1.5, 1.75, 2.0,
];

/// Method order swept by default; `decay` expands over `decay_k`.
pub const DEFAULT_METHODS: [&str; 5] = ["official", "linear", "normalized", "continuous", "decay"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse sweep TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Serializable sweep request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Method names, in output order.
    pub methods: Vec<String>,
    /// Decay constants; one run per value wherever `decay` appears in `methods`.
    pub decay_k: Vec<f64>,
    /// Run perturbation trials on the rayon pool.
    pub parallel: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            methods: DEFAULT_METHODS.iter().map(|m| m.to_string()).collect(),
            decay_k: DEFAULT_DECAY_KS.to_vec(),
            parallel: true,
        }
    }
}

impl SweepConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Validate every entry and expand `decay` into one method per k.
    ///
    /// Runs before any trial so a typo in the last method cannot waste a
    /// long sweep.
    pub fn plan(&self) -> Result<Vec<ScoringMethod>, ConfigError> {
        if self.methods.is_empty() {
            return Err(ConfigError::InvalidConfiguration(
                "sweep requests no scoring methods".into(),
            ));
        }

        let mut plan = Vec::new();
        for name in &self.methods {
            if name.trim() == "decay" {
                if self.decay_k.is_empty() {
                    return Err(ConfigError::InvalidConfiguration(
                        "decay requested but decay_k is empty".into(),
                    ));
                }
                for &k in &self.decay_k {
                    plan.push(ScoringMethod::decay(k)?);
                }
            } else {
                plan.push(ScoringMethod::from_name(name, None)?);
            }
        }
        Ok(plan)
    }
}
