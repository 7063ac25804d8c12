//! RankLab Core — dataset model, scoring methods, leaderboard, perturbation.
//!
//! This crate contains the pure half of the fragility engine:
//! - Domain types (athletes, event results, point scales, dataset snapshot)
//! - Scoring methods (official, linear, normalized, continuous, decay)
//! - Leaderboard builder with a deterministic total order
//! - Single adjacent-place perturbation operator
//!
//! Nothing here performs I/O; loading and export live in `ranklab-runner`.

pub mod domain;
pub mod leaderboard;
pub mod perturbation;
pub mod scoring;

pub use domain::{Athlete, Dataset, DatasetError, EventResult, PointScale};
pub use leaderboard::{rank, RankMap, StandingEntry, Standings};
pub use perturbation::{perturb, swap_partner, swap_places, Direction};
pub use scoring::{score, score_event, ScoringError, ScoringMethod, ScoringRequest};
