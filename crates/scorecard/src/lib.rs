//! Rule-based readiness scoring for organization profiles.
//!
//! The `scoring` module holds the engine: a registry of evaluation rules, a
//! catalog of per-category rule-sets, and an orchestrator that fans rule
//! computations out concurrently and folds the results into a hierarchical
//! [`scoring::ScoreSummary`]. `config`, `error`, and `telemetry` carry the
//! service plumbing shared with the API binary.

pub mod config;
pub mod error;
pub mod scoring;
pub mod telemetry;
