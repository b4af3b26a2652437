//! Backend trait and configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SolverResult;
use crate::types::{CnfLit, Lbool, SolveOutcome};

/// Construction-time configuration for a backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Number of worker threads the backend may use internally.
    pub num_threads: u32,
    /// Enable on-the-fly Gaussian elimination, where supported.
    pub allow_otf_gauss: bool,
}

impl SolverConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self {
            num_threads: 1,
            allow_otf_gauss: false,
        }
    }

    /// Set the worker thread count.
    pub fn with_num_threads(mut self, num_threads: u32) -> Self {
        self.num_threads = num_threads;
        self
    }

    /// Enable or disable on-the-fly Gaussian elimination.
    pub fn with_otf_gauss(mut self, allow: bool) -> Self {
        self.allow_otf_gauss = allow;
        self
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for SAT backends.
///
/// This trait defines the complete surface the circuit front-end relies on:
/// variable allocation, clause ingestion, solving under assumptions, model
/// readout, and budget configuration. Calls are blocking; the only call that
/// may block meaningfully is [`solve`](SatBackend::solve), bounded by the
/// time and conflict budgets.
///
/// Variables are 1-based. A clause may only mention variables already
/// announced via [`new_vars`](SatBackend::new_vars).
pub trait SatBackend {
    /// Get the name of this backend.
    fn name(&self) -> &str;

    /// Raise the variable count by `n`.
    fn new_vars(&mut self, n: u32);

    /// The current variable count.
    fn num_vars(&self) -> u32;

    /// Add a clause over already-announced variables.
    fn add_clause(&mut self, lits: &[CnfLit]) -> SolverResult<()>;

    /// Solve the accumulated clause set under per-call assumptions.
    ///
    /// `only_indep` asks the backend to restrict the reported model to its
    /// independent support, where such tracking exists; backends without it
    /// report a full model. May be called repeatedly; clauses persist
    /// across calls.
    fn solve(&mut self, assumptions: &[CnfLit], only_indep: bool) -> SolverResult<SolveOutcome>;

    /// The model of the last [`SolveOutcome::Sat`] result.
    ///
    /// Entry `var - 1` holds the assignment of variable `var`. Meaningless
    /// unless the most recent solve returned Sat.
    fn model(&self) -> &[Lbool];

    /// Bound the next solve by wall-clock time. `None` means unlimited.
    fn set_max_time(&mut self, budget: Option<Duration>);

    /// Bound the next solve by a conflict count. `None` means unlimited.
    fn set_max_conflicts(&mut self, budget: Option<u64>);

    /// Set the worker thread count. Must precede the first clause.
    fn set_num_threads(&mut self, num_threads: u32) -> SolverResult<()>;

    /// Toggle on-the-fly Gaussian elimination. Must precede the first clause.
    fn set_allow_otf_gauss(&mut self, allow: bool) -> SolverResult<()>;

    /// Apply a construction-time configuration in one call.
    fn apply_config(&mut self, config: &SolverConfig) -> SolverResult<()> {
        self.set_num_threads(config.num_threads)?;
        self.set_allow_otf_gauss(config.allow_otf_gauss)?;
        Ok(())
    }
}
