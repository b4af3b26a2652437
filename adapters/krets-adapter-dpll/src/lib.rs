//! Krets Bundled DPLL Backend
//!
//! This crate provides a self-contained SAT backend for testing,
//! development, and small to medium problem instances. It implements the
//! [`krets_sat::SatBackend`] contract with a classic iterative DPLL search:
//! two-watched-literal unit propagation, chronological backtracking, and
//! assumption handling. There is no clause learning and no clause removal,
//! which keeps the solver small and its memory use proportional to the
//! input.
//!
//! # Features
//!
//! - **Incremental**: clauses persist across `solve` calls
//! - **Assumptions**: per-call hypotheses, never flipped by the search
//! - **Budgets**: wall-clock and conflict limits; exhaustion reports
//!   `Unknown` and leaves the solver usable
//! - **No External Dependencies**: pure Rust implementation
//!
//! # Example
//!
//! ```
//! use krets_adapter_dpll::DpllBackend;
//! use krets_sat::{CnfLit, SatBackend, SolveOutcome};
//!
//! let mut solver = DpllBackend::new();
//! solver.new_vars(2);
//! solver.add_clause(&[CnfLit::positive(1), CnfLit::positive(2)]).unwrap();
//! solver.add_clause(&[CnfLit::negative(1)]).unwrap();
//!
//! assert_eq!(solver.solve(&[], false).unwrap(), SolveOutcome::Sat);
//! ```

mod solver;

pub use solver::DpllBackend;
