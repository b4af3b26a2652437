//! Krets SAT Backend Contract
//!
//! This crate defines the interface between the krets circuit front-end and
//! a conjunctive-normal-form SAT solver. The front-end is written against
//! the [`SatBackend`] trait; any solver that implements it can serve as the
//! search engine behind a circuit model.
//!
//! # Core Components
//!
//! - **Literals**: [`CnfLit`] for signed CNF literals (sign encodes
//!   negation, zero is reserved)
//! - **Backend**: [`SatBackend`] for variable allocation, clause ingestion,
//!   solving under assumptions, and model readout
//! - **Outcomes**: [`SolveOutcome`] (Sat/Unsat/Unknown) and [`Lbool`]
//!   (per-variable model entries)
//! - **Configuration**: [`SolverConfig`] for construction-time settings
//!
//! # Example
//!
//! ```ignore
//! use krets_sat::{CnfLit, SatBackend, SolveOutcome};
//!
//! fn tiny<B: SatBackend>(backend: &mut B) -> krets_sat::SolverResult<SolveOutcome> {
//!     backend.new_vars(2);
//!     backend.add_clause(&[CnfLit::positive(1), CnfLit::positive(2)])?;
//!     backend.add_clause(&[-CnfLit::positive(1)])?;
//!     backend.solve(&[], false)
//! }
//! ```

pub mod backend;
pub mod error;
pub mod types;

pub use backend::{SatBackend, SolverConfig};
pub use error::{SolverError, SolverResult};
pub use types::{CnfLit, Lbool, SolveOutcome};
