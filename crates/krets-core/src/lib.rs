//! Krets Circuit Front-End
//!
//! This crate compiles combinational circuits into conjunctive normal form
//! and drives a SAT backend over the result. Clients describe a problem as
//! two-input gates over signed circuit literals, pin facts with assertions
//! and assumptions, and read a per-variable boolean solution back, even
//! for parts of the circuit that were never handed to the solver.
//!
//! # Core Components
//!
//! - **Literals**: [`Lit`] for signed circuit literals (sign encodes
//!   negation, zero is reserved)
//! - **Gates**: [`GateOp`] and [`Gate`] for two-input boolean gates,
//!   hash-consed so structurally equal requests share one output variable
//! - **Model**: [`CircuitModel`] wrapping a [`krets_sat::SatBackend`]:
//!   gate construction, assert/assume, solving, value queries
//! - **Stats**: [`ModelStats`] size counters
//!
//! Only gates transitively reachable from an assertion or an active
//! assumption are encoded, each as its fixed set of defining clauses.
//! After a satisfying solve the solution is closed over the whole graph,
//! so outputs of unencoded gates are valued too whenever their inputs are.
//!
//! # Example
//!
//! ```
//! use krets_adapter_dpll::DpllBackend;
//! use krets_core::CircuitModel;
//! use krets_sat::SolveOutcome;
//!
//! let mut model = CircuitModel::new(DpllBackend::new());
//! let a = model.var();
//! let b = model.var();
//! let both = model.and(a, b).unwrap();
//! model.assert(both).unwrap();
//!
//! assert_eq!(model.solve().unwrap(), SolveOutcome::Sat);
//! assert!(model.val(a).unwrap());
//! assert!(model.val(b).unwrap());
//! assert!(!model.val(-a).unwrap());
//! ```
//!
//! # Supported Gates
//!
//! | Operation | Meaning |
//! |-----------|---------|
//! | `and` | conjunction |
//! | `nand` | negated conjunction |
//! | `or` | disjunction |
//! | `nor` | negated disjunction |
//! | `xor` | exclusive disjunction |
//!
//! Negation needs no gate: `-lit` is the complement of `lit`.

pub mod error;
pub mod gate;
pub mod lit;
pub mod model;

mod encode;
mod graph;
mod solution;
mod vars;

pub use error::{ModelError, ModelResult};
pub use gate::{Gate, GateOp};
pub use lit::Lit;
pub use model::{CircuitModel, ModelStats};
