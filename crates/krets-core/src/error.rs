//! Error types for the core crate.

use krets_sat::SolverError;
use thiserror::Error;

/// Errors that can occur in circuit model operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ModelError {
    /// The literal value zero is reserved as "absent".
    #[error("literal 0 is reserved")]
    ZeroLiteral,

    /// A literal refers to a circuit variable that was never minted.
    #[error("unknown circuit variable {var} (model has {num_vars} variables)")]
    UnknownVariable {
        /// The offending variable.
        var: u32,
        /// The model's current variable count.
        num_vars: u32,
    },

    /// A value was queried without a satisfying solve.
    #[error("no satisfying solve available")]
    NotSolved,

    /// The variable has no value even after a satisfying solve: it was
    /// reached neither by the encoding nor by solution extension.
    #[error("circuit variable {var} has no value in the solution")]
    NoValue {
        /// The unvalued variable.
        var: u32,
    },

    /// The backend solver reported an error.
    #[error("backend error: {0}")]
    Solver(#[from] SolverError),
}

/// Result type for circuit model operations.
pub type ModelResult<T> = Result<T, ModelError>;
