//! Error types for the backend contract.

use thiserror::Error;

/// Errors that can occur inside a SAT backend.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SolverError {
    /// A clause literal refers to a variable the backend was never told about.
    #[error("clause literal over unknown variable {var} (backend has {num_vars} variables)")]
    UnknownVariable {
        /// The offending variable.
        var: u32,
        /// The backend's current variable count.
        num_vars: u32,
    },

    /// A construction-time setting was changed after clauses were added.
    #[error("'{setting}' must be configured before the first clause")]
    ConfigAfterClause {
        /// Name of the setting.
        setting: &'static str,
    },

    /// The backend does not support a requested feature.
    #[error("unsupported backend feature: {0}")]
    Unsupported(String),

    /// The backend failed to allocate resources.
    #[error("backend allocation failure: {0}")]
    Allocation(String),
}

/// Result type for backend operations.
pub type SolverResult<T> = Result<T, SolverError>;
