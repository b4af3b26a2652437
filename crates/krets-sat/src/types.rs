//! CNF literal and solver outcome types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Neg;

/// A signed CNF literal in the solver's namespace.
///
/// The magnitude names a CNF variable (1-based); the sign encodes negation.
/// Zero is reserved and cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CnfLit(i32);

impl CnfLit {
    /// Create the positive literal of a CNF variable.
    ///
    /// # Panics
    ///
    /// Panics if `var` is zero or exceeds `i32::MAX`.
    pub fn positive(var: u32) -> Self {
        assert!(var != 0, "CNF variable 0 is reserved");
        let raw = i32::try_from(var).expect("CNF variable exceeds i32::MAX");
        CnfLit(raw)
    }

    /// Create the negative literal of a CNF variable.
    ///
    /// # Panics
    ///
    /// Panics if `var` is zero or exceeds `i32::MAX`.
    pub fn negative(var: u32) -> Self {
        -Self::positive(var)
    }

    /// Create a literal with an explicit polarity.
    pub fn new(var: u32, negated: bool) -> Self {
        if negated {
            Self::negative(var)
        } else {
            Self::positive(var)
        }
    }

    /// Reconstruct a literal from its DIMACS-style signed integer.
    ///
    /// Returns `None` for zero.
    pub fn from_dimacs(raw: i32) -> Option<Self> {
        if raw == 0 { None } else { Some(CnfLit(raw)) }
    }

    /// The CNF variable this literal speaks about.
    #[inline]
    pub fn var(self) -> u32 {
        self.0.unsigned_abs()
    }

    /// Whether this literal is the negation of its variable.
    #[inline]
    pub fn is_negated(self) -> bool {
        self.0 < 0
    }

    /// The DIMACS-style signed integer form.
    #[inline]
    pub fn to_dimacs(self) -> i32 {
        self.0
    }
}

impl Neg for CnfLit {
    type Output = CnfLit;

    fn neg(self) -> CnfLit {
        CnfLit(-self.0)
    }
}

impl fmt::Display for CnfLit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A three-valued boolean, as reported in a solver model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lbool {
    /// The variable is true in the model.
    True,
    /// The variable is false in the model.
    False,
    /// The solver did not assign the variable.
    Undef,
}

impl Lbool {
    /// Convert to a plain boolean, if assigned.
    #[inline]
    pub fn to_bool(self) -> Option<bool> {
        match self {
            Lbool::True => Some(true),
            Lbool::False => Some(false),
            Lbool::Undef => None,
        }
    }
}

impl From<bool> for Lbool {
    fn from(value: bool) -> Self {
        if value { Lbool::True } else { Lbool::False }
    }
}

/// Outcome of a solver invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveOutcome {
    /// A satisfying assignment was found; the model is available.
    Sat,
    /// The formula is unsatisfiable under the given assumptions.
    Unsat,
    /// The solver gave up within its time or conflict budget.
    Unknown,
}

impl SolveOutcome {
    /// Whether a model is available.
    #[inline]
    pub fn is_sat(self) -> bool {
        matches!(self, SolveOutcome::Sat)
    }
}

impl fmt::Display for SolveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SolveOutcome::Sat => "sat",
            SolveOutcome::Unsat => "unsat",
            SolveOutcome::Unknown => "unknown",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_sign() {
        let lit = CnfLit::positive(3);
        assert_eq!(lit.var(), 3);
        assert!(!lit.is_negated());

        let neg = -lit;
        assert_eq!(neg.var(), 3);
        assert!(neg.is_negated());
        assert_eq!(-neg, lit);
    }

    #[test]
    fn test_dimacs_roundtrip() {
        assert_eq!(CnfLit::from_dimacs(-7), Some(CnfLit::negative(7)));
        assert_eq!(CnfLit::from_dimacs(0), None);
        assert_eq!(CnfLit::negative(7).to_dimacs(), -7);
    }

    #[test]
    #[should_panic(expected = "reserved")]
    fn test_zero_variable_rejected() {
        let _ = CnfLit::positive(0);
    }

    #[test]
    fn test_lbool() {
        assert_eq!(Lbool::True.to_bool(), Some(true));
        assert_eq!(Lbool::Undef.to_bool(), None);
        assert_eq!(Lbool::from(false), Lbool::False);
    }
}
