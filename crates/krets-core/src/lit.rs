//! Circuit literal type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Neg;

use crate::error::ModelError;

/// A signed literal in the circuit namespace.
///
/// The magnitude names a circuit variable (1-based); the sign encodes
/// negation, so `-lit` is the complement of `lit`. Zero is reserved as
/// "absent" and cannot be represented. Literals are handed out by
/// [`CircuitModel::var`](crate::CircuitModel::var) and by the gate
/// operations; the raw signed form is available for callers that speak the
/// numeric convention directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Lit(i32);

impl Lit {
    /// The positive literal of a circuit variable.
    ///
    /// # Panics
    ///
    /// Panics if `var` is zero or exceeds `i32::MAX`.
    pub(crate) fn from_var(var: u32) -> Self {
        debug_assert!(var != 0, "circuit variable 0 is reserved");
        let raw = i32::try_from(var).expect("circuit variable exceeds i32::MAX");
        Lit(raw)
    }

    /// The circuit variable this literal speaks about.
    #[inline]
    pub fn var(self) -> u32 {
        self.0.unsigned_abs()
    }

    /// Whether this literal is the negation of its variable.
    #[inline]
    pub fn is_negated(self) -> bool {
        self.0 < 0
    }

    /// The raw signed integer form.
    #[inline]
    pub fn raw(self) -> i32 {
        self.0
    }
}

impl Neg for Lit {
    type Output = Lit;

    fn neg(self) -> Lit {
        Lit(-self.0)
    }
}

impl TryFrom<i32> for Lit {
    type Error = ModelError;

    fn try_from(raw: i32) -> Result<Self, Self::Error> {
        if raw == 0 {
            Err(ModelError::ZeroLiteral)
        } else {
            Ok(Lit(raw))
        }
    }
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negated() {
            write!(f, "!v{}", self.var())
        } else {
            write!(f, "v{}", self.var())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_roundtrip() {
        let lit = Lit::from_var(5);
        assert_eq!(lit.var(), 5);
        assert!(!lit.is_negated());

        let neg = -lit;
        assert_eq!(neg.var(), 5);
        assert!(neg.is_negated());
        assert_eq!(-neg, lit);
        assert_eq!(neg.raw(), -5);
    }

    #[test]
    fn test_try_from_rejects_zero() {
        assert!(matches!(Lit::try_from(0), Err(ModelError::ZeroLiteral)));
        assert_eq!(Lit::try_from(-3).unwrap(), -Lit::from_var(3));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Lit::from_var(7)), "v7");
        assert_eq!(format!("{}", -Lit::from_var(7)), "!v7");
    }
}
