//! Two-input gate records and their CNF expansions.

use serde::{Deserialize, Serialize};
use std::fmt;

use krets_sat::CnfLit;

use crate::lit::Lit;

/// The two-input boolean operators a gate can realize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateOp {
    /// Conjunction.
    And,
    /// Negated conjunction.
    Nand,
    /// Disjunction.
    Or,
    /// Negated disjunction.
    Nor,
    /// Exclusive disjunction.
    Xor,
}

impl GateOp {
    /// Evaluate the operator on concrete inputs.
    #[inline]
    pub fn eval(self, left: bool, right: bool) -> bool {
        match self {
            GateOp::And => left && right,
            GateOp::Nand => !(left && right),
            GateOp::Or => left || right,
            GateOp::Nor => !(left || right),
            GateOp::Xor => left ^ right,
        }
    }

    /// Lower-case operator name.
    pub fn name(self) -> &'static str {
        match self {
            GateOp::And => "and",
            GateOp::Nand => "nand",
            GateOp::Or => "or",
            GateOp::Nor => "nor",
            GateOp::Xor => "xor",
        }
    }
}

impl fmt::Display for GateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Order two operands by variable magnitude, preserving signs; equal
/// magnitudes put the positive literal first.
///
/// This positional canonicalization is what makes `and(a, b)` and
/// `and(b, a)` the same gate for deduplication. All supported operators
/// are commutative, so the swap never changes meaning.
pub(crate) fn canonical_pair(left: Lit, right: Lit) -> (Lit, Lit) {
    if (left.var(), left.is_negated()) <= (right.var(), right.is_negated()) {
        (left, right)
    } else {
        (right, left)
    }
}

/// The CNF ids of an encoded gate. All three exist together or not at all.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CnfTriple {
    pub left: CnfLit,
    pub right: CnfLit,
    pub value: CnfLit,
}

impl CnfTriple {
    /// The gate's defining clauses relating its CNF ids.
    ///
    /// The templates are the same regardless of operand polarity; negation
    /// already lives in the signs of the stored literals.
    pub fn clauses(&self, op: GateOp) -> Vec<Vec<CnfLit>> {
        let (l, r, v) = (self.left, self.right, self.value);
        match op {
            GateOp::And => vec![vec![-l, -r, v], vec![l, -v], vec![r, -v]],
            GateOp::Nand => vec![vec![-l, -r, -v], vec![l, v], vec![r, v]],
            GateOp::Or => vec![vec![l, r, -v], vec![-l, v], vec![-r, v]],
            GateOp::Nor => vec![vec![l, r, v], vec![-l, -v], vec![-r, -v]],
            GateOp::Xor => vec![
                vec![-l, -r, -v],
                vec![l, r, -v],
                vec![l, -r, v],
                vec![-l, r, v],
            ],
        }
    }
}

/// An immutable two-input gate: `(left, op, right) -> value`.
///
/// Operands are stored canonically (smaller variable first, signs
/// untouched). `value` is the positive circuit variable naming the gate's
/// output, unique per gate.
#[derive(Debug)]
pub struct Gate {
    left: Lit,
    right: Lit,
    op: GateOp,
    value: u32,
    cnf: Option<CnfTriple>,
}

impl Gate {
    /// Build a gate, canonicalizing the operand order.
    pub(crate) fn new(op: GateOp, left: Lit, right: Lit, value: u32) -> Self {
        let (left, right) = canonical_pair(left, right);
        Self {
            left,
            right,
            op,
            value,
            cnf: None,
        }
    }

    /// Left operand (canonical order).
    #[inline]
    pub fn left(&self) -> Lit {
        self.left
    }

    /// Right operand (canonical order).
    #[inline]
    pub fn right(&self) -> Lit {
        self.right
    }

    /// The gate's operator.
    #[inline]
    pub fn op(&self) -> GateOp {
        self.op
    }

    /// The positive circuit variable naming the gate's output.
    #[inline]
    pub fn value(&self) -> u32 {
        self.value
    }

    /// Whether the gate has been assigned CNF ids.
    #[inline]
    pub(crate) fn is_encoded(&self) -> bool {
        self.cnf.is_some()
    }

    pub(crate) fn cnf(&self) -> Option<&CnfTriple> {
        self.cnf.as_ref()
    }

    pub(crate) fn set_cnf(&mut self, triple: CnfTriple) {
        debug_assert!(self.cnf.is_none(), "gate encoded twice");
        self.cnf = Some(triple);
    }

    /// Structural equality against a canonicalized request, including
    /// operand signs.
    pub(crate) fn matches(&self, op: GateOp, left: Lit, right: Lit) -> bool {
        self.op == op && self.left == left && self.right == right
    }

    /// Evaluate the gate given the values of its operand *variables*.
    ///
    /// Operand signs are applied here, so callers pass the variables'
    /// values, not the literals'.
    #[inline]
    pub fn eval(&self, left_var: bool, right_var: bool) -> bool {
        self.op.eval(
            left_var ^ self.left.is_negated(),
            right_var ^ self.right.is_negated(),
        )
    }
}
