//! Property-based tests over randomly built circuits.
//!
//! Circuits are generated as a step list (fresh variables and gates over
//! the existing pool, with random operand signs), then checked for the
//! structural and semantic invariants of the front-end.

use proptest::prelude::*;

use krets_adapter_dpll::DpllBackend;
use krets_core::{CircuitModel, GateOp, Lit};
use krets_sat::SolveOutcome;

const OPS: [GateOp; 5] = [
    GateOp::And,
    GateOp::Nand,
    GateOp::Or,
    GateOp::Nor,
    GateOp::Xor,
];

/// One construction step of a random circuit.
#[derive(Debug, Clone)]
enum Step {
    Fresh,
    Gate {
        op: u8,
        left: u16,
        lneg: bool,
        right: u16,
        rneg: bool,
    },
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        1 => Just(Step::Fresh),
        3 => (0u8..5, any::<u16>(), any::<bool>(), any::<u16>(), any::<bool>()).prop_map(
            |(op, left, lneg, right, rneg)| Step::Gate {
                op,
                left,
                lneg,
                right,
                rneg,
            }
        ),
    ]
}

/// Interpret a step list into a model; returns the literal pool.
fn build(steps: &[Step]) -> (CircuitModel<DpllBackend>, Vec<Lit>) {
    let mut m = CircuitModel::new(DpllBackend::new());
    let mut pool = vec![m.var(), m.var()];
    for step in steps {
        match step {
            Step::Fresh => pool.push(m.var()),
            Step::Gate {
                op,
                left,
                lneg,
                right,
                rneg,
            } => {
                let mut l = pool[*left as usize % pool.len()];
                let mut r = pool[*right as usize % pool.len()];
                if *lneg {
                    l = -l;
                }
                if *rneg {
                    r = -r;
                }
                let out = m
                    .intern(OPS[*op as usize % OPS.len()], l, r)
                    .expect("operands come from the pool");
                pool.push(out);
            }
        }
    }
    (m, pool)
}

fn pick(pool: &[Lit], idx: u16, neg: bool) -> Lit {
    let lit = pool[idx as usize % pool.len()];
    if neg { -lit } else { lit }
}

/// The positive literal of a circuit variable.
fn lit_of(var: u32) -> Lit {
    Lit::try_from(var as i32).expect("positive variable")
}

proptest! {
    /// Re-requesting every gate with swapped operands returns the original
    /// output variable and creates nothing new.
    #[test]
    fn prop_dedup_under_operand_permutation(steps in prop::collection::vec(arb_step(), 1..30)) {
        let (mut m, _) = build(&steps);
        let gates: Vec<(GateOp, Lit, Lit, u32)> = m
            .gates()
            .map(|g| (g.op(), g.left(), g.right(), g.value()))
            .collect();
        let num_gates = m.num_gates();

        for (op, left, right, value) in gates {
            let again = m.intern(op, right, left).unwrap();
            prop_assert_eq!(again.var(), value);
            prop_assert!(!again.is_negated());
        }
        prop_assert_eq!(m.num_gates(), num_gates);
    }

    /// After a satisfying solve: asserted literals hold, values respect
    /// negation, and the solution is closed over the gate graph. Every
    /// gate with two valued operands has a valued, consistent output,
    /// encoded or not.
    #[test]
    fn prop_solution_closure(
        steps in prop::collection::vec(arb_step(), 1..30),
        asserts in prop::collection::vec((any::<u16>(), any::<bool>()), 1..4),
    ) {
        let (mut m, pool) = build(&steps);
        let asserted: Vec<Lit> = asserts
            .iter()
            .map(|&(idx, neg)| pick(&pool, idx, neg))
            .collect();
        m.assert_many(&asserted).unwrap();

        match m.solve().unwrap() {
            SolveOutcome::Sat => {
                for &lit in &asserted {
                    prop_assert_eq!(m.val(lit).unwrap(), true);
                }
                for &lit in &pool {
                    if let Some(value) = m.value_of(lit) {
                        prop_assert_eq!(m.value_of(-lit), Some(!value));
                    }
                }
                for g in m.gates() {
                    let left = m.value_of(lit_of(g.left().var()));
                    let right = m.value_of(lit_of(g.right().var()));
                    if let (Some(lval), Some(rval)) = (left, right) {
                        prop_assert_eq!(
                            m.value_of(lit_of(g.value())),
                            Some(g.eval(lval, rval)),
                            "gate {} out of step with its operands",
                            g.value()
                        );
                    }
                }
            }
            SolveOutcome::Unsat => {
                // Unsat is monotone under further assertions.
                m.assert(pool[0]).unwrap();
                prop_assert_eq!(m.solve().unwrap(), SolveOutcome::Unsat);
            }
            SolveOutcome::Unknown => unreachable!("no budget configured"),
        }
    }

    /// Removing an assumption twice behaves exactly like removing it once.
    #[test]
    fn prop_unassume_idempotent(
        steps in prop::collection::vec(arb_step(), 1..20),
        pick_idx in any::<u16>(),
        neg in any::<bool>(),
    ) {
        let (mut once, pool) = build(&steps);
        let (mut twice, _) = build(&steps);
        let lit = pick(&pool, pick_idx, neg);

        once.assume(lit).unwrap();
        once.unassume(lit).unwrap();

        twice.assume(lit).unwrap();
        twice.unassume(lit).unwrap();
        twice.unassume(lit).unwrap();

        prop_assert_eq!(once.solve().unwrap(), twice.solve().unwrap());
    }
}
