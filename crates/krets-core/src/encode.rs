//! Reachability-driven CNF emission.

use std::collections::VecDeque;

use tracing::debug;

use krets_sat::{SatBackend, SolverResult};

use crate::gate::CnfTriple;
use crate::graph::GateGraph;
use crate::lit::Lit;
use crate::vars::VarManager;

/// Bit-packed membership set over circuit variables.
///
/// Under realistic workloads nearly every id is visited, which makes one
/// bit per id the right density.
#[derive(Debug)]
pub(crate) struct VisitedSet {
    bits: Vec<u64>,
}

impl VisitedSet {
    /// A set able to hold ids `0..=max_id`.
    pub fn new(max_id: u32) -> Self {
        Self {
            bits: vec![0; max_id as usize / 64 + 1],
        }
    }

    /// Insert an id; returns `false` if it was already present.
    pub fn insert(&mut self, id: u32) -> bool {
        let (word, mask) = (id as usize / 64, 1u64 << (id % 64));
        let fresh = self.bits[word] & mask == 0;
        self.bits[word] |= mask;
        fresh
    }

    pub fn contains(&self, id: u32) -> bool {
        self.bits[id as usize / 64] & (1 << (id % 64)) != 0
    }
}

/// Walk the gate graph backwards from `root_cv`, assign CNF ids to every
/// gate encountered for the first time, and emit their defining clauses.
///
/// The backend learns the new variable high-water mark before any clause
/// mentions the new variables; some backends reject clauses over
/// unannounced ids. Returns the number of clauses emitted. Calling this
/// again from the same root emits nothing.
pub(crate) fn add_reachable<B: SatBackend>(
    graph: &mut GateGraph,
    vars: &mut VarManager,
    backend: &mut B,
    root_cv: u32,
) -> SolverResult<u64> {
    let mut visited = VisitedSet::new(vars.num_cvs());
    let mut queue = VecDeque::new();
    let mut staged: Vec<u32> = Vec::new();
    queue.push_back(root_cv);

    while let Some(v) = queue.pop_front() {
        if !visited.insert(v) {
            continue;
        }
        let operands = match graph.gate(v) {
            Some(gate) => Some((gate.left(), gate.right(), gate.is_encoded())),
            None => None,
        };
        if let Some((left, right, encoded)) = operands {
            if !encoded {
                let triple = CnfTriple {
                    left: vars.cnf_of(left),
                    right: vars.cnf_of(right),
                    value: vars.cnf_of(Lit::from_var(v)),
                };
                if let Some(gate) = graph.gate_mut(v) {
                    gate.set_cnf(triple);
                }
                staged.push(v);
            }
            if !visited.contains(left.var()) {
                queue.push_back(left.var());
            }
            if !visited.contains(right.var()) {
                queue.push_back(right.var());
            }
        }
    }

    // Announce the high-water mark before emission. This also covers the
    // root itself when it is a plain input translated by the caller.
    let high_water = vars.max_nv();
    if high_water > backend.num_vars() {
        backend.new_vars(high_water - backend.num_vars());
    }

    let mut num_clauses = 0u64;
    for &v in &staged {
        let Some((op, Some(triple))) = graph.gate(v).map(|g| (g.op(), g.cnf().copied())) else {
            continue;
        };
        for clause in triple.clauses(op) {
            backend.add_clause(&clause)?;
            num_clauses += 1;
        }
    }
    if !staged.is_empty() {
        debug!(
            root = root_cv,
            gates = staged.len(),
            clauses = num_clauses,
            "encoded reachable gates"
        );
    }
    Ok(num_clauses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::{Gate, GateOp};
    use krets_adapter_dpll::DpllBackend;

    #[test]
    fn test_visited_set() {
        let mut set = VisitedSet::new(130);
        assert!(set.insert(0));
        assert!(set.insert(130));
        assert!(!set.insert(130));
        assert!(set.contains(0));
        assert!(!set.contains(64));
    }

    /// Inputs 1..=3, gate 4 = and(1, 2), gate 5 = or(4, 3).
    fn chain() -> (GateGraph, VarManager) {
        let mut graph = GateGraph::new();
        let mut vars = VarManager::new();
        for _ in 0..3 {
            graph.add_variable(vars.fresh_cv());
        }
        let and = vars.fresh_cv();
        graph.insert_gate(Gate::new(
            GateOp::And,
            Lit::from_var(1),
            Lit::from_var(2),
            and,
        ));
        let or = vars.fresh_cv();
        graph.insert_gate(Gate::new(
            GateOp::Or,
            Lit::from_var(and),
            Lit::from_var(3),
            or,
        ));
        (graph, vars)
    }

    #[test]
    fn test_reaches_transitive_gates() {
        let (mut graph, mut vars) = chain();
        let mut backend = DpllBackend::new();

        let clauses = add_reachable(&mut graph, &mut vars, &mut backend, 5).unwrap();
        // Both gates encode: 3 clauses each.
        assert_eq!(clauses, 6);
        assert_eq!(vars.max_nv(), 5);
        assert_eq!(backend.num_vars(), 5);
        assert!(graph.gate(4).unwrap().is_encoded());
        assert!(graph.gate(5).unwrap().is_encoded());
    }

    #[test]
    fn test_unreached_gate_not_encoded() {
        let (mut graph, mut vars) = chain();
        let mut backend = DpllBackend::new();

        add_reachable(&mut graph, &mut vars, &mut backend, 4).unwrap();
        assert!(graph.gate(4).unwrap().is_encoded());
        assert!(!graph.gate(5).unwrap().is_encoded());
        // Gate 5 was never reached, so only and's three variables exist.
        assert_eq!(vars.max_nv(), 3);
    }

    #[test]
    fn test_idempotent() {
        let (mut graph, mut vars) = chain();
        let mut backend = DpllBackend::new();

        let first = add_reachable(&mut graph, &mut vars, &mut backend, 5).unwrap();
        let second = add_reachable(&mut graph, &mut vars, &mut backend, 5).unwrap();
        assert!(first > 0);
        assert_eq!(second, 0);
        assert_eq!(backend.num_vars(), 5);
    }

    #[test]
    fn test_plain_input_root() {
        let (mut graph, mut vars) = chain();
        let mut backend = DpllBackend::new();

        // Translate the root first, as assert() does, then encode from it.
        vars.cnf_of(Lit::from_var(2));
        let clauses = add_reachable(&mut graph, &mut vars, &mut backend, 2).unwrap();
        assert_eq!(clauses, 0);
        assert_eq!(backend.num_vars(), 1);
    }
}
