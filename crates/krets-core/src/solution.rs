//! Solution storage and extension across unencoded gates.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;
use tracing::debug;

use krets_sat::Lbool;

use crate::encode::VisitedSet;
use crate::gate::Gate;
use crate::graph::GateGraph;
use crate::lit::Lit;
use crate::vars::VarManager;

/// Per-variable boolean solution, keyed by positive circuit variable.
///
/// Seeded from the backend model after a satisfying solve, then closed over
/// the gate graph: a gate whose operands are both valued gets its output
/// valued by direct evaluation, whether or not the gate was ever encoded.
#[derive(Debug, Default)]
pub(crate) struct Solution {
    values: FxHashMap<u32, bool>,
}

impl Solution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Value of a positive circuit variable.
    pub fn get(&self, cv: u32) -> Option<bool> {
        self.values.get(&cv).copied()
    }

    /// Value of a literal; a negative literal complements its variable.
    pub fn lit_value(&self, lit: Lit) -> Option<bool> {
        self.get(lit.var()).map(|value| value ^ lit.is_negated())
    }

    /// Record the backend model for every circuit variable that has a CNF
    /// counterpart. Unassigned backend entries are skipped.
    pub fn seed_from_model(&mut self, vars: &VarManager, model: &[Lbool]) {
        for (idx, entry) in model.iter().enumerate() {
            if let Some(value) = entry.to_bool() {
                if let Some(cv) = vars.cv_of_nv(idx as u32 + 1) {
                    self.values.insert(cv, value);
                }
            }
        }
    }

    /// Close the solution over the gate graph.
    ///
    /// Propagates forward from every valued variable until no gate with two
    /// valued operands lacks an output value.
    pub fn extend(&mut self, graph: &GateGraph) {
        let before = self.values.len();
        let mut visited = VisitedSet::new(graph.num_vars() as u32);
        let mut queue: VecDeque<u32> = graph.vars_with_consumers().collect();

        while let Some(v) = queue.pop_front() {
            if !visited.insert(v) {
                continue;
            }
            for gate in graph.consumers(v) {
                if self.values.contains_key(&gate.value()) {
                    continue;
                }
                if let Some(value) = self.eval_gate(gate) {
                    self.values.insert(gate.value(), value);
                    queue.push_back(gate.value());
                }
            }
        }
        debug!(
            seeded = before,
            extended = self.values.len() - before,
            "extended solution over gate graph"
        );
    }

    /// Value a single gate whose operands may already be known. Used when a
    /// gate is created while a solution is live, so a query immediately
    /// after construction matches a re-solve.
    pub fn extend_gate(&mut self, gate: &Gate) {
        if self.values.contains_key(&gate.value()) {
            return;
        }
        if let Some(value) = self.eval_gate(gate) {
            self.values.insert(gate.value(), value);
        }
    }

    fn eval_gate(&self, gate: &Gate) -> Option<bool> {
        let left = self.get(gate.left().var())?;
        let right = self.get(gate.right().var())?;
        Some(gate.eval(left, right))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::GateOp;

    fn lit(var: u32) -> Lit {
        Lit::from_var(var)
    }

    #[test]
    fn test_lit_value_sign() {
        let mut solution = Solution::new();
        solution.values.insert(1, true);
        assert_eq!(solution.lit_value(lit(1)), Some(true));
        assert_eq!(solution.lit_value(-lit(1)), Some(false));
        assert_eq!(solution.lit_value(lit(2)), None);
    }

    #[test]
    fn test_extension_cascades() {
        // 3 = and(1, 2), 4 = or(3, 1), 5 = xor(4, 2); only inputs valued.
        let mut graph = GateGraph::new();
        graph.add_variable(1);
        graph.add_variable(2);
        graph.insert_gate(Gate::new(GateOp::And, lit(1), lit(2), 3));
        graph.insert_gate(Gate::new(GateOp::Or, lit(3), lit(1), 4));
        graph.insert_gate(Gate::new(GateOp::Xor, lit(4), lit(2), 5));

        let mut solution = Solution::new();
        solution.values.insert(1, true);
        solution.values.insert(2, false);
        solution.extend(&graph);

        assert_eq!(solution.get(3), Some(false));
        assert_eq!(solution.get(4), Some(true));
        assert_eq!(solution.get(5), Some(true));
    }

    #[test]
    fn test_partial_inputs_stay_unvalued() {
        let mut graph = GateGraph::new();
        graph.add_variable(1);
        graph.add_variable(2);
        graph.insert_gate(Gate::new(GateOp::And, lit(1), lit(2), 3));

        let mut solution = Solution::new();
        solution.values.insert(1, true);
        solution.extend(&graph);
        assert_eq!(solution.get(3), None);
    }

    #[test]
    fn test_operand_signs_respected() {
        let mut graph = GateGraph::new();
        graph.add_variable(1);
        graph.add_variable(2);
        graph.insert_gate(Gate::new(GateOp::And, -lit(1), lit(2), 3));

        let mut solution = Solution::new();
        solution.values.insert(1, false);
        solution.values.insert(2, true);
        solution.extend(&graph);
        assert_eq!(solution.get(3), Some(true));
    }

    #[test]
    fn test_extend_single_gate() {
        let mut solution = Solution::new();
        solution.values.insert(1, true);
        solution.values.insert(2, true);

        let gate = Gate::new(GateOp::Nand, lit(1), lit(2), 3);
        solution.extend_gate(&gate);
        assert_eq!(solution.get(3), Some(false));

        let orphan = Gate::new(GateOp::And, lit(1), lit(4), 5);
        solution.extend_gate(&orphan);
        assert_eq!(solution.get(5), None);
    }
}
