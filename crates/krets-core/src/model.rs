//! The circuit model: gate construction, assertions, solving, queries.

use std::time::Duration;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use krets_sat::{CnfLit, SatBackend, SolveOutcome, SolverConfig};

use crate::encode::add_reachable;
use crate::error::{ModelError, ModelResult};
use crate::gate::{Gate, GateOp, canonical_pair};
use crate::graph::GateGraph;
use crate::lit::Lit;
use crate::solution::Solution;
use crate::vars::VarManager;

/// Size counters for a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelStats {
    /// Circuit variables minted (inputs and gate outputs).
    pub num_vars: u32,
    /// Gates in the graph.
    pub num_gates: usize,
    /// CNF variables allocated.
    pub num_cnf_vars: u32,
    /// CNF clauses emitted to the backend.
    pub num_cnf_clauses: u64,
}

/// A combinational circuit model over a SAT backend.
///
/// Clients mint variables with [`var`](CircuitModel::var), combine them
/// with the gate operations, pin facts with
/// [`assert`](CircuitModel::assert) and
/// [`assume`](CircuitModel::assume), and call
/// [`solve`](CircuitModel::solve). After a satisfying solve every variable
/// reachable from the encoded circuit, or computable from it, can be
/// queried, including outputs of gates that never made it into CNF.
///
/// A model is single-threaded; the backend may parallelize internally.
pub struct CircuitModel<B: SatBackend> {
    backend: B,
    vars: VarManager,
    graph: GateGraph,
    /// Assertions already translated; append-only.
    asserts: FxHashSet<CnfLit>,
    /// Assertions not yet emitted as unit clauses.
    pending_asserts: Vec<CnfLit>,
    /// Per-solve hypotheses.
    assumes: FxHashSet<CnfLit>,
    solution: Solution,
    last_outcome: Option<SolveOutcome>,
    num_clauses: u64,
}

impl<B: SatBackend> CircuitModel<B> {
    /// Wrap a backend in a fresh, empty model.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            vars: VarManager::new(),
            graph: GateGraph::new(),
            asserts: FxHashSet::default(),
            pending_asserts: Vec::new(),
            assumes: FxHashSet::default(),
            solution: Solution::new(),
            last_outcome: None,
            num_clauses: 0,
        }
    }

    /// Wrap a backend, applying a construction-time configuration first.
    pub fn with_config(mut backend: B, config: &SolverConfig) -> ModelResult<Self> {
        backend.apply_config(config)?;
        Ok(Self::new(backend))
    }

    /// Bound each following solve by wall-clock time. `None` is unlimited.
    pub fn set_max_time(&mut self, budget: Option<Duration>) {
        self.backend.set_max_time(budget);
    }

    /// Bound each following solve by a conflict count. `None` is unlimited.
    pub fn set_max_conflicts(&mut self, budget: Option<u64>) {
        self.backend.set_max_conflicts(budget);
    }

    /// Mint a fresh circuit variable.
    pub fn var(&mut self) -> Lit {
        let cv = self.vars.fresh_cv();
        self.graph.add_variable(cv);
        Lit::from_var(cv)
    }

    fn check_lit(&self, lit: Lit) -> ModelResult<()> {
        if self.vars.contains(lit.var()) {
            Ok(())
        } else {
            Err(ModelError::UnknownVariable {
                var: lit.var(),
                num_vars: self.vars.num_cvs(),
            })
        }
    }

    /// Create (or reuse) the gate `op(left, right)` and return its output
    /// literal.
    ///
    /// Operand order does not matter: requests equal after positional
    /// canonicalization (including operand signs) share one gate and one
    /// output variable.
    pub fn intern(&mut self, op: GateOp, left: Lit, right: Lit) -> ModelResult<Lit> {
        self.check_lit(left)?;
        self.check_lit(right)?;
        let (left, right) = canonical_pair(left, right);
        if let Some(existing) = self.graph.find_gate(op, left, right) {
            return Ok(Lit::from_var(existing));
        }
        let cv = self.vars.fresh_cv();
        let gate = Gate::new(op, left, right, cv);
        // Keep the live solution closed over the graph as it grows.
        if self.last_outcome == Some(SolveOutcome::Sat) {
            self.solution.extend_gate(&gate);
        }
        self.graph.insert_gate(gate);
        Ok(Lit::from_var(cv))
    }

    /// `left AND right`.
    pub fn and(&mut self, left: Lit, right: Lit) -> ModelResult<Lit> {
        self.intern(GateOp::And, left, right)
    }

    /// `NOT (left AND right)`.
    pub fn nand(&mut self, left: Lit, right: Lit) -> ModelResult<Lit> {
        self.intern(GateOp::Nand, left, right)
    }

    /// `left OR right`.
    pub fn or(&mut self, left: Lit, right: Lit) -> ModelResult<Lit> {
        self.intern(GateOp::Or, left, right)
    }

    /// `NOT (left OR right)`.
    pub fn nor(&mut self, left: Lit, right: Lit) -> ModelResult<Lit> {
        self.intern(GateOp::Nor, left, right)
    }

    /// `left XOR right`.
    pub fn xor(&mut self, left: Lit, right: Lit) -> ModelResult<Lit> {
        self.intern(GateOp::Xor, left, right)
    }

    /// Pin a literal true in every following solve.
    ///
    /// The fact is encoded as a unit clause, so it sticks across solves;
    /// everything reachable from it is encoded immediately.
    pub fn assert(&mut self, lit: Lit) -> ModelResult<()> {
        self.check_lit(lit)?;
        let nv = self.vars.cnf_of(lit);
        if self.asserts.insert(nv) {
            self.pending_asserts.push(nv);
        }
        self.num_clauses +=
            add_reachable(&mut self.graph, &mut self.vars, &mut self.backend, lit.var())?;
        Ok(())
    }

    /// Pin several literals true.
    pub fn assert_many(&mut self, lits: &[Lit]) -> ModelResult<()> {
        for &lit in lits {
            self.assert(lit)?;
        }
        Ok(())
    }

    /// Hypothesize a literal for following solves, until
    /// [`unassume`](CircuitModel::unassume)d.
    ///
    /// Gates reachable from an assumption are encoded at solve time.
    pub fn assume(&mut self, lit: Lit) -> ModelResult<()> {
        self.check_lit(lit)?;
        let nv = self.vars.cnf_of(lit);
        self.assumes.insert(nv);
        Ok(())
    }

    /// Drop both polarities of a variable from the assumption set.
    /// Idempotent; unknown or never-assumed variables are a no-op.
    pub fn unassume(&mut self, lit: Lit) -> ModelResult<()> {
        self.check_lit(lit)?;
        if let Some(nv) = self.vars.peek_cnf_of(lit.var()) {
            self.assumes.remove(&CnfLit::positive(nv));
            self.assumes.remove(&CnfLit::negative(nv));
        }
        Ok(())
    }

    /// Solve under the current assertions and assumptions.
    pub fn solve(&mut self) -> ModelResult<SolveOutcome> {
        self.solve_with(false)
    }

    /// Solve, optionally asking the backend to restrict its model to the
    /// independent support.
    #[instrument(skip(self), fields(backend = self.backend.name()))]
    pub fn solve_with(&mut self, only_indep: bool) -> ModelResult<SolveOutcome> {
        // Flush assertion unit clauses accumulated since the last solve.
        for i in 0..self.pending_asserts.len() {
            self.backend.add_clause(&[self.pending_asserts[i]])?;
            self.num_clauses += 1;
        }
        self.pending_asserts.clear();

        // Assumptions may open subgraphs no assertion ever reached.
        let mut assumptions: Vec<CnfLit> = self.assumes.iter().copied().collect();
        assumptions.sort_unstable();
        for &a in &assumptions {
            if let Some(cv) = self.vars.cv_of_nv(a.var()) {
                self.num_clauses +=
                    add_reachable(&mut self.graph, &mut self.vars, &mut self.backend, cv)?;
            }
        }

        self.solution.clear();
        self.last_outcome = None;
        let outcome = self.backend.solve(&assumptions, only_indep)?;
        self.last_outcome = Some(outcome);
        debug!(%outcome, clauses = self.num_clauses, "solve finished");

        if outcome.is_sat() {
            self.solution.seed_from_model(&self.vars, self.backend.model());
            self.solution.extend(&self.graph);
        }
        Ok(outcome)
    }

    /// Value of a literal after a satisfying solve.
    ///
    /// Fails with [`ModelError::NotSolved`] unless the most recent solve
    /// returned Sat, and with [`ModelError::NoValue`] for a variable
    /// outside both the encoded circuit and the extension closure.
    pub fn val(&self, lit: Lit) -> ModelResult<bool> {
        self.check_lit(lit)?;
        if self.last_outcome != Some(SolveOutcome::Sat) {
            return Err(ModelError::NotSolved);
        }
        self.solution
            .lit_value(lit)
            .ok_or(ModelError::NoValue { var: lit.var() })
    }

    /// Non-failing variant of [`val`](CircuitModel::val): `None` covers
    /// every case in which no value is known.
    pub fn value_of(&self, lit: Lit) -> Option<bool> {
        if self.last_outcome != Some(SolveOutcome::Sat) {
            return None;
        }
        self.solution.lit_value(lit)
    }

    /// The CNF literal behind a circuit literal, if the variable was ever
    /// reached by an assert or assume.
    pub fn cnf(&self, lit: Lit) -> Option<CnfLit> {
        if !self.vars.contains(lit.var()) {
            return None;
        }
        self.vars
            .peek_cnf_of(lit.var())
            .map(|nv| CnfLit::new(nv, lit.is_negated()))
    }

    /// Outcome of the most recent solve, if any.
    pub fn last_outcome(&self) -> Option<SolveOutcome> {
        self.last_outcome
    }

    /// Circuit variables minted (inputs and gate outputs).
    pub fn num_vars(&self) -> u32 {
        self.vars.num_cvs()
    }

    /// Gates in the graph.
    pub fn num_gates(&self) -> usize {
        self.graph.num_gates()
    }

    /// CNF variables allocated so far.
    pub fn num_cnf_vars(&self) -> u32 {
        self.vars.max_nv()
    }

    /// CNF clauses emitted to the backend so far.
    pub fn num_cnf_clauses(&self) -> u64 {
        self.num_clauses
    }

    /// All size counters in one record.
    pub fn stats(&self) -> ModelStats {
        ModelStats {
            num_vars: self.num_vars(),
            num_gates: self.num_gates(),
            num_cnf_vars: self.num_cnf_vars(),
            num_cnf_clauses: self.num_cnf_clauses(),
        }
    }

    /// All gates, in insertion order.
    pub fn gates(&self) -> impl Iterator<Item = &Gate> + '_ {
        self.graph.gates()
    }

    /// The wrapped backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }
}
