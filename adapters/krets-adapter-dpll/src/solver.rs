//! DPLL search with two-watched-literal propagation.

use std::time::{Duration, Instant};

use tracing::{debug, instrument, trace};

use krets_sat::{CnfLit, Lbool, SatBackend, SolveOutcome, SolverConfig, SolverError, SolverResult};

/// A stored clause. Clauses of length one live in the unit list instead;
/// everything here has at least two literals, watched at positions 0 and 1.
struct Clause {
    lits: Vec<CnfLit>,
}

/// Self-contained DPLL backend.
///
/// Implements [`SatBackend`] with an iterative search over an explicit
/// trail. Assumptions are installed as bottom decisions the search is not
/// allowed to flip; a conflict that would require flipping one makes the
/// instance unsatisfiable under those assumptions.
pub struct DpllBackend {
    num_vars: u32,
    /// Clauses with two or more literals.
    clauses: Vec<Clause>,
    /// Unit clauses, replayed at the start of every solve.
    units: Vec<CnfLit>,
    /// Watch lists, indexed by literal (see [`watch_index`]).
    watches: Vec<Vec<usize>>,
    /// Current assignment, indexed by `var - 1`.
    assign: Vec<Lbool>,
    /// Assignment trail, in propagation order.
    trail: Vec<CnfLit>,
    /// Start index in `trail` of each decision level.
    trail_lim: Vec<usize>,
    /// Per decision level: whether the other polarity has been exhausted.
    /// Assumption levels are born exhausted so the search never flips them.
    flipped: Vec<bool>,
    /// Next trail position to propagate.
    prop_head: usize,
    /// Model of the last Sat outcome, indexed by `var - 1`.
    model: Vec<Lbool>,
    /// An empty clause was added; the formula is permanently unsatisfiable.
    empty_clause: bool,
    max_time: Option<Duration>,
    max_conflicts: Option<u64>,
    num_threads: u32,
    allow_otf_gauss: bool,
    /// Lifetime conflict count, for diagnostics.
    conflicts_total: u64,
}

/// Position of a literal's watch list.
#[inline]
fn watch_index(lit: CnfLit) -> usize {
    (lit.var() as usize - 1) * 2 + usize::from(lit.is_negated())
}

impl DpllBackend {
    /// Create a new backend with default configuration.
    pub fn new() -> Self {
        Self {
            num_vars: 0,
            clauses: Vec::new(),
            units: Vec::new(),
            watches: Vec::new(),
            assign: Vec::new(),
            trail: Vec::new(),
            trail_lim: Vec::new(),
            flipped: Vec::new(),
            prop_head: 0,
            model: Vec::new(),
            empty_clause: false,
            max_time: None,
            max_conflicts: None,
            num_threads: 1,
            allow_otf_gauss: false,
            conflicts_total: 0,
        }
    }

    /// Create a backend and apply a configuration.
    pub fn with_config(config: &SolverConfig) -> SolverResult<Self> {
        let mut solver = Self::new();
        solver.apply_config(config)?;
        Ok(solver)
    }

    /// Total conflicts encountered over the backend's lifetime.
    pub fn total_conflicts(&self) -> u64 {
        self.conflicts_total
    }

    /// Configured worker thread count. This backend always searches on one
    /// thread; the setting is recorded for conforming callers.
    pub fn num_threads(&self) -> u32 {
        self.num_threads
    }

    /// Whether on-the-fly Gaussian elimination was requested.
    pub fn allow_otf_gauss(&self) -> bool {
        self.allow_otf_gauss
    }

    /// Whether construction-time settings can no longer change.
    fn config_frozen(&self) -> bool {
        !self.clauses.is_empty() || !self.units.is_empty() || self.empty_clause
    }

    /// Current value of a literal under the partial assignment.
    #[inline]
    fn value(&self, lit: CnfLit) -> Lbool {
        match self.assign[lit.var() as usize - 1] {
            Lbool::Undef => Lbool::Undef,
            Lbool::True => Lbool::from(!lit.is_negated()),
            Lbool::False => Lbool::from(lit.is_negated()),
        }
    }

    /// Assign a literal true and push it on the trail.
    #[inline]
    fn enqueue(&mut self, lit: CnfLit) {
        self.assign[lit.var() as usize - 1] = Lbool::from(!lit.is_negated());
        self.trail.push(lit);
    }

    fn decision_level(&self) -> usize {
        self.trail_lim.len()
    }

    /// Open a decision level. `exhausted` marks it as having no second
    /// branch (used for assumptions and already-flipped decisions).
    fn new_level(&mut self, exhausted: bool) {
        self.trail_lim.push(self.trail.len());
        self.flipped.push(exhausted);
    }

    /// Undo all assignments above `level`.
    fn backtrack_to(&mut self, level: usize) {
        while self.trail_lim.len() > level {
            let start = self.trail_lim[self.trail_lim.len() - 1];
            while self.trail.len() > start {
                if let Some(lit) = self.trail.pop() {
                    self.assign[lit.var() as usize - 1] = Lbool::Undef;
                }
            }
            self.trail_lim.pop();
            self.flipped.pop();
        }
        self.prop_head = self.trail.len();
    }

    /// Clear the trail entirely, including level-0 assignments.
    fn reset_search(&mut self) {
        self.backtrack_to(0);
        while let Some(lit) = self.trail.pop() {
            self.assign[lit.var() as usize - 1] = Lbool::Undef;
        }
        self.prop_head = 0;
    }

    /// Exhaustively propagate unit consequences of the trail.
    ///
    /// Returns `true` on conflict.
    fn propagate(&mut self) -> bool {
        while self.prop_head < self.trail.len() {
            let lit = self.trail[self.prop_head];
            self.prop_head += 1;
            // Clauses watching the falsified polarity need attention.
            let false_lit = -lit;
            let widx = watch_index(false_lit);
            let mut i = 0;
            'clauses: while i < self.watches[widx].len() {
                let ci = self.watches[widx][i];
                if self.clauses[ci].lits[0] == false_lit {
                    self.clauses[ci].lits.swap(0, 1);
                }
                let first = self.clauses[ci].lits[0];
                if self.value(first) == Lbool::True {
                    i += 1;
                    continue;
                }
                // Look for a non-false replacement watch.
                for k in 2..self.clauses[ci].lits.len() {
                    let cand = self.clauses[ci].lits[k];
                    if self.value(cand) != Lbool::False {
                        self.clauses[ci].lits.swap(1, k);
                        self.watches[widx].swap_remove(i);
                        self.watches[watch_index(cand)].push(ci);
                        continue 'clauses;
                    }
                }
                // Clause is unit on `first`, or conflicting.
                if self.value(first) == Lbool::False {
                    return true;
                }
                self.enqueue(first);
                i += 1;
            }
        }
        false
    }

    /// First unassigned variable, if any.
    fn pick_branch_var(&self) -> Option<u32> {
        self.assign
            .iter()
            .position(|v| *v == Lbool::Undef)
            .map(|idx| idx as u32 + 1)
    }

    fn budget_exhausted(&self, started: Instant, conflicts: u64) -> bool {
        if self.max_conflicts.is_some_and(|max| conflicts >= max) {
            return true;
        }
        self.max_time.is_some_and(|max| started.elapsed() >= max)
    }
}

impl Default for DpllBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SatBackend for DpllBackend {
    fn name(&self) -> &str {
        "dpll"
    }

    fn new_vars(&mut self, n: u32) {
        self.num_vars += n;
        self.assign.resize(self.num_vars as usize, Lbool::Undef);
        self.watches.resize(self.num_vars as usize * 2, Vec::new());
    }

    fn num_vars(&self) -> u32 {
        self.num_vars
    }

    fn add_clause(&mut self, lits: &[CnfLit]) -> SolverResult<()> {
        for lit in lits {
            if lit.var() > self.num_vars {
                return Err(SolverError::UnknownVariable {
                    var: lit.var(),
                    num_vars: self.num_vars,
                });
            }
        }

        let mut lits = lits.to_vec();
        lits.sort_by_key(|l| (l.var(), l.is_negated()));
        lits.dedup();
        // A clause containing both polarities of a variable is vacuous.
        if lits.windows(2).any(|w| w[0].var() == w[1].var()) {
            trace!("skipping tautological clause");
            return Ok(());
        }

        match lits.len() {
            0 => self.empty_clause = true,
            1 => self.units.push(lits[0]),
            _ => {
                let ci = self.clauses.len();
                self.watches[watch_index(lits[0])].push(ci);
                self.watches[watch_index(lits[1])].push(ci);
                self.clauses.push(Clause { lits });
            }
        }
        Ok(())
    }

    #[instrument(skip(self, assumptions), fields(num_vars = self.num_vars, num_clauses = self.clauses.len()))]
    fn solve(&mut self, assumptions: &[CnfLit], only_indep: bool) -> SolverResult<SolveOutcome> {
        let started = Instant::now();
        let mut conflicts: u64 = 0;
        self.model.clear();
        if only_indep {
            trace!("independent-support restriction not tracked; reporting full model");
        }

        if self.empty_clause {
            return Ok(SolveOutcome::Unsat);
        }
        for a in assumptions {
            if a.var() > self.num_vars {
                return Err(SolverError::UnknownVariable {
                    var: a.var(),
                    num_vars: self.num_vars,
                });
            }
        }

        // Replay from a clean trail: unit clauses first, then assumptions,
        // each assumption at its own unflippable level.
        self.reset_search();
        for i in 0..self.units.len() {
            let unit = self.units[i];
            match self.value(unit) {
                Lbool::True => {}
                Lbool::False => return Ok(SolveOutcome::Unsat),
                Lbool::Undef => self.enqueue(unit),
            }
        }
        if self.propagate() {
            return Ok(SolveOutcome::Unsat);
        }
        for &a in assumptions {
            match self.value(a) {
                Lbool::True => {}
                Lbool::False => return Ok(SolveOutcome::Unsat),
                Lbool::Undef => {
                    self.new_level(true);
                    self.enqueue(a);
                    if self.propagate() {
                        return Ok(SolveOutcome::Unsat);
                    }
                }
            }
        }
        let assumption_level = self.decision_level();

        loop {
            if self.propagate() {
                conflicts += 1;
                self.conflicts_total += 1;
                if self.budget_exhausted(started, conflicts) {
                    debug!(conflicts, elapsed = ?started.elapsed(), "budget exhausted");
                    return Ok(SolveOutcome::Unknown);
                }
                // Chronological backtracking: find the deepest decision
                // that still has an untried polarity.
                let mut level = self.decision_level();
                while level > assumption_level && self.flipped[level - 1] {
                    level -= 1;
                }
                if level <= assumption_level {
                    debug!(conflicts, "exhausted search tree");
                    return Ok(SolveOutcome::Unsat);
                }
                let decision = self.trail[self.trail_lim[level - 1]];
                self.backtrack_to(level - 1);
                self.new_level(true);
                self.enqueue(-decision);
            } else {
                match self.pick_branch_var() {
                    None => {
                        self.model = self.assign.clone();
                        debug!(conflicts, decisions = self.decision_level(), "satisfiable");
                        return Ok(SolveOutcome::Sat);
                    }
                    Some(var) => {
                        self.new_level(false);
                        self.enqueue(CnfLit::negative(var));
                    }
                }
            }
        }
    }

    fn model(&self) -> &[Lbool] {
        &self.model
    }

    fn set_max_time(&mut self, budget: Option<Duration>) {
        self.max_time = budget;
    }

    fn set_max_conflicts(&mut self, budget: Option<u64>) {
        self.max_conflicts = budget;
    }

    fn set_num_threads(&mut self, num_threads: u32) -> SolverResult<()> {
        if self.config_frozen() {
            return Err(SolverError::ConfigAfterClause {
                setting: "num_threads",
            });
        }
        if num_threads == 0 {
            return Err(SolverError::Unsupported(
                "at least one worker thread is required".into(),
            ));
        }
        if num_threads > 1 {
            debug!(num_threads, "single-threaded backend; extra workers ignored");
        }
        self.num_threads = num_threads;
        Ok(())
    }

    fn set_allow_otf_gauss(&mut self, allow: bool) -> SolverResult<()> {
        if self.config_frozen() {
            return Err(SolverError::ConfigAfterClause {
                setting: "allow_otf_gauss",
            });
        }
        if allow {
            debug!("Gaussian elimination not implemented; setting recorded only");
        }
        self.allow_otf_gauss = allow;
        Ok(())
    }
}
