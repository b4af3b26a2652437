//! Circuit and CNF variable management.

use rustc_hash::FxHashMap;

use krets_sat::CnfLit;

use crate::lit::Lit;

/// Allocator for circuit variables and the lazy bijection onto CNF
/// variables.
///
/// Both namespaces are 1-based. A circuit variable gets a CNF counterpart
/// only when the model first needs to speak about it to the backend; the
/// mapping is injective in both directions and never revoked.
#[derive(Debug, Default)]
pub(crate) struct VarManager {
    /// Number of circuit variables minted so far.
    num_cvs: u32,
    /// Forward mapping, positive ids only.
    cv_to_nv: FxHashMap<u32, u32>,
    /// Inverse mapping; entry `nv - 1` holds the circuit variable.
    nv_to_cv: Vec<u32>,
}

impl VarManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint the next circuit variable.
    pub fn fresh_cv(&mut self) -> u32 {
        self.num_cvs += 1;
        self.num_cvs
    }

    /// Number of circuit variables minted so far.
    pub fn num_cvs(&self) -> u32 {
        self.num_cvs
    }

    /// Whether `cv` has been minted.
    pub fn contains(&self, cv: u32) -> bool {
        cv != 0 && cv <= self.num_cvs
    }

    /// Translate a circuit literal into the CNF namespace, minting a CNF
    /// variable on first contact. The sign is preserved.
    ///
    /// This is the only path by which the CNF namespace grows.
    pub fn cnf_of(&mut self, lit: Lit) -> CnfLit {
        debug_assert!(self.contains(lit.var()));
        let nv = match self.cv_to_nv.get(&lit.var()) {
            Some(&nv) => nv,
            None => {
                self.nv_to_cv.push(lit.var());
                let nv = self.nv_to_cv.len() as u32;
                self.cv_to_nv.insert(lit.var(), nv);
                nv
            }
        };
        CnfLit::new(nv, lit.is_negated())
    }

    /// Look up a circuit variable's CNF counterpart without minting.
    pub fn peek_cnf_of(&self, cv: u32) -> Option<u32> {
        self.cv_to_nv.get(&cv).copied()
    }

    /// Inverse lookup: the circuit variable behind a CNF variable.
    pub fn cv_of_nv(&self, nv: u32) -> Option<u32> {
        if nv == 0 {
            return None;
        }
        self.nv_to_cv.get(nv as usize - 1).copied()
    }

    /// Highest CNF variable ever allocated.
    pub fn max_nv(&self) -> u32 {
        self.nv_to_cv.len() as u32
    }
}
