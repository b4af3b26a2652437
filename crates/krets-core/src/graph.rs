//! The gate graph: owning container, dedup lookup, operand index.

use petgraph::graph::{DiGraph, NodeIndex};

use crate::gate::{Gate, GateOp};
use crate::lit::Lit;

/// A node is either a plain input variable or a gate output carrying its
/// gate record.
#[derive(Debug)]
enum NodeKind {
    Input,
    Gate(Gate),
}

/// Owning container for all gates of a model.
///
/// Every circuit variable is a node; node `cv - 1` is variable `cv`, and
/// nodes are never removed, so the correspondence is stable. A gate output
/// node carries the gate record (the value index); an edge from an operand
/// variable to a gate output realizes the operand index, so the consumers
/// of a variable are its out-neighborhood.
#[derive(Debug, Default)]
pub(crate) struct GateGraph {
    graph: DiGraph<NodeKind, ()>,
    num_gates: usize,
}

impl GateGraph {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn node(cv: u32) -> NodeIndex {
        NodeIndex::new(cv as usize - 1)
    }

    /// Register a freshly minted input variable.
    ///
    /// Seeds the (empty) operand neighborhood, so later lookups need no
    /// existence check.
    pub fn add_variable(&mut self, cv: u32) {
        let idx = self.graph.add_node(NodeKind::Input);
        debug_assert_eq!(idx.index() + 1, cv as usize);
    }

    /// Number of circuit variables known to the graph.
    pub fn num_vars(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of gates in the graph.
    pub fn num_gates(&self) -> usize {
        self.num_gates
    }

    /// The gate whose output is `cv`, if `cv` is a gate output.
    pub fn gate(&self, cv: u32) -> Option<&Gate> {
        match self.graph.node_weight(Self::node(cv))? {
            NodeKind::Input => None,
            NodeKind::Gate(gate) => Some(gate),
        }
    }

    /// Mutable access to the gate whose output is `cv`.
    pub fn gate_mut(&mut self, cv: u32) -> Option<&mut Gate> {
        match self.graph.node_weight_mut(Self::node(cv))? {
            NodeKind::Input => None,
            NodeKind::Gate(gate) => Some(gate),
        }
    }

    /// Deduplication lookup for a canonicalized request.
    ///
    /// Scans the smaller of the two operand neighborhoods; equality
    /// includes operand signs.
    pub fn find_gate(&self, op: GateOp, left: Lit, right: Lit) -> Option<u32> {
        let ln = Self::node(left.var());
        let rn = Self::node(right.var());
        let scan = if self.graph.edges(ln).count() <= self.graph.edges(rn).count() {
            ln
        } else {
            rn
        };
        self.graph.neighbors(scan).find_map(|n| {
            match &self.graph[n] {
                NodeKind::Gate(gate) if gate.matches(op, left, right) => Some(gate.value()),
                _ => None,
            }
        })
    }

    /// Insert a new gate whose output variable was just minted.
    pub fn insert_gate(&mut self, gate: Gate) {
        let value = gate.value();
        let lv = gate.left().var();
        let rv = gate.right().var();
        let idx = self.graph.add_node(NodeKind::Gate(gate));
        debug_assert_eq!(idx.index() + 1, value as usize);
        self.graph.add_edge(Self::node(lv), idx, ());
        if rv != lv {
            self.graph.add_edge(Self::node(rv), idx, ());
        }
        self.num_gates += 1;
    }

    /// The gates that use `cv` as an operand.
    pub fn consumers(&self, cv: u32) -> impl Iterator<Item = &Gate> + '_ {
        self.graph
            .neighbors(Self::node(cv))
            .filter_map(|n| match &self.graph[n] {
                NodeKind::Gate(gate) => Some(gate),
                NodeKind::Input => None,
            })
    }

    /// All gates, in insertion order.
    pub fn gates(&self) -> impl Iterator<Item = &Gate> + '_ {
        self.graph.node_weights().filter_map(|w| match w {
            NodeKind::Gate(gate) => Some(gate),
            NodeKind::Input => None,
        })
    }

    /// Variables that appear as an operand of at least one gate.
    pub fn vars_with_consumers(&self) -> impl Iterator<Item = u32> + '_ {
        self.graph.node_indices().filter_map(|n| {
            if self.graph.neighbors(n).next().is_some() {
                Some(n.index() as u32 + 1)
            } else {
                None
            }
        })
    }
}
