//! Core topology data structures.

use std::collections::HashMap;

use hn_core::{ElemId, NodeId};

/// A fluid junction in the network.
///
/// Topology only: pressure and temperature state lives in the simulation
/// layer, keyed by the same [`NodeId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
}

/// A flow-carrying device between exactly one inlet and one outlet node.
///
/// Positive flow moves fluid inlet → outlet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub id: ElemId,
    pub name: String,
    pub inlet: NodeId,
    pub outlet: NodeId,
}

/// The frozen graph: a validated, immutable collection of nodes and elements.
///
/// For each node the graph stores two ordered adjacency lists:
/// - inlet elements: elements whose outlet is this node (flow sources)
/// - outlet elements: elements whose inlet is this node (flow sinks)
///
/// Both lists keep element declaration order, so every sum over them is
/// evaluated in the same order on every step.
#[derive(Debug, Clone)]
pub struct Graph {
    pub(crate) nodes: Vec<Node>,
    pub(crate) elements: Vec<Element>,

    /// Node i's inlet elements are `inlet_elems[inlet_offsets[i]..inlet_offsets[i + 1]]`.
    pub(crate) inlet_offsets: Vec<usize>,
    pub(crate) inlet_elems: Vec<ElemId>,

    /// Node i's outlet elements, same layout as the inlet lists.
    pub(crate) outlet_offsets: Vec<usize>,
    pub(crate) outlet_elems: Vec<ElemId>,

    pub(crate) node_names: HashMap<String, NodeId>,
    pub(crate) element_names: HashMap<String, ElemId>,
}

impl Graph {
    /// Return all nodes.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Return all elements.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Get a node by ID (returns None if ID out of bounds).
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.idx())
    }

    /// Get an element by ID (returns None if ID out of bounds).
    pub fn element(&self, id: ElemId) -> Option<&Element> {
        self.elements.get(id.idx())
    }

    pub fn node_by_name(&self, name: &str) -> Option<NodeId> {
        self.node_names.get(name).copied()
    }

    pub fn element_by_name(&self, name: &str) -> Option<ElemId> {
        self.element_names.get(name).copied()
    }

    /// Elements that discharge into `node`.
    pub fn inlet_elements(&self, node: NodeId) -> &[ElemId] {
        slice_for(&self.inlet_offsets, &self.inlet_elems, node)
    }

    /// Elements that draw from `node`.
    pub fn outlet_elements(&self, node: NodeId) -> &[ElemId] {
        slice_for(&self.outlet_offsets, &self.outlet_elems, node)
    }
}

fn slice_for<'a>(offsets: &[usize], flat: &'a [ElemId], node: NodeId) -> &'a [ElemId] {
    let idx = node.idx();
    if idx + 1 >= offsets.len() {
        return &[];
    }
    &flat[offsets[idx]..offsets[idx + 1]]
}
