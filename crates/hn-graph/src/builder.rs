//! Two-pass graph builder.
//!
//! Pass one declares nodes and elements; element endpoints may be given by
//! name before the node itself is declared. Pass two (`build`) resolves every
//! endpoint, registers each element on both of its nodes and freezes the
//! result into an immutable [`Graph`].

use std::collections::HashMap;

use hn_core::{ElemId, NodeId};

use crate::error::{GraphError, GraphResult};
use crate::graph::{Element, Graph, Node};
use crate::validate;

/// Reference to a node, either already resolved or by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeRef {
    Id(NodeId),
    Name(String),
}

impl From<NodeId> for NodeRef {
    fn from(id: NodeId) -> Self {
        NodeRef::Id(id)
    }
}

impl From<&str> for NodeRef {
    fn from(name: &str) -> Self {
        NodeRef::Name(name.to_string())
    }
}

impl From<String> for NodeRef {
    fn from(name: String) -> Self {
        NodeRef::Name(name)
    }
}

#[derive(Debug)]
struct PendingElement {
    name: String,
    inlet: NodeRef,
    outlet: NodeRef,
}

/// Builder for constructing a graph incrementally.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<Node>,
    pending: Vec<PendingElement>,
}

impl GraphBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a node and return its ID.
    pub fn add_node(&mut self, name: impl Into<String>) -> NodeId {
        let id = NodeId::from_usize(self.nodes.len());
        self.nodes.push(Node {
            id,
            name: name.into(),
        });
        id
    }

    /// Declare an element between two nodes and return its ID.
    ///
    /// Endpoints are resolved in `build()`.
    pub fn add_element(
        &mut self,
        name: impl Into<String>,
        inlet: impl Into<NodeRef>,
        outlet: impl Into<NodeRef>,
    ) -> ElemId {
        let id = ElemId::from_usize(self.pending.len());
        self.pending.push(PendingElement {
            name: name.into(),
            inlet: inlet.into(),
            outlet: outlet.into(),
        });
        id
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn element_count(&self) -> usize {
        self.pending.len()
    }

    /// Resolve all references, validate, and freeze the graph.
    pub fn build(self) -> GraphResult<Graph> {
        let node_names = index_names("node", self.nodes.iter().map(|n| (n.name.as_str(), n.id)))?;

        let mut elements = Vec::with_capacity(self.pending.len());
        for (i, p) in self.pending.into_iter().enumerate() {
            let inlet = resolve(&node_names, &p.name, &p.inlet)?;
            let outlet = resolve(&node_names, &p.name, &p.outlet)?;
            elements.push(Element {
                id: ElemId::from_usize(i),
                name: p.name,
                inlet,
                outlet,
            });
        }
        let element_names =
            index_names("element", elements.iter().map(|e| (e.name.as_str(), e.id)))?;

        validate::validate_structure(&self.nodes, &elements)?;

        let (inlet_offsets, inlet_elems) =
            Self::build_adjacency(self.nodes.len(), &elements, |e| e.outlet);
        let (outlet_offsets, outlet_elems) =
            Self::build_adjacency(self.nodes.len(), &elements, |e| e.inlet);

        validate::validate_adjacency(&self.nodes, &elements, &inlet_offsets, &inlet_elems, |e| {
            e.outlet
        })?;
        validate::validate_adjacency(
            &self.nodes,
            &elements,
            &outlet_offsets,
            &outlet_elems,
            |e| e.inlet,
        )?;

        Ok(Graph {
            nodes: self.nodes,
            elements,
            inlet_offsets,
            inlet_elems,
            outlet_offsets,
            outlet_elems,
            node_names,
            element_names,
        })
    }

    /// Build compact adjacency lists keyed by `endpoint(element)`.
    ///
    /// Elements are visited in ID order, so each node's list keeps
    /// declaration order.
    fn build_adjacency(
        node_count: usize,
        elements: &[Element],
        endpoint: impl Fn(&Element) -> NodeId,
    ) -> (Vec<usize>, Vec<ElemId>) {
        let mut per_node: Vec<Vec<ElemId>> = vec![Vec::new(); node_count];
        for e in elements {
            per_node[endpoint(e).idx()].push(e.id);
        }

        let mut offsets = Vec::with_capacity(node_count + 1);
        let mut flat = Vec::with_capacity(elements.len());
        offsets.push(0);
        for list in per_node {
            flat.extend(list);
            offsets.push(flat.len());
        }
        (offsets, flat)
    }
}

fn index_names<'a, I>(kind: &'static str, items: I) -> GraphResult<HashMap<String, hn_core::Id>>
where
    I: Iterator<Item = (&'a str, hn_core::Id)>,
{
    let mut map = HashMap::new();
    for (name, id) in items {
        if map.insert(name.to_string(), id).is_some() {
            return Err(GraphError::DuplicateName {
                kind,
                name: name.to_string(),
            });
        }
    }
    Ok(map)
}

fn resolve(
    names: &HashMap<String, NodeId>,
    element: &str,
    node: &NodeRef,
) -> GraphResult<NodeId> {
    match node {
        NodeRef::Id(id) => Ok(*id),
        NodeRef::Name(name) => {
            names
                .get(name)
                .copied()
                .ok_or_else(|| GraphError::UnresolvedNode {
                    element: element.to_string(),
                    node: name.clone(),
                })
        }
    }
}
