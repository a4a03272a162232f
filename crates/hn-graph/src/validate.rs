//! Graph validation logic.

use crate::error::{GraphError, GraphResult};
use crate::graph::{Element, Node};
use hn_core::{ElemId, NodeId};

/// Validate the resolved structure: every endpoint exists and no element
/// loops back onto its own inlet.
pub(crate) fn validate_structure(nodes: &[Node], elements: &[Element]) -> GraphResult<()> {
    for elem in elements {
        for node in [elem.inlet, elem.outlet] {
            if node.idx() >= nodes.len() {
                return Err(GraphError::InvalidNodeRef {
                    element: elem.id,
                    node,
                });
            }
        }
        if elem.inlet == elem.outlet {
            return Err(GraphError::SelfLoop {
                element: elem.name.clone(),
            });
        }
    }

    Ok(())
}

/// Validate that an adjacency list agrees with element endpoints.
///
/// Every listed element must point at the node it is listed under, and
/// every element must be listed exactly once.
pub(crate) fn validate_adjacency(
    nodes: &[Node],
    elements: &[Element],
    offsets: &[usize],
    flat: &[ElemId],
    endpoint: impl Fn(&Element) -> NodeId,
) -> GraphResult<()> {
    let mut seen = vec![false; elements.len()];
    for node in nodes {
        let i = node.id.idx();
        for &elem_id in &flat[offsets[i]..offsets[i + 1]] {
            let elem = &elements[elem_id.idx()];
            if endpoint(elem) != node.id || seen[elem_id.idx()] {
                return Err(GraphError::InconsistentAdjacency {
                    element: elem_id,
                    node: node.id,
                });
            }
            seen[elem_id.idx()] = true;
        }
    }
    if let Some(missing) = seen.iter().position(|s| !s) {
        let elem = &elements[missing];
        return Err(GraphError::InconsistentAdjacency {
            element: elem.id,
            node: endpoint(elem),
        });
    }
    Ok(())
}
