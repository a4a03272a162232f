//! Graph-specific error types.

use hn_core::{ElemId, HnError, NodeId};

pub type GraphResult<T> = Result<T, GraphError>;

/// Graph construction and validation errors.
///
/// All of these are configuration errors: they are raised while the
/// graph is being frozen, never during a simulation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// Two objects of the same kind share a name.
    DuplicateName { kind: &'static str, name: String },

    /// An element names an inlet or outlet node that was never declared.
    UnresolvedNode { element: String, node: String },

    /// An element refers to a node id outside the node table.
    InvalidNodeRef { element: ElemId, node: NodeId },

    /// An element uses the same node as inlet and outlet.
    SelfLoop { element: String },

    /// Adjacency list is inconsistent with element endpoints.
    InconsistentAdjacency { element: ElemId, node: NodeId },
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::DuplicateName { kind, name } => {
                write!(f, "Duplicate {} name '{}'", kind, name)
            }
            GraphError::UnresolvedNode { element, node } => {
                write!(f, "Element '{}' refers to unknown node '{}'", element, node)
            }
            GraphError::InvalidNodeRef { element, node } => {
                write!(f, "Element {} refers to non-existent node {}", element, node)
            }
            GraphError::SelfLoop { element } => {
                write!(f, "Element '{}' uses the same node as inlet and outlet", element)
            }
            GraphError::InconsistentAdjacency { element, node } => {
                write!(
                    f,
                    "Element {} in node {}'s adjacency list but doesn't reference that node",
                    element, node
                )
            }
        }
    }
}

impl std::error::Error for GraphError {}

impl From<GraphError> for HnError {
    fn from(err: GraphError) -> Self {
        HnError::Invariant {
            what: err.to_string(),
        }
    }
}
