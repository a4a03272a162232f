//! hn-graph: network topology layer for hydronet.
//!
//! Provides:
//! - Core topology data structures (Node, Element, Graph)
//! - Two-pass builder: declare nodes and elements, then resolve
//!   every inlet/outlet reference by name and freeze the graph
//! - Per-node inlet/outlet element adjacency in declaration order
//!
//! # Example
//!
//! ```
//! use hn_graph::GraphBuilder;
//!
//! let mut builder = GraphBuilder::new();
//! builder.add_node("Supply");
//! builder.add_node("Return");
//! let pipe = builder.add_element("Main", "Supply", "Return");
//! let graph = builder.build().unwrap();
//!
//! let ret = graph.node_by_name("Return").unwrap();
//! assert_eq!(graph.inlet_elements(ret), &[pipe]);
//! ```

pub mod builder;
pub mod error;
pub mod graph;
pub(crate) mod validate;

pub use builder::{GraphBuilder, NodeRef};
pub use error::{GraphError, GraphResult};
pub use graph::{Element, Graph, Node};
