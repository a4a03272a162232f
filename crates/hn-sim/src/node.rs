//! Node kinds and the double-buffered node state store.

use hn_components::NodeState;
use hn_core::{NodeId, Real};

/// How a node's state evolves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NodeKind {
    /// Boundary condition; never changes.
    Fixed,
    /// Integrated every step; `alpha` is the pressure relaxation
    /// coefficient [ft/(GPM·hr)].
    Dynamic { alpha: Real },
}

impl NodeKind {
    pub fn is_dynamic(self) -> bool {
        matches!(self, NodeKind::Dynamic { .. })
    }
}

/// Current and next node states.
///
/// Elements only ever see `current`. The compute phase fills `next` and the
/// commit phase swaps the two.
#[derive(Clone, Debug)]
pub struct NodeBuffers {
    current: Vec<NodeState>,
    next: Vec<NodeState>,
}

impl NodeBuffers {
    pub fn new(initial: Vec<NodeState>) -> Self {
        Self {
            next: initial.clone(),
            current: initial,
        }
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    pub fn current(&self, id: NodeId) -> NodeState {
        self.current[id.idx()]
    }

    pub fn current_all(&self) -> &[NodeState] {
        &self.current
    }

    pub(crate) fn take_next(&mut self) -> Vec<NodeState> {
        std::mem::take(&mut self.next)
    }

    /// Hand back an unused next buffer after a failed compute phase.
    pub(crate) fn restore_next(&mut self, next: Vec<NodeState>) {
        self.next = next;
    }

    /// Install the computed next states and make them current.
    pub(crate) fn commit(&mut self, next: Vec<NodeState>) {
        debug_assert_eq!(next.len(), self.current.len());
        self.next = next;
        std::mem::swap(&mut self.current, &mut self.next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(p: Real, t: Real) -> NodeState {
        NodeState {
            pressure: p,
            temperature: t,
        }
    }

    #[test]
    fn commit_swaps_buffers() {
        let mut buf = NodeBuffers::new(vec![state(1.0, 50.0), state(2.0, 60.0)]);
        let mut next = buf.take_next();
        next[0] = state(5.0, 55.0);
        // Current stays untouched until commit.
        assert_eq!(buf.current(NodeId::from_index(0)), state(1.0, 50.0));
        buf.commit(next);
        assert_eq!(buf.current(NodeId::from_index(0)), state(5.0, 55.0));
        assert_eq!(buf.current(NodeId::from_index(1)), state(2.0, 60.0));
        assert_eq!(buf.take_next().len(), 2);
    }
}
