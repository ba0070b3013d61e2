use std::collections::VecDeque;

use rcdag_types::NodeId;

use crate::config::Traversal;

/// Worklist of ids still to be visited by a link or unlink walk.
///
/// Duplicates are kept: an id pushed twice is visited twice, once per edge.
#[derive(Debug)]
pub(crate) struct Frontier {
    items: VecDeque<NodeId>,
    traversal: Traversal,
}

impl Frontier {
    pub(crate) fn new(root: NodeId, traversal: Traversal) -> Self {
        let mut items = VecDeque::new();
        items.push_back(root);
        Self { items, traversal }
    }

    pub(crate) fn extend(&mut self, ids: &[NodeId]) {
        match self.traversal {
            Traversal::BreadthFirst => self.items.extend(ids.iter().copied()),
            // Reverse so the first child is popped first.
            Traversal::DepthFirst => self.items.extend(ids.iter().rev().copied()),
        }
    }

    pub(crate) fn pop(&mut self) -> Option<NodeId> {
        match self.traversal {
            Traversal::BreadthFirst => self.items.pop_front(),
            Traversal::DepthFirst => self.items.pop_back(),
        }
    }
}
