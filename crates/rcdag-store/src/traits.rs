use std::sync::Arc;

use rcdag_types::{Node, NodeId};

use crate::error::{StoreError, StoreResult};

/// Lazy, single-pass enumeration of stored nodes in unspecified order.
pub type Nodes<'a> = Box<dyn Iterator<Item = Node> + Send + 'a>;

/// Keyed storage for the nodes the collector currently tracks.
///
/// Implementations must satisfy these invariants:
/// - `get` and `delete` of an id that is not stored return
///   [`StoreError::NotFound`].
/// - `put` of an id that is already stored replaces the node. For
///   content-addressed ids the replacement is identical, so this is a no-op.
/// - The store never interprets node contents or edges.
///
/// Implementations are not required to be consistent under concurrent
/// mutation. Callers that share a store across threads serialize writes.
pub trait NodeStore: Send + Sync {
    /// Store a node under `id`.
    fn put(&self, id: NodeId, node: Node) -> StoreResult<()>;

    /// Fetch the node stored under `id`.
    fn get(&self, id: &NodeId) -> StoreResult<Node>;

    /// Remove the node stored under `id`.
    fn delete(&self, id: &NodeId) -> StoreResult<()>;

    /// Enumerate every stored node.
    ///
    /// The iterator is finite and cannot be restarted; call `all` again for
    /// a fresh pass. Consuming it while the store is being mutated has no
    /// consistency guarantee.
    fn all(&self) -> StoreResult<Nodes<'_>>;

    /// Check whether a node is stored under `id`.
    ///
    /// Default implementation maps `get` onto a boolean. Backends may
    /// override to avoid materializing the node.
    fn contains(&self, id: &NodeId) -> StoreResult<bool> {
        match self.get(id) {
            Ok(_) => Ok(true),
            Err(StoreError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Number of stored nodes.
    ///
    /// Default implementation counts a full pass of `all`.
    fn len(&self) -> StoreResult<usize> {
        Ok(self.all()?.count())
    }

    /// Returns `true` if nothing is stored.
    fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl<S: NodeStore + ?Sized> NodeStore for Arc<S> {
    fn put(&self, id: NodeId, node: Node) -> StoreResult<()> {
        (**self).put(id, node)
    }

    fn get(&self, id: &NodeId) -> StoreResult<Node> {
        (**self).get(id)
    }

    fn delete(&self, id: &NodeId) -> StoreResult<()> {
        (**self).delete(id)
    }

    fn all(&self) -> StoreResult<Nodes<'_>> {
        (**self).all()
    }

    fn contains(&self, id: &NodeId) -> StoreResult<bool> {
        (**self).contains(id)
    }

    fn len(&self) -> StoreResult<usize> {
        (**self).len()
    }
}
