use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use rcdag_types::{Node, NodeId};

use crate::error::{StoreError, StoreResult};
use crate::traits::{NodeStore, Nodes};

/// In-memory, HashMap-based node store.
///
/// Intended for tests and small graphs. Nodes are held behind a `RwLock` and
/// cloned on read.
pub struct InMemoryNodeStore {
    nodes: RwLock<HashMap<NodeId, Node>>,
}

impl InMemoryNodeStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            nodes: RwLock::new(HashMap::new()),
        }
    }

    fn read_map(&self) -> StoreResult<RwLockReadGuard<'_, HashMap<NodeId, Node>>> {
        self.nodes.read().map_err(|_| StoreError::Poisoned)
    }

    fn write_map(&self) -> StoreResult<RwLockWriteGuard<'_, HashMap<NodeId, Node>>> {
        self.nodes.write().map_err(|_| StoreError::Poisoned)
    }

    /// Return a sorted list of all stored node ids.
    pub fn ids(&self) -> StoreResult<Vec<NodeId>> {
        let map = self.read_map()?;
        let mut ids: Vec<NodeId> = map.keys().copied().collect();
        ids.sort();
        Ok(ids)
    }

    /// Remove every node from the store.
    pub fn clear(&self) -> StoreResult<()> {
        self.write_map()?.clear();
        Ok(())
    }
}

impl Default for InMemoryNodeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeStore for InMemoryNodeStore {
    fn put(&self, id: NodeId, node: Node) -> StoreResult<()> {
        self.write_map()?.insert(id, node);
        Ok(())
    }

    fn get(&self, id: &NodeId) -> StoreResult<Node> {
        self.read_map()?
            .get(id)
            .cloned()
            .ok_or(StoreError::NotFound(*id))
    }

    fn delete(&self, id: &NodeId) -> StoreResult<()> {
        match self.write_map()?.remove(id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(*id)),
        }
    }

    fn all(&self) -> StoreResult<Nodes<'_>> {
        // Copy out under the read lock so the iterator holds no guard.
        let nodes: Vec<Node> = self.read_map()?.values().cloned().collect();
        Ok(Box::new(nodes.into_iter()))
    }

    fn contains(&self, id: &NodeId) -> StoreResult<bool> {
        Ok(self.read_map()?.contains_key(id))
    }

    fn len(&self) -> StoreResult<usize> {
        Ok(self.read_map()?.len())
    }
}

impl std::fmt::Debug for InMemoryNodeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("InMemoryNodeStore");
        match self.nodes.read() {
            Ok(map) => s.field("node_count", &map.len()),
            Err(_) => s.field("node_count", &"<poisoned>"),
        };
        s.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn nid(name: &str) -> NodeId {
        NodeId::from_bytes(name.as_bytes())
    }

    fn leaf(name: &str) -> Node {
        Node::new(nid(name), vec![])
    }

    fn store_with(names: &[&str]) -> InMemoryNodeStore {
        let store = InMemoryNodeStore::new();
        for name in names {
            let node = leaf(name);
            store.put(node.id(), node).unwrap();
        }
        store
    }

    // -----------------------------------------------------------------------
    // Core CRUD
    // -----------------------------------------------------------------------

    #[test]
    fn put_and_get() {
        let store = InMemoryNodeStore::new();
        let node = Node::new(nid("parent"), vec![nid("child")]);
        store.put(node.id(), node.clone()).unwrap();

        let read_back = store.get(&nid("parent")).unwrap();
        assert_eq!(read_back, node);
    }

    #[test]
    fn get_missing_is_not_found() {
        let store = InMemoryNodeStore::new();
        let err = store.get(&nid("missing")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(id) if id == nid("missing")));
    }

    #[test]
    fn put_is_idempotent() {
        let store = InMemoryNodeStore::new();
        let node = leaf("a");
        store.put(node.id(), node.clone()).unwrap();
        store.put(node.id(), node).unwrap();
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn delete_present_node() {
        let store = store_with(&["a"]);
        store.delete(&nid("a")).unwrap();
        assert!(!store.contains(&nid("a")).unwrap());
    }

    #[test]
    fn delete_missing_is_not_found() {
        let store = store_with(&["a"]);
        store.delete(&nid("a")).unwrap();
        let err = store.delete(&nid("a")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    // -----------------------------------------------------------------------
    // Enumeration
    // -----------------------------------------------------------------------

    #[test]
    fn all_yields_every_node_once() {
        let store = store_with(&["a", "b", "c"]);
        let ids: Vec<NodeId> = store.all().unwrap().map(|n| n.id()).collect();
        assert_eq!(ids.len(), 3);
        let unique: HashSet<NodeId> = ids.into_iter().collect();
        assert_eq!(unique, [nid("a"), nid("b"), nid("c")].into_iter().collect());
    }

    #[test]
    fn all_is_single_pass() {
        let store = store_with(&["a", "b"]);
        let mut nodes = store.all().unwrap();
        assert_eq!(nodes.by_ref().count(), 2);
        assert!(nodes.next().is_none());
        // A fresh call starts a new pass.
        assert_eq!(store.all().unwrap().count(), 2);
    }

    #[test]
    fn all_does_not_block_writers() {
        let store = store_with(&["a", "b"]);
        let nodes = store.all().unwrap();
        store.put(nid("c"), leaf("c")).unwrap();
        assert_eq!(nodes.count(), 2);
    }

    #[test]
    fn ids_are_sorted() {
        let store = store_with(&["x", "y", "z", "w"]);
        let ids = store.ids().unwrap();
        assert_eq!(ids.len(), 4);
        for w in ids.windows(2) {
            assert!(w[0] < w[1]);
        }
    }

    // -----------------------------------------------------------------------
    // Utility methods
    // -----------------------------------------------------------------------

    #[test]
    fn len_and_is_empty() {
        let store = InMemoryNodeStore::new();
        assert!(store.is_empty().unwrap());
        store.put(nid("a"), leaf("a")).unwrap();
        assert!(!store.is_empty().unwrap());
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn clear_removes_all() {
        let store = store_with(&["a", "b"]);
        store.clear().unwrap();
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn arc_store_delegates() {
        let store = Arc::new(store_with(&["a"]));
        let shared: &dyn NodeStore = &store;
        assert!(shared.contains(&nid("a")).unwrap());
        shared.delete(&nid("a")).unwrap();
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn poisoned_lock_is_reported() {
        let store = Arc::new(store_with(&["a"]));
        let poisoner = Arc::clone(&store);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.nodes.write().unwrap();
            panic!("poison the lock");
        })
        .join();
        assert!(matches!(store.get(&nid("a")), Err(StoreError::Poisoned)));
        assert!(format!("{store:?}").contains("<poisoned>"));
    }

    #[test]
    fn debug_format() {
        let store = store_with(&["a"]);
        let debug = format!("{store:?}");
        assert!(debug.contains("InMemoryNodeStore"));
        assert!(debug.contains("node_count"));
    }
}
