//! Resolvers that turn a [`NodeId`] into a [`Node`].
//!
//! `link` pulls every newly reached node through a [`Source`]. Sources may be
//! local maps, other stores, or network fetchers; the engine treats every
//! call as synchronous and potentially failing. Retrying transient failures
//! is the source's business.

use std::collections::HashMap;

use rcdag_store::{NodeStore, StoreError};
use rcdag_types::{Node, NodeId};

use crate::error::SourceError;

/// Resolves node ids for the engine.
pub trait Source {
    /// Resolve `id` to its node.
    fn resolve(&self, id: &NodeId) -> Result<Node, SourceError>;
}

impl<T: Source + ?Sized> Source for &T {
    fn resolve(&self, id: &NodeId) -> Result<Node, SourceError> {
        (**self).resolve(id)
    }
}

impl<T: Source + ?Sized> Source for Box<T> {
    fn resolve(&self, id: &NodeId) -> Result<Node, SourceError> {
        (**self).resolve(id)
    }
}

/// A source backed by an in-memory map of nodes.
#[derive(Clone, Debug, Default)]
pub struct MapSource {
    nodes: HashMap<NodeId, Node>,
}

impl MapSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a source from nodes, keyed by their own ids.
    pub fn from_nodes(nodes: impl IntoIterator<Item = Node>) -> Self {
        Self {
            nodes: nodes.into_iter().map(|n| (n.id(), n)).collect(),
        }
    }

    /// Add a node, returning the id it was keyed under.
    pub fn insert(&mut self, node: Node) -> NodeId {
        let id = node.id();
        self.nodes.insert(id, node);
        id
    }

    /// Number of nodes the source can resolve.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the source holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Source for MapSource {
    fn resolve(&self, id: &NodeId) -> Result<Node, SourceError> {
        self.nodes.get(id).cloned().ok_or(SourceError::NotFound(*id))
    }
}

impl FromIterator<Node> for MapSource {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Self::from_nodes(iter)
    }
}

/// Adapter that resolves ids from any [`NodeStore`].
///
/// Useful for linking out of a staging store, or for re-linking from a
/// second engine's store.
#[derive(Debug)]
pub struct StoreSource<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: NodeStore + ?Sized> StoreSource<'a, S> {
    /// Wrap a store.
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }
}

impl<S: NodeStore + ?Sized> Source for StoreSource<'_, S> {
    fn resolve(&self, id: &NodeId) -> Result<Node, SourceError> {
        self.store.get(id).map_err(|e| match e {
            StoreError::NotFound(missing) => SourceError::NotFound(missing),
            other => SourceError::Unavailable {
                id: *id,
                reason: other.to_string(),
            },
        })
    }
}
