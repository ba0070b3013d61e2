//! Immutable DAG vertices.
//!
//! A [`Node`] knows its own [`NodeId`] and the ordered ids of its children.
//! Child lists may repeat an id: each occurrence is a separate edge and is
//! reference-counted separately.

use serde::{Deserialize, Serialize};

use crate::hash::NodeHasher;
use crate::id::NodeId;

/// An immutable vertex in a content-addressed DAG.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Node {
    id: NodeId,
    children: Vec<NodeId>,
    payload: Vec<u8>,
}

impl Node {
    /// Create a node with a caller-chosen id and no payload.
    pub fn new(id: NodeId, children: impl Into<Vec<NodeId>>) -> Self {
        Self {
            id,
            children: children.into(),
            payload: Vec::new(),
        }
    }

    /// Create a node with a caller-chosen id and an opaque payload.
    pub fn with_payload(id: NodeId, children: impl Into<Vec<NodeId>>, payload: Vec<u8>) -> Self {
        Self {
            id,
            children: children.into(),
            payload,
        }
    }

    /// Create a content-addressed node.
    ///
    /// The id commits to the payload and to every child id in order.
    pub fn from_content(payload: Vec<u8>, children: impl Into<Vec<NodeId>>) -> Self {
        let children = children.into();
        let id = Self::content_id(&payload, &children);
        Self {
            id,
            children,
            payload,
        }
    }

    fn content_id(payload: &[u8], children: &[NodeId]) -> NodeId {
        let mut parts: Vec<&[u8]> = Vec::with_capacity(children.len() + 1);
        parts.push(payload);
        parts.extend(children.iter().map(|c| c.as_bytes().as_slice()));
        NodeHasher::NODE.hash_parts(&parts)
    }

    /// This node's identifier.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Child ids in edge order, duplicates included.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// The opaque payload. Empty for nodes built with [`Node::new`].
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Returns `true` if this node has no outgoing edges.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns `true` if the id matches the content hash of this node.
    ///
    /// Only meaningful for nodes built with [`Node::from_content`].
    pub fn verify_content(&self) -> bool {
        Self::content_id(&self.payload, &self.children) == self.id
    }
}
