//! Reference-counted garbage collection for immutable, content-addressed DAGs.
//!
//! Callers pin ("link") the subgraph reachable from a root into a tracked
//! collection and later unpin ("unlink") it. Nodes no longer reachable from
//! any linked root are deleted; nodes still shared with another root stay.
//!
//! - [`RefCountDag`] — the engine: per-node counts over a [`NodeStore`]
//! - [`RootPinSet`] — validated pin/unpin of named roots
//! - [`SharedPinSet`] — mutex-serialized handle for multi-threaded callers
//! - [`Source`] — resolves ids to nodes while linking
//!
//! ```
//! use rcdag::{MapSource, RefCountDag};
//! use rcdag_store::InMemoryNodeStore;
//! use rcdag_types::Node;
//!
//! let leaf = Node::from_content(b"leaf".to_vec(), vec![]);
//! let root = Node::from_content(b"root".to_vec(), vec![leaf.id()]);
//! let root_id = root.id();
//! let source = MapSource::from_nodes([leaf, root]);
//!
//! let mut dag = RefCountDag::new(InMemoryNodeStore::new());
//! dag.link(root_id, &source).unwrap();
//! assert_eq!(dag.len(), 2);
//!
//! dag.unlink(root_id).unwrap();
//! assert!(dag.is_empty());
//! ```
//!
//! [`NodeStore`]: rcdag_store::NodeStore

pub mod config;
pub mod dag;
pub mod error;
mod frontier;
pub mod pins;
pub mod shared;
pub mod source;

pub use config::{EngineConfig, Traversal};
pub use dag::{LinkStats, RefCountDag, UnlinkStats};
pub use error::{DagError, DagResult, SourceError};
pub use pins::RootPinSet;
pub use shared::SharedPinSet;
pub use source::{MapSource, Source, StoreSource};
