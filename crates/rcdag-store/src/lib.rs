//! Node storage for the rcdag collector.
//!
//! The collector keeps every node it currently tracks in a [`NodeStore`]. The
//! store is a plain keyed container: it never counts references and never
//! decides what to delete. The engine in the `rcdag` crate drives it.
//!
//! # Storage Backends
//!
//! All backends implement the [`NodeStore`] trait:
//!
//! - [`InMemoryNodeStore`] -- `HashMap`-based store for tests and small graphs
//!
//! # Design Rules
//!
//! 1. Nodes are immutable once written.
//! 2. `get` and `delete` of an absent id fail with [`StoreError::NotFound`].
//! 3. Enumeration through [`NodeStore::all`] is single-pass and unordered.
//! 4. All backend errors are propagated, never silently ignored.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryNodeStore;
pub use traits::{NodeStore, Nodes};
