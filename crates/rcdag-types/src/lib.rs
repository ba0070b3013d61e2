//! Foundation types for rcdag.
//!
//! Every other rcdag crate depends on `rcdag-types`. The types here carry no
//! reference-counting behavior; they only name and describe graph vertices.
//!
//! # Key Types
//!
//! - [`NodeId`] — Opaque 32-byte identifier, usually a BLAKE3 content hash
//! - [`Node`] — Immutable vertex: its own id plus ordered child ids
//! - [`NodeHasher`] — Domain-separated hasher used to derive content ids

pub mod hash;
pub mod id;
pub mod node;

pub use hash::NodeHasher;
pub use id::NodeId;
pub use node::Node;
