//! Error types for the reference-counting engine.

use rcdag_store::StoreError;
use rcdag_types::NodeId;

/// Errors returned by a [`Source`](crate::Source) when resolving an id.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The source has no node for this id.
    #[error("node not found in source: {0}")]
    NotFound(NodeId),

    /// The source could not be reached or failed transiently.
    #[error("source unavailable for {id}: {reason}")]
    Unavailable {
        /// The id being resolved.
        id: NodeId,
        /// Backend-specific description.
        reason: String,
    },

    /// The source returned a node whose id differs from the one requested.
    #[error("source returned {returned} when asked for {requested}")]
    Mismatch {
        /// The id that was asked for.
        requested: NodeId,
        /// The id of the node that came back.
        returned: NodeId,
    },
}

/// Errors that can occur during link, unlink and pinning operations.
#[derive(Debug, thiserror::Error)]
pub enum DagError {
    /// The source failed to resolve a node reached during `link`.
    ///
    /// Work applied before the failure stays applied.
    #[error("failed to resolve {id}: {source}")]
    Resolution {
        /// The id that could not be resolved.
        id: NodeId,
        /// The underlying source failure.
        #[source]
        source: SourceError,
    },

    /// `unlink` reached an id that has no reference count.
    #[error("node {0} is not linked")]
    NotLinked(NodeId),

    /// `revert` was called for a root that is not pinned.
    #[error("attempt to revert unpinned root {0}")]
    UnpinnedRoot(NodeId),

    /// The reference count map and the node store disagree about `id`.
    ///
    /// This means an internal invariant is broken. Treat it as fatal.
    #[error("store corruption at {id}: {reason}")]
    StoreCorruption {
        /// The id whose bookkeeping is inconsistent.
        id: NodeId,
        /// What was found.
        reason: String,
    },

    /// The node store rejected a write.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Engine configuration could not be parsed.
    #[error("invalid config: {0}")]
    Config(String),

    /// A lock guarding a shared engine was poisoned.
    #[error("engine lock poisoned")]
    Poisoned,
}

impl DagError {
    /// Returns `true` for errors that indicate broken internal bookkeeping.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::StoreCorruption { .. })
    }
}

/// Convenience alias for engine results.
pub type DagResult<T> = Result<T, DagError>;
