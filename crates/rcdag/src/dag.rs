//! The reference-counting engine.
//!
//! [`RefCountDag`] keeps one count per tracked [`NodeId`] and delegates node
//! storage to a [`NodeStore`]. A node's count is the number of times it has
//! been linked directly as a root plus the number of edges into it from
//! tracked parents.
//!
//! # Invariants
//!
//! - The set of ids with a count equals the set of ids in the store.
//! - Every count is strictly positive; an entry that would reach zero is
//!   removed together with its stored node.
//! - A node is only deleted when its count reaches zero. There is no forced
//!   delete.
//!
//! # Partial failure
//!
//! `link` and `unlink` stop at the first error and do not roll back. Counts
//! and nodes applied before the error remain, and the tracked-set invariant
//! still holds at that point. Callers needing atomicity snapshot the store
//! and counts externally.
//!
//! # Concurrency
//!
//! The engine performs no synchronization. Mutating calls on one instance
//! must be serialized by the caller, for example through
//! [`SharedPinSet`](crate::SharedPinSet).

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, trace, warn};

use rcdag_store::NodeStore;
use rcdag_types::NodeId;

use crate::config::EngineConfig;
use crate::error::{DagError, DagResult, SourceError};
use crate::frontier::Frontier;
use crate::source::Source;

/// Summary of one `link` call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LinkStats {
    /// Nodes resolved and newly stored.
    pub added: usize,
    /// Already-tracked nodes whose count was incremented.
    pub bumped: usize,
}

/// Summary of one `unlink` call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UnlinkStats {
    /// Nodes whose count reached zero and were deleted.
    pub removed: usize,
    /// Nodes whose count was decremented but stayed positive.
    pub decremented: usize,
}

/// Reference-counted collection of immutable DAG nodes.
#[derive(Debug)]
pub struct RefCountDag<S> {
    /// Reference count per tracked node. Never holds a zero.
    refs: HashMap<NodeId, u64>,
    /// Materialized nodes, keyed exactly like `refs`.
    store: S,
    config: EngineConfig,
}

impl<S: NodeStore> RefCountDag<S> {
    /// Create an engine over `store` with the default configuration.
    ///
    /// The store is expected to start empty; nodes already in it are not
    /// tracked and [`verify`](Self::verify) will report them.
    pub fn new(store: S) -> Self {
        Self::with_config(store, EngineConfig::default())
    }

    /// Create an engine with an explicit configuration.
    pub fn with_config(store: S, config: EngineConfig) -> Self {
        Self {
            refs: HashMap::new(),
            store,
            config,
        }
    }

    // ---------------------------------------------------------------
    // Mutation
    // ---------------------------------------------------------------

    /// Link the subgraph reachable from `root`, resolving new nodes through
    /// `source`.
    ///
    /// Each visited id that is already tracked has its count incremented and
    /// is not descended into. Each untracked id is resolved, stored with a
    /// count of 1, and has all of its children (duplicates included) pushed
    /// onto the worklist. Work is proportional to the number of new nodes
    /// plus the number of edges from new nodes into tracked ones.
    ///
    /// Linking the same root again increments its count again.
    ///
    /// # Errors
    ///
    /// - [`DagError::Resolution`] if `source` fails or returns a node with a
    ///   different id. The failing id is left untracked.
    /// - [`DagError::Store`] if the store rejects a write.
    ///
    /// In both cases nodes and counts applied before the error are kept.
    pub fn link<Src>(&mut self, root: NodeId, source: &Src) -> DagResult<LinkStats>
    where
        Src: Source + ?Sized,
    {
        let mut frontier = Frontier::new(root, self.config.traversal);
        let mut stats = LinkStats::default();

        while let Some(id) = frontier.pop() {
            if let Some(count) = self.refs.get_mut(&id) {
                *count += 1;
                stats.bumped += 1;
                trace!(node = %id.short_hex(), count = *count, "incremented ref count");
                continue;
            }

            let node = source
                .resolve(&id)
                .map_err(|source| DagError::Resolution { id, source })?;
            if node.id() != id {
                return Err(DagError::Resolution {
                    id,
                    source: SourceError::Mismatch {
                        requested: id,
                        returned: node.id(),
                    },
                });
            }

            frontier.extend(node.children());
            self.store.put(id, node)?;
            self.refs.insert(id, 1);
            stats.added += 1;
            trace!(node = %id.short_hex(), "linked new node");
        }

        debug!(
            root = %root.short_hex(),
            added = stats.added,
            bumped = stats.bumped,
            tracked = self.refs.len(),
            "linked subgraph"
        );
        Ok(stats)
    }

    /// Unlink one reference to `root`, deleting every node whose count
    /// reaches zero.
    ///
    /// A visited id with a count above 1 is decremented and not descended
    /// into, since another reference still needs its subgraph. An id with a
    /// count of exactly 1 is removed from the count map and the store, and
    /// its children are pushed onto the worklist.
    ///
    /// # Errors
    ///
    /// - [`DagError::NotLinked`] if a visited id has no count. When this is
    ///   the root nothing has been changed.
    /// - [`DagError::StoreCorruption`] if the store cannot fetch or delete
    ///   a node the count map tracks.
    pub fn unlink(&mut self, root: NodeId) -> DagResult<UnlinkStats> {
        let mut frontier = Frontier::new(root, self.config.traversal);
        let mut stats = UnlinkStats::default();

        while let Some(id) = frontier.pop() {
            let Some(count) = self.refs.get_mut(&id) else {
                return Err(DagError::NotLinked(id));
            };
            if *count > 1 {
                *count -= 1;
                stats.decremented += 1;
                trace!(node = %id.short_hex(), count = *count, "decremented ref count");
                continue;
            }

            // Last reference: drop the node and cascade into its children.
            let node = self
                .store
                .get(&id)
                .map_err(|e| corruption(id, format!("tracked node could not be fetched: {e}")))?;
            self.store
                .delete(&id)
                .map_err(|e| corruption(id, format!("tracked node could not be deleted: {e}")))?;
            self.refs.remove(&id);
            frontier.extend(node.children());
            stats.removed += 1;
            trace!(node = %id.short_hex(), "removed node");
        }

        debug!(
            root = %root.short_hex(),
            removed = stats.removed,
            decremented = stats.decremented,
            tracked = self.refs.len(),
            "unlinked subgraph"
        );
        Ok(stats)
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    /// The backing node store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consume the engine and return its store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current reference count of `id`, or `None` if it is not tracked.
    pub fn ref_count(&self, id: &NodeId) -> Option<u64> {
        self.refs.get(id).copied()
    }

    /// Returns `true` if `id` has a reference count.
    pub fn is_linked(&self, id: &NodeId) -> bool {
        self.refs.contains_key(id)
    }

    /// Number of tracked nodes.
    pub fn len(&self) -> usize {
        self.refs.len()
    }

    /// Returns `true` if nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    /// All reference counts, ordered by id.
    pub fn ref_counts(&self) -> BTreeMap<NodeId, u64> {
        self.refs.iter().map(|(id, count)| (*id, *count)).collect()
    }

    /// Check that the count map and the store track exactly the same ids.
    ///
    /// Returns the first discrepancy as [`DagError::StoreCorruption`].
    pub fn verify(&self) -> DagResult<()> {
        for (id, count) in &self.refs {
            if *count == 0 {
                return Err(corruption(*id, "zero reference count".to_string()));
            }
            if !self.store.contains(id)? {
                return Err(corruption(*id, "counted but not stored".to_string()));
            }
        }
        for node in self.store.all()? {
            if !self.refs.contains_key(&node.id()) {
                return Err(corruption(node.id(), "stored but not counted".to_string()));
            }
        }
        Ok(())
    }
}

fn corruption(id: NodeId, reason: String) -> DagError {
    warn!(node = %id.short_hex(), %reason, "reference count map and store disagree");
    DagError::StoreCorruption { id, reason }
}
