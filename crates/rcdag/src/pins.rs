//! Named root pinning on top of [`RefCountDag`].
//!
//! A [`RootPinSet`] records which roots a caller has explicitly pinned and
//! refuses to unlink anything that was not pinned through it. Pins are
//! counted: each `apply` takes one engine reference and each `revert`
//! releases one, so the pin set and the engine's counts stay in step.

use std::collections::HashMap;

use tracing::debug;

use rcdag_store::NodeStore;
use rcdag_types::NodeId;

use crate::config::EngineConfig;
use crate::dag::RefCountDag;
use crate::error::{DagError, DagResult};
use crate::source::Source;

/// Selective multi-root pinning over a reference-counting engine.
#[derive(Debug)]
pub struct RootPinSet<S> {
    /// Outstanding pins per root. Never holds a zero.
    pins: HashMap<NodeId, u64>,
    dag: RefCountDag<S>,
}

impl<S: NodeStore> RootPinSet<S> {
    /// Create a pin set over a fresh engine backed by `store`.
    pub fn new(store: S) -> Self {
        Self::from_dag(RefCountDag::new(store))
    }

    /// Create a pin set over a fresh engine with an explicit configuration.
    pub fn with_config(store: S, config: EngineConfig) -> Self {
        Self::from_dag(RefCountDag::with_config(store, config))
    }

    /// Wrap an existing engine. Roots it already tracks are not pinned.
    pub fn from_dag(dag: RefCountDag<S>) -> Self {
        Self {
            pins: HashMap::new(),
            dag,
        }
    }

    /// Pin `root` and link its subgraph.
    ///
    /// The pin is recorded only if the link succeeds. A failed link may
    /// still leave part of the subgraph tracked (see
    /// [`RefCountDag::link`]); that state is owned by no pin.
    pub fn apply<Src>(&mut self, root: NodeId, source: &Src) -> DagResult<()>
    where
        Src: Source + ?Sized,
    {
        self.dag.link(root, source)?;
        let pins = self.pins.entry(root).or_insert(0);
        *pins += 1;
        debug!(root = %root.short_hex(), pins = *pins, "pinned root");
        Ok(())
    }

    /// Release one pin on `root` and unlink it.
    ///
    /// Fails with [`DagError::UnpinnedRoot`] without touching the engine if
    /// `root` is not pinned. The pin is released only if the unlink succeeds.
    pub fn revert(&mut self, root: NodeId) -> DagResult<()> {
        if !self.pins.contains_key(&root) {
            return Err(DagError::UnpinnedRoot(root));
        }
        self.dag.unlink(root)?;

        let remaining = match self.pins.get_mut(&root) {
            Some(pins) if *pins > 1 => {
                *pins -= 1;
                *pins
            }
            _ => {
                self.pins.remove(&root);
                0
            }
        };
        debug!(root = %root.short_hex(), pins = remaining, "reverted root");
        Ok(())
    }

    /// Returns `true` if `root` has at least one outstanding pin.
    pub fn is_pinned(&self, root: &NodeId) -> bool {
        self.pins.contains_key(root)
    }

    /// Number of outstanding pins on `root`.
    pub fn pin_count(&self, root: &NodeId) -> u64 {
        self.pins.get(root).copied().unwrap_or(0)
    }

    /// All pinned roots, sorted.
    pub fn roots(&self) -> Vec<NodeId> {
        let mut roots: Vec<NodeId> = self.pins.keys().copied().collect();
        roots.sort();
        roots
    }

    /// The underlying engine.
    pub fn dag(&self) -> &RefCountDag<S> {
        &self.dag
    }

    /// The backing node store.
    pub fn store(&self) -> &S {
        self.dag.store()
    }

    /// Consume the pin set and return the engine.
    pub fn into_dag(self) -> RefCountDag<S> {
        self.dag
    }
}
