use std::sync::{Arc, Mutex, MutexGuard};

use rcdag_store::NodeStore;
use rcdag_types::NodeId;

use crate::error::{DagError, DagResult};
use crate::pins::RootPinSet;
use crate::source::Source;

/// Cloneable handle that serializes access to a [`RootPinSet`].
///
/// The engine itself is not synchronized. This wrapper holds one mutex
/// across each whole `apply` or `revert`, so no two walks interleave.
#[derive(Debug)]
pub struct SharedPinSet<S> {
    inner: Arc<Mutex<RootPinSet<S>>>,
}

impl<S> Clone for SharedPinSet<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: NodeStore> SharedPinSet<S> {
    /// Wrap a pin set for shared use.
    pub fn new(pins: RootPinSet<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(pins)),
        }
    }

    fn lock(&self) -> DagResult<MutexGuard<'_, RootPinSet<S>>> {
        self.inner.lock().map_err(|_| DagError::Poisoned)
    }

    /// See [`RootPinSet::apply`].
    pub fn apply<Src>(&self, root: NodeId, source: &Src) -> DagResult<()>
    where
        Src: Source + ?Sized,
    {
        self.lock()?.apply(root, source)
    }

    /// See [`RootPinSet::revert`].
    pub fn revert(&self, root: NodeId) -> DagResult<()> {
        self.lock()?.revert(root)
    }

    /// Returns `true` if `root` has at least one outstanding pin.
    pub fn is_pinned(&self, root: &NodeId) -> DagResult<bool> {
        Ok(self.lock()?.is_pinned(root))
    }

    /// Run `f` against the pin set while holding the lock.
    ///
    /// Use this for consistent multi-step reads, such as enumerating the
    /// store and reading counts together.
    pub fn with<R>(&self, f: impl FnOnce(&RootPinSet<S>) -> R) -> DagResult<R> {
        let guard = self.lock()?;
        Ok(f(&guard))
    }
}
