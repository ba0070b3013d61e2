use serde::{Deserialize, Serialize};

use crate::error::{DagError, DagResult};

/// Order in which the link/unlink worklist is drained.
///
/// Final reference counts do not depend on this choice: every edge
/// contributes exactly one increment or decrement whenever it is processed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Traversal {
    /// FIFO queue.
    #[default]
    BreadthFirst,
    /// LIFO stack.
    DepthFirst,
}

/// Configuration for a [`RefCountDag`](crate::RefCountDag).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Worklist discipline used by `link` and `unlink`.
    pub traversal: Traversal,
}

impl EngineConfig {
    /// Configuration using a depth-first worklist.
    pub fn depth_first() -> Self {
        Self {
            traversal: Traversal::DepthFirst,
        }
    }

    /// Parse a configuration from TOML. Missing keys take their defaults.
    ///
    /// ```toml
    /// traversal = "depth_first"
    /// ```
    pub fn from_toml_str(s: &str) -> DagResult<Self> {
        toml::from_str(s).map_err(|e| DagError::Config(e.to_string()))
    }
}
