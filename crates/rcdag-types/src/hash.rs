use crate::id::NodeId;

/// Domain-separated BLAKE3 hasher for deriving node ids.
///
/// The domain tag is prepended to every hash computation, so ids derived for
/// different purposes never collide even when the hashed bytes match.
pub struct NodeHasher {
    domain: &'static str,
}

impl NodeHasher {
    /// Hasher for content-addressed DAG nodes.
    pub const NODE: Self = Self {
        domain: "rcdag-node-v1",
    };

    /// Create a hasher with a custom domain tag.
    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    /// Hash raw bytes with domain separation.
    pub fn hash(&self, data: &[u8]) -> NodeId {
        self.hash_parts(&[data])
    }

    /// Hash a sequence of byte slices with domain separation.
    ///
    /// Each part is length-prefixed so `["ab", "c"]` and `["a", "bc"]`
    /// hash differently.
    pub fn hash_parts(&self, parts: &[&[u8]]) -> NodeId {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        for part in parts {
            hasher.update(&(part.len() as u64).to_le_bytes());
            hasher.update(part);
        }
        NodeId::from_hash(*hasher.finalize().as_bytes())
    }

    /// The domain tag used by this hasher.
    pub fn domain(&self) -> &str {
        self.domain
    }
}
