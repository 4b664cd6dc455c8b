use lasso::{Spur, ThreadedRodeo};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Global string interner for node IDs.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Longest accepted node id.
pub const MAX_ID_LEN: usize = 128;

/// A lightweight, interned identifier for nodes in the scene graph.
/// Internally a 4-byte `Spur` index, so comparison and hashing are O(1).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Spur);

impl NodeId {
    /// Intern a new string as a NodeId, or return existing if already interned.
    ///
    /// Does not validate; use [`NodeId::parse`] for untrusted input.
    pub fn intern(s: &str) -> Self {
        NodeId(INTERNER.get_or_intern(s))
    }

    /// Validate `s` against the id-safe pattern and intern it.
    pub fn parse(s: &str) -> Option<Self> {
        is_valid_id(s).then(|| Self::intern(s))
    }

    /// Look up an already-interned id without growing the interner.
    ///
    /// Returns `None` for malformed ids and for ids that were never interned
    /// (which therefore cannot name any node).
    pub fn lookup(s: &str) -> Option<Self> {
        if !is_valid_id(s) {
            return None;
        }
        INTERNER.get(s).map(NodeId)
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// The reserved id of the document root.
    pub fn root() -> Self {
        Self::intern("root")
    }

    /// Generate a unique ID with a type prefix (e.g. `obj_1`, `group_2`).
    pub fn with_prefix(prefix: &str) -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        Self::intern(&format!("{prefix}_{n}"))
    }
}

/// `[A-Za-z0-9_-]{1,128}`
pub fn is_valid_id(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= MAX_ID_LEN
        && s
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.as_str())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        NodeId::parse(&s).ok_or_else(|| D::Error::custom(format!("invalid node id `{s}`")))
    }
}
