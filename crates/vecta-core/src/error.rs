//! Errors for scene-graph contract violations.
//!
//! Expected, recoverable outcomes (unknown id, invalid group target, a move
//! that would form a cycle) are reported as `None`/`false` by the graph
//! operations themselves and never reach this type.

use crate::id::NodeId;

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("node id `{0}` already exists")]
    DuplicateId(NodeId),

    #[error("`{0}` is not a valid node id")]
    InvalidId(String),

    #[error("update payload must be a record, got {0}")]
    InvalidPatch(String),

    #[error("scene nesting exceeds the maximum depth of {max}")]
    DepthExceeded { max: usize },

    #[error("invalid editor config: {0}")]
    InvalidConfig(String),

    #[error("malformed scene record: {0}")]
    Json(#[from] serde_json::Error),
}
