//! Scene graph errors

use thiserror::Error;

use super::NodeId;

/// Errors reported by scene graph operations
///
/// None of these leave the graph partially modified.
#[derive(Error, Debug)]
pub enum SceneError {
    /// IO error while reading or writing a model file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The id does not name a live node of this graph
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// The root is owned by the graph and cannot be removed
    #[error("Cannot remove the root node")]
    CannotRemoveRoot,

    /// A model file line that could not be turned into a node
    #[error("Malformed record on line {line}: {reason}")]
    MalformedRecord {
        /// 1-based line number
        line: usize,
        /// What was wrong with it
        reason: String,
    },
}
