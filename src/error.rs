use thiserror::Error;

/// Errors returned by the mutating and handle-based operations of [`RbTree`](crate::RbTree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The node arena or a result buffer could not grow.
    #[error("out of memory while growing tree storage")]
    OutOfMemory,

    /// The handle does not name a live node of this tree. Either the node was already
    /// deleted, or the handle came from a different tree.
    #[error("node handle for slot {slot} is stale or belongs to another tree")]
    StaleNode { slot: usize },
}
