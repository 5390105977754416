//! Error types for queue operations.

use thiserror::Error;

/// Errors produced by queue-service operations.
///
/// The variants fall into three classes: lookup failures
/// ([`is_not_found`](Self::is_not_found)), illegal transitions given the
/// node's current state ([`is_invalid_state`](Self::is_invalid_state)), and
/// store failures. Store failures are produced by [`crate::infra::store`]
/// backends; the queue service logs and swallows them on its write path, so
/// they never surface from a queue operation.
#[derive(Debug, Error)]
pub enum QueueError {
    /// No node registered under the given id.
    #[error("node not found: {0}")]
    NodeNotFound(String),
    /// No resource registered under the given id.
    #[error("resource not found: {0}")]
    ResourceNotFound(String),
    /// The node is completed; completed nodes accept no further transitions.
    #[error("node {0} is already completed")]
    NodeCompleted(String),
    /// Allocation requires the node to be assigned to a resource first.
    #[error("node {0} is not assigned to a resource")]
    NodeUnassigned(String),
    /// The node already occupies a slot in the resource's service queue.
    #[error("node {node_id} is already in the service queue of {resource_id}")]
    AlreadyInService {
        /// Node being allocated.
        node_id: String,
        /// Resource whose service queue already holds it.
        resource_id: String,
    },
    /// The resource's service queue is at capacity.
    #[error("resource {0} is at full capacity")]
    CapacityExhausted(String),
    /// The node's assignment points at the resource, but the waiting queue
    /// does not contain it. Kept distinct from [`Self::NodeUnassigned`]: it
    /// indicates queue-membership drift rather than a caller mistake.
    #[error("node {node_id} is not in the waiting queue of {resource_id}")]
    NotInWaitingQueue {
        /// Node being allocated.
        node_id: String,
        /// Resource whose waiting queue was expected to hold it.
        resource_id: String,
    },
    /// A request payload failed validation before reaching the core.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// Backend-specific store failure with context.
    #[error("store error: {0}")]
    Store(String),
}

impl QueueError {
    /// True for lookup failures (unknown node or resource id).
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NodeNotFound(_) | Self::ResourceNotFound(_))
    }

    /// True when the operation was illegal given the node's current state.
    pub const fn is_invalid_state(&self) -> bool {
        matches!(
            self,
            Self::NodeCompleted(_)
                | Self::NodeUnassigned(_)
                | Self::AlreadyInService { .. }
                | Self::CapacityExhausted(_)
                | Self::NotInWaitingQueue { .. }
                | Self::InvalidRequest(_)
        )
    }
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
