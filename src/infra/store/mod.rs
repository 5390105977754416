//! Persistence backends for the queue audit trail.
//!
//! The store is an optional collaborator of the queue service. During normal
//! operation it is a best-effort audit sink: every mutation is offered to it,
//! and failures are logged and swallowed so queue behavior never depends on
//! the backend being reachable. The read side serves two consumers: restore
//! (rebuilding in-memory state after a restart) and metrics (full lifecycle
//! history that survives restarts).

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PostgresStore;

use std::collections::HashMap;

use async_trait::async_trait;

use crate::core::error::QueueError;
use crate::core::node::LogAction;

/// Which queue a node occupied according to its latest persisted transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueKind {
    /// Latest transition was `moved_to_waiting_queue`.
    Waiting,
    /// Latest transition was `moved_to_service_queue`.
    Service,
}

/// A resource definition as persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRow {
    /// Resource identifier.
    pub id: String,
    /// Service-queue capacity.
    pub capacity: usize,
}

/// A non-completed node as persisted, the unit of restore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedNode {
    /// Node identifier.
    pub node_id: String,
    /// Owning entity's name.
    pub entity_name: String,
    /// Last known resource assignment, if any.
    pub resource_id: Option<String>,
    /// Creation time, milliseconds since the Unix epoch.
    pub created_at_ms: u128,
}

/// The latest waiting/service transition recorded for a node. Nodes with no
/// such row default to waiting, keyed by their creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeStateRow {
    /// Queue the node last entered.
    pub queue: QueueKind,
    /// When it entered, milliseconds since the Unix epoch.
    pub ts_ms: u128,
}

/// One persisted lifecycle log row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeLogRow {
    /// Action recorded.
    pub action: LogAction,
    /// Resource context, if any.
    pub resource_id: Option<String>,
    /// Event time, milliseconds since the Unix epoch.
    pub ts_ms: u128,
}

/// Persistence and recovery boundary for the queue service.
///
/// Write methods are audit-trail appends; callers treat their errors as
/// non-fatal. Read methods must answer from what the writes recorded so a
/// restarted service can rebuild its queues and metrics history.
#[async_trait]
pub trait Store: Send + Sync {
    /// Resource definitions, sorted by id.
    async fn list_resources(&self) -> Result<Vec<ResourceRow>, QueueError>;

    /// Non-completed nodes, ordered by creation time ascending.
    async fn list_nodes(&self) -> Result<Vec<PersistedNode>, QueueError>;

    /// Latest waiting/service transition per node id. Nodes that never moved
    /// have no entry.
    async fn list_latest_node_states(&self) -> Result<HashMap<String, NodeStateRow>, QueueError>;

    /// Lifecycle logs for the given nodes, each list ordered by timestamp
    /// ascending. Nodes with no rows may be absent from the map.
    async fn list_node_logs(
        &self,
        node_ids: &[String],
    ) -> Result<HashMap<String, Vec<NodeLogRow>>, QueueError>;

    /// Record a node and its entity at creation time. The entity row is
    /// keyed by `entity_id`, a synthetic id minted by the caller at persist
    /// time (entities have no identity in memory). Replays of the same node
    /// id are no-ops.
    async fn persist_node_created(
        &self,
        node_id: &str,
        entity_id: &str,
        entity_name: &str,
        created_at_ms: u128,
    ) -> Result<(), QueueError>;

    /// Record a node's current resource assignment (`None` clears it).
    async fn update_node_resource(
        &self,
        node_id: &str,
        resource_id: Option<&str>,
    ) -> Result<(), QueueError>;

    /// Flag a node completed and clear its persisted assignment.
    async fn mark_node_completed(&self, node_id: &str) -> Result<(), QueueError>;

    /// Append one lifecycle log row.
    async fn insert_node_log(
        &self,
        node_id: &str,
        action: LogAction,
        resource_id: Option<&str>,
        ts_ms: u128,
    ) -> Result<(), QueueError>;
}
