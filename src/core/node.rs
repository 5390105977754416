//! Node, entity, and lifecycle-log model.
//!
//! A node is the unit of work managed by the queue. Its lifecycle:
//!
//! - created (unassigned)
//! - assigned to a resource (enqueued into that resource's waiting queue)
//! - allocated into the resource's service queue (consumes capacity)
//! - completed (removed from all queues; no further moves/allocations)
//!
//! Every transition is recorded in the node's append-only log. Entries are not
//! guaranteed globally timestamp-sorted across concurrent writers, so any
//! consumer deriving ordered behavior from the log must stable-sort by
//! timestamp first (the metrics engine does).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::util::clock::now_ms;

/// The domain object a node does work for. Intentionally minimal (just a
/// name); it has no lifecycle of its own and is embedded in API payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Opaque label.
    pub name: String,
}

/// Lifecycle actions recorded in a node's log.
///
/// Serialized in snake_case so the wire strings stay stable and
/// human-readable (`created`, `moved_to_waiting_queue`, …).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogAction {
    /// Node constructed and registered.
    Created,
    /// Node entered a resource's waiting queue.
    MovedToWaitingQueue,
    /// Node promoted into a resource's service queue.
    MovedToServiceQueue,
    /// Node completed; terminal.
    Completed,
}

impl LogAction {
    /// Stable string form, matching the serde representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::MovedToWaitingQueue => "moved_to_waiting_queue",
            Self::MovedToServiceQueue => "moved_to_service_queue",
            Self::Completed => "completed",
        }
    }
}

/// One lifecycle event: an action, the resource it concerned (if any), and
/// when it happened. Never mutated or removed once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeLog {
    /// Action taken.
    pub action: LogAction,
    /// Resource context for `moved_to_*` entries; `None` for `created` and
    /// for completion of an unassigned node.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    /// Milliseconds since the Unix epoch.
    pub timestamp_ms: u128,
}

/// A unit of work flowing through the queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique node identifier (UUID v4 string).
    pub id: String,
    /// Owning entity.
    pub entity: Entity,
    /// Current resource assignment. `Some` iff the node sits in that
    /// resource's waiting or service queue; cleared permanently on
    /// completion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    /// Terminal flag. Once set, the node accepts no further transitions.
    pub completed: bool,
    /// Creation time, milliseconds since the Unix epoch.
    pub created_at_ms: u128,
    /// Append-only lifecycle log.
    pub log: Vec<NodeLog>,
}

impl Node {
    /// Construct a fresh, unassigned node for the given entity name with its
    /// initial `created` log entry.
    pub fn new(entity_name: impl Into<String>) -> Self {
        let created_at_ms = now_ms();
        let mut node = Self {
            id: Uuid::new_v4().to_string(),
            entity: Entity {
                name: entity_name.into(),
            },
            resource_id: None,
            completed: false,
            created_at_ms,
            log: Vec::new(),
        };
        node.push_log(LogAction::Created, None, created_at_ms);
        node
    }

    /// Rebuild a node from persisted fields. Used by restore; the lifecycle
    /// history stays in the store, so the in-memory log starts empty.
    pub(crate) fn restored(
        id: String,
        entity_name: String,
        resource_id: Option<String>,
        created_at_ms: u128,
    ) -> Self {
        Self {
            id,
            entity: Entity { name: entity_name },
            resource_id,
            completed: false,
            created_at_ms,
            log: Vec::new(),
        }
    }

    /// Append a lifecycle event. Callers serialize access through the queue
    /// service's write lock.
    pub(crate) fn push_log(
        &mut self,
        action: LogAction,
        resource_id: Option<String>,
        timestamp_ms: u128,
    ) {
        self.log.push(NodeLog {
            action,
            resource_id,
            timestamp_ms,
        });
    }

    /// Every resource this node has been assigned to, in log order
    /// (duplicates included when a node revisits a resource). A read-only
    /// view derived from the log; there is no separately owned history list.
    pub fn resource_history(&self) -> Vec<&str> {
        self.log
            .iter()
            .filter(|entry| entry.action == LogAction::MovedToWaitingQueue)
            .filter_map(|entry| entry.resource_id.as_deref())
            .collect()
    }
}
