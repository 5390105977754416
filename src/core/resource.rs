//! Capacity-limited resource with waiting and service queues.
//!
//! A resource owns two ordered queues of node ids. The waiting queue is
//! unbounded admission order; the service queue consumes capacity. Nodes are
//! owned by the queue service's node index, so the queues here are
//! back-references, not owners.
//!
//! Queue invariant: a node id appears at most once across both queues of at
//! most one resource. Callers keep it by removing a node from its prior
//! resource before adding it elsewhere; `add` itself is unconditional.

use serde::{Deserialize, Serialize};

use crate::core::error::QueueError;
use crate::core::node::Node;

/// A capacity-limited processing slot with FIFO admission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    /// Unique resource identifier.
    pub id: String,
    /// Maximum number of nodes in service at once. Zero is legal and makes
    /// every allocation fail.
    pub capacity: usize,
    /// Node ids currently consuming capacity, in allocation order.
    pub service: Vec<String>,
    /// Node ids waiting for capacity, in arrival order.
    pub waiting: Vec<String>,
}

impl Resource {
    /// New resource with empty queues.
    pub fn new(id: impl Into<String>, capacity: usize) -> Self {
        Self {
            id: id.into(),
            capacity,
            service: Vec::new(),
            waiting: Vec::new(),
        }
    }

    /// Append the node to the waiting queue and point it at this resource.
    /// Unconditional: never blocked by capacity, and the caller has already
    /// detached the node from any prior resource.
    pub fn add(&mut self, node: &mut Node) {
        node.resource_id = Some(self.id.clone());
        self.waiting.push(node.id.clone());
    }

    /// Promote a waiting node into the service queue.
    ///
    /// Checks capacity first, then waiting membership, so the two failure
    /// modes stay distinguishable to callers.
    pub fn allocate(&mut self, node_id: &str) -> Result<(), QueueError> {
        if self.is_full() {
            return Err(QueueError::CapacityExhausted(self.id.clone()));
        }
        let Some(position) = self.waiting.iter().position(|id| id == node_id) else {
            return Err(QueueError::NotInWaitingQueue {
                node_id: node_id.to_string(),
                resource_id: self.id.clone(),
            });
        };
        let id = self.waiting.remove(position);
        self.service.push(id);
        Ok(())
    }

    /// Detach the node from this resource: drop its id from the service
    /// queue if present, else from the waiting queue, and clear the node's
    /// assignment. Returns whether a queue entry was dropped. Idempotent; a
    /// node found in neither queue is a no-op apart from the pointer clear.
    pub fn remove(&mut self, node: &mut Node) -> bool {
        node.resource_id = None;
        if let Some(position) = self.service.iter().position(|id| id == &node.id) {
            self.service.remove(position);
            return true;
        }
        if let Some(position) = self.waiting.iter().position(|id| id == &node.id) {
            self.waiting.remove(position);
            return true;
        }
        false
    }

    /// Whether the node id sits in either queue.
    pub fn contains(&self, node_id: &str) -> bool {
        self.is_in_service(node_id) || self.is_in_waiting(node_id)
    }

    /// Whether the node id is currently consuming capacity.
    pub fn is_in_service(&self, node_id: &str) -> bool {
        self.service.iter().any(|id| id == node_id)
    }

    /// Whether the node id is currently waiting.
    pub fn is_in_waiting(&self, node_id: &str) -> bool {
        self.waiting.iter().any(|id| id == node_id)
    }

    /// Free service slots. Saturating: restore may load more nodes into
    /// service than `capacity`, which reads as zero here, never underflows.
    pub fn available_capacity(&self) -> usize {
        self.capacity.saturating_sub(self.service.len())
    }

    /// Whether the service queue is at (or beyond) capacity.
    pub fn is_full(&self) -> bool {
        self.service.len() >= self.capacity
    }

    /// Bulk-load both queues during restore. Trusted replay of persisted
    /// state: appends in the order given and bypasses the capacity check.
    pub(crate) fn load_queues(&mut self, waiting: Vec<String>, service: Vec<String>) {
        self.waiting.extend(waiting);
        self.service.extend(service);
    }
}
