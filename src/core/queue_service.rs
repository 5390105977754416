//! In-memory orchestration layer for nodes and resources.
//!
//! Semantics:
//! - Moving a node to a resource places it in that resource's waiting queue;
//!   capacity is never checked on a move.
//! - Allocation (waiting to service) is where capacity is enforced.
//! - Completion is terminal and detaches the node from every queue.
//!
//! Concurrency: all state lives in one [`QueueState`] value behind a single
//! `tokio::sync::RwLock`. Write operations hold the write guard for their
//! whole duration, including the best-effort store writes, so persistence for
//! one mutation finishes before the next mutation begins. Store failures are
//! logged and swallowed; they never change an operation's outcome.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::core::error::QueueError;
use crate::core::node::{LogAction, Node};
use crate::core::resource::Resource;
use crate::infra::store::Store;
use crate::util::clock::now_ms;

/// The single-writer state: the node index owns every [`Node`]; resources
/// hold id back-references. `BTreeMap` keeps resource listings sorted by id.
#[derive(Default)]
pub(crate) struct QueueState {
    pub(crate) nodes: HashMap<String, Node>,
    pub(crate) resources: BTreeMap<String, Resource>,
}

/// Admission-control service over capacity-limited resources.
#[derive(Default)]
pub struct QueueService {
    pub(crate) state: RwLock<QueueState>,
    pub(crate) store: Option<Arc<dyn Store>>,
}

fn log_store_failure(op: &str, result: Result<(), QueueError>) {
    if let Err(err) = result {
        warn!(op, error = %err, "best-effort store write failed");
    }
}

impl QueueService {
    /// New service with no persistence backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a persistence store. Writes to it are best-effort so API
    /// behavior stays stable when the backend is down.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn Store>) -> Self {
        self.store = Some(store);
        self
    }

    /// Register a resource by id, replacing any existing entry with the
    /// same id.
    pub async fn add_resource(&self, resource: Resource) {
        let mut state = self.state.write().await;
        state.resources.insert(resource.id.clone(), resource);
    }

    /// Create and index a new unassigned node for the given entity name.
    /// Infallible; returns a snapshot of the created node.
    pub async fn create_node(&self, entity_name: &str) -> Node {
        let mut state = self.state.write().await;

        let node = Node::new(entity_name);
        state.nodes.insert(node.id.clone(), node.clone());
        debug!(node_id = %node.id, entity = entity_name, "node created");

        if let Some(store) = &self.store {
            // Entities carry no identity in memory; the store keys them by a
            // synthetic id minted here.
            let entity_id = Uuid::new_v4().to_string();
            log_store_failure(
                "persist_node_created",
                store
                    .persist_node_created(&node.id, &entity_id, entity_name, node.created_at_ms)
                    .await,
            );
            log_store_failure(
                "insert_node_log(created)",
                store
                    .insert_node_log(&node.id, LogAction::Created, None, node.created_at_ms)
                    .await,
            );
        }

        node
    }

    /// Assign a node to a target resource's waiting queue.
    ///
    /// A node already assigned elsewhere is detached from that resource
    /// first (both queues searched). The target enqueue is unconditional;
    /// capacity is not checked here. Moving a service-queue node to its own
    /// resource demotes it back to waiting.
    pub async fn move_node(
        &self,
        node_id: &str,
        target_resource_id: &str,
    ) -> Result<Node, QueueError> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        let Some(node) = state.nodes.get_mut(node_id) else {
            return Err(QueueError::NodeNotFound(node_id.to_string()));
        };
        if node.completed {
            return Err(QueueError::NodeCompleted(node_id.to_string()));
        }
        if !state.resources.contains_key(target_resource_id) {
            return Err(QueueError::ResourceNotFound(target_resource_id.to_string()));
        }

        if let Some(prior_id) = node.resource_id.clone() {
            if let Some(prior) = state.resources.get_mut(&prior_id) {
                prior.remove(node);
            }
        }

        // Guaranteed present: the guard is held since the contains_key check.
        let Some(target) = state.resources.get_mut(target_resource_id) else {
            return Err(QueueError::ResourceNotFound(target_resource_id.to_string()));
        };
        let ts = now_ms();
        target.add(node);
        node.push_log(
            LogAction::MovedToWaitingQueue,
            Some(target_resource_id.to_string()),
            ts,
        );
        let snapshot = node.clone();
        debug!(node_id, resource_id = target_resource_id, "node moved to waiting queue");

        if let Some(store) = &self.store {
            log_store_failure(
                "update_node_resource(move)",
                store
                    .update_node_resource(node_id, Some(target_resource_id))
                    .await,
            );
            log_store_failure(
                "insert_node_log(moved_to_waiting_queue)",
                store
                    .insert_node_log(
                        node_id,
                        LogAction::MovedToWaitingQueue,
                        Some(target_resource_id),
                        ts,
                    )
                    .await,
            );
        }

        Ok(snapshot)
    }

    /// Promote a node from its resource's waiting queue into the service
    /// queue, enforcing capacity.
    ///
    /// Each failure mode is a distinct error: unknown node, completed node,
    /// unassigned node, missing resource, already in service, capacity
    /// exhausted, not in the waiting queue.
    pub async fn allocate_node(&self, node_id: &str) -> Result<Node, QueueError> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        let Some(node) = state.nodes.get_mut(node_id) else {
            return Err(QueueError::NodeNotFound(node_id.to_string()));
        };
        if node.completed {
            return Err(QueueError::NodeCompleted(node_id.to_string()));
        }
        let Some(resource_id) = node.resource_id.clone() else {
            return Err(QueueError::NodeUnassigned(node_id.to_string()));
        };
        let Some(resource) = state.resources.get_mut(&resource_id) else {
            return Err(QueueError::ResourceNotFound(resource_id));
        };
        if resource.is_in_service(node_id) {
            return Err(QueueError::AlreadyInService {
                node_id: node_id.to_string(),
                resource_id,
            });
        }
        resource.allocate(node_id)?;

        let ts = now_ms();
        node.push_log(
            LogAction::MovedToServiceQueue,
            Some(resource_id.clone()),
            ts,
        );
        let snapshot = node.clone();
        debug!(node_id, resource_id = %resource_id, "node allocated to service queue");

        if let Some(store) = &self.store {
            log_store_failure(
                "insert_node_log(moved_to_service_queue)",
                store
                    .insert_node_log(
                        node_id,
                        LogAction::MovedToServiceQueue,
                        Some(&resource_id),
                        ts,
                    )
                    .await,
            );
        }

        Ok(snapshot)
    }

    /// Mark a node completed, record where it completed, and detach it from
    /// any resource queues. Completed nodes cannot be moved or allocated
    /// again.
    pub async fn complete_node(&self, node_id: &str) -> Result<Node, QueueError> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        let Some(node) = state.nodes.get_mut(node_id) else {
            return Err(QueueError::NodeNotFound(node_id.to_string()));
        };
        if node.completed {
            return Err(QueueError::NodeCompleted(node_id.to_string()));
        }

        node.completed = true;
        let resource_at_completion = node.resource_id.clone();
        let ts = now_ms();
        node.push_log(LogAction::Completed, resource_at_completion.clone(), ts);

        if let Some(rid) = resource_at_completion.as_deref() {
            if let Some(resource) = state.resources.get_mut(rid) {
                resource.remove(node);
            }
        }
        node.resource_id = None;
        let snapshot = node.clone();
        debug!(node_id, resource_id = ?resource_at_completion, "node completed");

        if let Some(store) = &self.store {
            log_store_failure(
                "mark_node_completed",
                store.mark_node_completed(node_id).await,
            );
            log_store_failure(
                "insert_node_log(completed)",
                store
                    .insert_node_log(
                        node_id,
                        LogAction::Completed,
                        resource_at_completion.as_deref(),
                        ts,
                    )
                    .await,
            );
        }

        Ok(snapshot)
    }

    /// Snapshot of a node by id.
    pub async fn get_node(&self, node_id: &str) -> Result<Node, QueueError> {
        let state = self.state.read().await;
        state
            .nodes
            .get(node_id)
            .cloned()
            .ok_or_else(|| QueueError::NodeNotFound(node_id.to_string()))
    }

    /// Snapshot of a resource by id, queues included.
    pub async fn get_resource(&self, resource_id: &str) -> Result<Resource, QueueError> {
        let state = self.state.read().await;
        state
            .resources
            .get(resource_id)
            .cloned()
            .ok_or_else(|| QueueError::ResourceNotFound(resource_id.to_string()))
    }

    /// Snapshot of every node. No defined order.
    pub async fn list_nodes(&self) -> Vec<Node> {
        let state = self.state.read().await;
        state.nodes.values().cloned().collect()
    }

    /// Snapshot of every resource, sorted by id.
    pub async fn list_resources(&self) -> Vec<Resource> {
        let state = self.state.read().await;
        state.resources.values().cloned().collect()
    }
}
