//! API-facing request/response models and thin service functions.
//!
//! The HTTP server, routing, and CORS live outside this crate; these are the
//! payload shapes and per-endpoint behaviors a transport layer wires up.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::{Node, NodesMetricsReport, QueueError, QueueService, Resource};
use crate::util::clock::now_ms;

/// Node creation payload. When `resource_id` is given, the created node is
/// immediately moved to that resource's waiting queue.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateNodeRequest {
    /// Entity the node does work for. Required.
    pub entity_name: String,
    /// Optional resource to assign the fresh node to.
    pub resource_id: Option<String>,
}

/// Node move payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveNodeRequest {
    /// Resource whose waiting queue the node should join. Required.
    pub target_resource_id: String,
}

/// Error envelope returned alongside a non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

impl From<&QueueError> for ErrorResponse {
    fn from(err: &QueueError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

/// HTTP status a transport should map this error to: 404 for the not-found
/// class, 500 for store failures, 400 for everything else.
#[must_use]
pub fn status_code_for(err: &QueueError) -> u16 {
    if err.is_not_found() {
        404
    } else if matches!(err, QueueError::Store(_)) {
        500
    } else {
        400
    }
}

/// Create a node, optionally assigning it to a resource right away.
///
/// A failed immediate assignment is logged and the created (unassigned)
/// node is still returned; creation itself has already happened.
pub async fn create_node(
    service: &QueueService,
    req: CreateNodeRequest,
) -> Result<Node, QueueError> {
    if req.entity_name.is_empty() {
        return Err(QueueError::InvalidRequest("entity_name is required".into()));
    }

    let node = service.create_node(&req.entity_name).await;
    info!(node_id = %node.id, entity = %req.entity_name, "node created");

    match req.resource_id.as_deref() {
        Some(resource_id) if !resource_id.is_empty() => {
            match service.move_node(&node.id, resource_id).await {
                Ok(updated) => Ok(updated),
                Err(err) => {
                    warn!(
                        node_id = %node.id,
                        resource_id,
                        error = %err,
                        "initial assignment failed, returning unassigned node"
                    );
                    Ok(node)
                }
            }
        }
        _ => Ok(node),
    }
}

/// Assign a node to the requested resource's waiting queue.
pub async fn move_node(
    service: &QueueService,
    node_id: &str,
    req: MoveNodeRequest,
) -> Result<Node, QueueError> {
    if req.target_resource_id.is_empty() {
        return Err(QueueError::InvalidRequest(
            "target_resource_id is required".into(),
        ));
    }
    let node = service.move_node(node_id, &req.target_resource_id).await?;
    info!(node_id, resource_id = %req.target_resource_id, "node moved");
    Ok(node)
}

/// Promote a node into its resource's service queue.
pub async fn allocate_node(service: &QueueService, node_id: &str) -> Result<Node, QueueError> {
    let node = service.allocate_node(node_id).await?;
    info!(node_id, "node allocated");
    Ok(node)
}

/// Complete a node.
pub async fn complete_node(service: &QueueService, node_id: &str) -> Result<Node, QueueError> {
    let node = service.complete_node(node_id).await?;
    info!(node_id, "node completed");
    Ok(node)
}

/// Fetch one node.
pub async fn get_node(service: &QueueService, node_id: &str) -> Result<Node, QueueError> {
    service.get_node(node_id).await
}

/// List every node.
pub async fn list_nodes(service: &QueueService) -> Vec<Node> {
    service.list_nodes().await
}

/// List every resource, sorted by id.
pub async fn list_resources(service: &QueueService) -> Vec<Resource> {
    service.list_resources().await
}

/// Compute the metrics report for every node as of now.
pub async fn node_metrics(service: &QueueService) -> NodesMetricsReport {
    service.node_metrics(now_ms()).await
}
