//! Core queueing state machine, metrics, and recovery.

pub mod error;
pub mod metrics;
pub mod node;
pub mod queue_service;
pub mod resource;
pub mod restore;

pub use error::{AppResult, QueueError};
pub use metrics::{
    compute_node_metrics, NodeEvent, NodeMetrics, NodeSnapshot, NodesMetricsReport, WaitingSegment,
};
pub use node::{Entity, LogAction, Node, NodeLog};
pub use queue_service::QueueService;
pub use resource::Resource;
