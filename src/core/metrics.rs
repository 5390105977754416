//! Derived metrics over node lifecycle logs.
//!
//! Nothing here is stored: every report is recomputed from the logs at call
//! time. The computation is deterministic for a given event set because
//! events are stable-sorted by timestamp first, so ties keep their insertion
//! order.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::node::{LogAction, Node, NodeLog};
use crate::core::queue_service::QueueService;
use crate::infra::store::NodeLogRow;

/// Time a node spent in one resource's waiting queue. Starts when the node
/// enters the queue and ends when it is allocated there, moved away,
/// completed, or (for a still-open wait) at the report's `now`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitingSegment {
    /// Resource whose waiting queue this was.
    pub resource_id: String,
    /// Segment start, milliseconds since the Unix epoch.
    pub start_ts_ms: u128,
    /// Segment end, milliseconds since the Unix epoch.
    pub end_ts_ms: u128,
    /// `end - start`, floored at zero.
    pub duration_ms: u128,
}

/// Computed view over one node's lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeMetrics {
    /// Node identifier.
    pub id: String,
    /// Owning entity's name.
    pub entity_name: String,
    /// Node creation time, milliseconds since the Unix epoch.
    pub created_at_ms: u128,
    /// Whether the node has completed.
    pub completed: bool,
    /// Creation to completion (or to `now` while active), floored at zero.
    pub total_time_in_system_ms: u128,
    /// Every waiting period, in chronological order.
    pub waiting_segments: Vec<WaitingSegment>,
}

/// Full metrics report: every known node, split by completion state, both
/// lists sorted by creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodesMetricsReport {
    /// Metrics for nodes still in the system.
    pub active_nodes: Vec<NodeMetrics>,
    /// Metrics for completed nodes.
    pub completed_nodes: Vec<NodeMetrics>,
}

/// One lifecycle event as the metrics computation sees it, source-agnostic:
/// in-memory log entries and persisted rows both convert into this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeEvent {
    /// Action recorded.
    pub action: LogAction,
    /// Resource context, if any.
    pub resource_id: Option<String>,
    /// Event time, milliseconds since the Unix epoch.
    pub ts_ms: u128,
}

impl From<&NodeLog> for NodeEvent {
    fn from(entry: &NodeLog) -> Self {
        Self {
            action: entry.action,
            resource_id: entry.resource_id.clone(),
            ts_ms: entry.timestamp_ms,
        }
    }
}

impl From<NodeLogRow> for NodeEvent {
    fn from(row: NodeLogRow) -> Self {
        Self {
            action: row.action,
            resource_id: row.resource_id,
            ts_ms: row.ts_ms,
        }
    }
}

/// The per-node fields the computation needs, captured under the read lock.
#[derive(Debug, Clone)]
pub struct NodeSnapshot {
    /// Node identifier.
    pub id: String,
    /// Owning entity's name.
    pub entity_name: String,
    /// Node creation time, milliseconds since the Unix epoch.
    pub created_at_ms: u128,
    /// Whether the node has completed.
    pub completed: bool,
}

impl From<&Node> for NodeSnapshot {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id.clone(),
            entity_name: node.entity.name.clone(),
            created_at_ms: node.created_at_ms,
            completed: node.completed,
        }
    }
}

fn close_open(segments: &mut [WaitingSegment], open_idx: &mut Option<usize>, end_ts_ms: u128) {
    if let Some(idx) = open_idx.take() {
        let segment = &mut segments[idx];
        segment.end_ts_ms = end_ts_ms;
        segment.duration_ms = end_ts_ms.saturating_sub(segment.start_ts_ms);
    }
}

/// Compute one node's metrics from its lifecycle events.
///
/// At most one waiting segment is open at a time. A waiting event closes any
/// open segment and opens a new one; a service event closes the open segment
/// only when its resource matches (a mismatch is ignored); completion records
/// the completion time and closes the open segment; a segment still open at
/// the end closes at `now_ms`. Completion freezes total time in system.
pub fn compute_node_metrics(
    now_ms: u128,
    snapshot: &NodeSnapshot,
    mut events: Vec<NodeEvent>,
) -> NodeMetrics {
    // Logs may be appended out of timestamp order; sort (stably) first.
    events.sort_by_key(|event| event.ts_ms);

    let mut segments: Vec<WaitingSegment> = Vec::new();
    let mut open_idx: Option<usize> = None;
    let mut completed_ts: Option<u128> = None;

    for event in events {
        match event.action {
            LogAction::MovedToWaitingQueue => {
                close_open(&mut segments, &mut open_idx, event.ts_ms);
                segments.push(WaitingSegment {
                    resource_id: event.resource_id.unwrap_or_default(),
                    start_ts_ms: event.ts_ms,
                    end_ts_ms: 0,
                    duration_ms: 0,
                });
                open_idx = Some(segments.len() - 1);
            }
            LogAction::MovedToServiceQueue => {
                let event_resource = event.resource_id.as_deref().unwrap_or_default();
                let matches_open =
                    open_idx.is_some_and(|idx| segments[idx].resource_id == event_resource);
                if matches_open {
                    close_open(&mut segments, &mut open_idx, event.ts_ms);
                }
            }
            LogAction::Completed => {
                completed_ts = Some(event.ts_ms);
                close_open(&mut segments, &mut open_idx, event.ts_ms);
            }
            LogAction::Created => {}
        }
    }

    close_open(&mut segments, &mut open_idx, now_ms);

    let end_ts_ms = completed_ts.unwrap_or(now_ms);
    NodeMetrics {
        id: snapshot.id.clone(),
        entity_name: snapshot.entity_name.clone(),
        created_at_ms: snapshot.created_at_ms,
        completed: snapshot.completed,
        total_time_in_system_ms: end_ts_ms.saturating_sub(snapshot.created_at_ms),
        waiting_segments: segments,
    }
}

impl QueueService {
    /// Metrics for every known node, active and completed.
    ///
    /// Snapshots node state under the read lock, releases it, then fetches
    /// lifecycle logs. Store logs are preferred per node when present (they
    /// survive restarts); nodes without store rows, or every node when the
    /// store read fails, fall back to the in-memory log.
    pub async fn node_metrics(&self, now_ms: u128) -> NodesMetricsReport {
        let (snapshots, mem_logs, node_ids) = {
            let state = self.state.read().await;
            let mut snapshots = Vec::with_capacity(state.nodes.len());
            let mut mem_logs: HashMap<String, Vec<NodeLog>> =
                HashMap::with_capacity(state.nodes.len());
            let mut node_ids = Vec::with_capacity(state.nodes.len());
            for (id, node) in &state.nodes {
                snapshots.push(NodeSnapshot::from(node));
                mem_logs.insert(id.clone(), node.log.clone());
                node_ids.push(id.clone());
            }
            (snapshots, mem_logs, node_ids)
        };

        let mut store_logs: Option<HashMap<String, Vec<NodeLogRow>>> = None;
        if let Some(store) = &self.store {
            if !node_ids.is_empty() {
                match store.list_node_logs(&node_ids).await {
                    Ok(rows) => store_logs = Some(rows),
                    Err(err) => {
                        warn!(error = %err, "store log listing failed, using in-memory logs");
                    }
                }
            }
        }

        let mut active_nodes = Vec::new();
        let mut completed_nodes = Vec::new();
        for snapshot in snapshots {
            let events: Vec<NodeEvent> = match store_logs
                .as_ref()
                .and_then(|logs| logs.get(&snapshot.id))
            {
                Some(rows) if !rows.is_empty() => {
                    rows.iter().cloned().map(NodeEvent::from).collect()
                }
                _ => mem_logs
                    .get(&snapshot.id)
                    .map(|log| log.iter().map(NodeEvent::from).collect())
                    .unwrap_or_default(),
            };

            let metrics = compute_node_metrics(now_ms, &snapshot, events);
            if snapshot.completed {
                completed_nodes.push(metrics);
            } else {
                active_nodes.push(metrics);
            }
        }

        active_nodes.sort_by_key(|metrics| metrics.created_at_ms);
        completed_nodes.sort_by_key(|metrics| metrics.created_at_ms);

        NodesMetricsReport {
            active_nodes,
            completed_nodes,
        }
    }
}
