//! In-memory store backend.
//!
//! Functionally complete: read methods answer from what the write methods
//! recorded, including the latest-transition derivation the SQL backend does
//! with `DISTINCT ON`. Used for tests and for running without a database.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::core::error::QueueError;
use crate::core::node::LogAction;
use crate::infra::store::{NodeLogRow, NodeStateRow, PersistedNode, QueueKind, ResourceRow, Store};

#[derive(Debug, Clone)]
struct EntityRecord {
    id: String,
    name: String,
}

#[derive(Debug, Clone)]
struct NodeRecord {
    node_id: String,
    entity_id: String,
    resource_id: Option<String>,
    completed: bool,
    created_at_ms: u128,
}

#[derive(Debug, Clone)]
struct LogRecord {
    node_id: String,
    row: NodeLogRow,
}

#[derive(Debug, Default)]
struct Inner {
    resources: Vec<ResourceRow>,
    entities: Vec<EntityRecord>,
    nodes: Vec<NodeRecord>,
    logs: Vec<LogRecord>,
    fail_writes: bool,
}

/// In-memory [`Store`]. Clones share the same underlying tables, so a test
/// can keep a handle while the service owns another.
///
/// Uses a `parking_lot::Mutex` internally; every method takes the lock for a
/// short, await-free critical section.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the persisted resource definitions. Restore prefers these over
    /// locally configured specs when any are present.
    pub fn seed_resources(&self, rows: Vec<ResourceRow>) {
        self.inner.lock().resources = rows;
    }

    /// Toggle write-failure injection. While set, every write method returns
    /// a [`QueueError::Store`] and records nothing; reads keep working.
    pub fn fail_writes(&self, fail: bool) {
        self.inner.lock().fail_writes = fail;
    }

    fn write_guard(inner: &Inner) -> Result<(), QueueError> {
        if inner.fail_writes {
            return Err(QueueError::Store("injected write failure".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn list_resources(&self) -> Result<Vec<ResourceRow>, QueueError> {
        let inner = self.inner.lock();
        let mut rows = inner.resources.clone();
        rows.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(rows)
    }

    async fn list_nodes(&self) -> Result<Vec<PersistedNode>, QueueError> {
        let inner = self.inner.lock();
        let mut out: Vec<PersistedNode> = inner
            .nodes
            .iter()
            .filter(|record| !record.completed)
            .map(|record| PersistedNode {
                node_id: record.node_id.clone(),
                entity_name: inner
                    .entities
                    .iter()
                    .find(|entity| entity.id == record.entity_id)
                    .map(|entity| entity.name.clone())
                    .unwrap_or_default(),
                resource_id: record.resource_id.clone(),
                created_at_ms: record.created_at_ms,
            })
            .collect();
        out.sort_by_key(|node| node.created_at_ms);
        Ok(out)
    }

    async fn list_latest_node_states(&self) -> Result<HashMap<String, NodeStateRow>, QueueError> {
        let inner = self.inner.lock();
        let mut out: HashMap<String, NodeStateRow> = HashMap::new();
        for record in &inner.logs {
            let queue = match record.row.action {
                LogAction::MovedToWaitingQueue => QueueKind::Waiting,
                LogAction::MovedToServiceQueue => QueueKind::Service,
                LogAction::Created | LogAction::Completed => continue,
            };
            let state = NodeStateRow {
                queue,
                ts_ms: record.row.ts_ms,
            };
            // Later appends win timestamp ties, like "latest row" in SQL.
            match out.get(&record.node_id) {
                Some(existing) if existing.ts_ms > state.ts_ms => {}
                _ => {
                    out.insert(record.node_id.clone(), state);
                }
            }
        }
        Ok(out)
    }

    async fn list_node_logs(
        &self,
        node_ids: &[String],
    ) -> Result<HashMap<String, Vec<NodeLogRow>>, QueueError> {
        let inner = self.inner.lock();
        let mut out: HashMap<String, Vec<NodeLogRow>> = HashMap::new();
        for record in &inner.logs {
            if node_ids.contains(&record.node_id) {
                out.entry(record.node_id.clone())
                    .or_default()
                    .push(record.row.clone());
            }
        }
        for rows in out.values_mut() {
            rows.sort_by_key(|row| row.ts_ms);
        }
        Ok(out)
    }

    async fn persist_node_created(
        &self,
        node_id: &str,
        entity_id: &str,
        entity_name: &str,
        created_at_ms: u128,
    ) -> Result<(), QueueError> {
        let mut inner = self.inner.lock();
        Self::write_guard(&inner)?;
        if inner.nodes.iter().any(|record| record.node_id == node_id) {
            return Ok(());
        }
        inner.entities.push(EntityRecord {
            id: entity_id.to_string(),
            name: entity_name.to_string(),
        });
        inner.nodes.push(NodeRecord {
            node_id: node_id.to_string(),
            entity_id: entity_id.to_string(),
            resource_id: None,
            completed: false,
            created_at_ms,
        });
        Ok(())
    }

    async fn update_node_resource(
        &self,
        node_id: &str,
        resource_id: Option<&str>,
    ) -> Result<(), QueueError> {
        let mut inner = self.inner.lock();
        Self::write_guard(&inner)?;
        if let Some(record) = inner
            .nodes
            .iter_mut()
            .find(|record| record.node_id == node_id)
        {
            record.resource_id = resource_id.map(ToString::to_string);
        }
        Ok(())
    }

    async fn mark_node_completed(&self, node_id: &str) -> Result<(), QueueError> {
        let mut inner = self.inner.lock();
        Self::write_guard(&inner)?;
        if let Some(record) = inner
            .nodes
            .iter_mut()
            .find(|record| record.node_id == node_id)
        {
            record.completed = true;
            record.resource_id = None;
        }
        Ok(())
    }

    async fn insert_node_log(
        &self,
        node_id: &str,
        action: LogAction,
        resource_id: Option<&str>,
        ts_ms: u128,
    ) -> Result<(), QueueError> {
        let mut inner = self.inner.lock();
        Self::write_guard(&inner)?;
        inner.logs.push(LogRecord {
            node_id: node_id.to_string(),
            row: NodeLogRow {
                action,
                resource_id: resource_id.map(ToString::to_string),
                ts_ms,
            },
        });
        Ok(())
    }
}
