//! Postgres store adapter (schema and interface stubs).

use std::collections::HashMap;

use async_trait::async_trait;

use crate::core::error::QueueError;
use crate::core::node::LogAction;
use crate::infra::store::{NodeLogRow, NodeStateRow, PersistedNode, ResourceRow, Store};

/// Postgres store adapter placeholder. Carries the schema and connection
/// string; every method reports a backend error until wired to a database
/// client. Restore and metrics degrade gracefully when that happens, so a
/// service built with this adapter still runs from memory.
pub struct PostgresStore {
    dsn: String,
}

impl PostgresStore {
    /// Create a new adapter for the given connection string.
    pub fn new(dsn: impl Into<String>) -> Self {
        Self { dsn: dsn.into() }
    }

    /// Connection string this adapter would dial.
    pub fn dsn(&self) -> &str {
        &self.dsn
    }

    /// Migration statements for the audit schema.
    pub fn migrations() -> &'static [&'static str] {
        &[
            r#"
CREATE TABLE IF NOT EXISTS entities (
    id UUID PRIMARY KEY,
    name TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE TABLE IF NOT EXISTS resources (
    id TEXT PRIMARY KEY,
    capacity INT NOT NULL
);
CREATE TABLE IF NOT EXISTS nodes (
    id UUID PRIMARY KEY,
    entity_id UUID NOT NULL REFERENCES entities (id),
    resource_id TEXT,
    completed BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE TABLE IF NOT EXISTS node_logs (
    id BIGSERIAL PRIMARY KEY,
    node_id UUID NOT NULL REFERENCES nodes (id),
    action TEXT NOT NULL,
    resource_id TEXT,
    ts TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE INDEX IF NOT EXISTS idx_nodes_completed_created ON nodes (completed, created_at);
CREATE INDEX IF NOT EXISTS idx_node_logs_node_ts ON node_logs (node_id, ts DESC);
"#,
        ]
    }

    fn unwired<T>() -> Result<T, QueueError> {
        Err(QueueError::Store(
            "postgres store not wired to database client".into(),
        ))
    }
}

#[async_trait]
impl Store for PostgresStore {
    async fn list_resources(&self) -> Result<Vec<ResourceRow>, QueueError> {
        Self::unwired()
    }

    async fn list_nodes(&self) -> Result<Vec<PersistedNode>, QueueError> {
        Self::unwired()
    }

    async fn list_latest_node_states(&self) -> Result<HashMap<String, NodeStateRow>, QueueError> {
        Self::unwired()
    }

    async fn list_node_logs(
        &self,
        _node_ids: &[String],
    ) -> Result<HashMap<String, Vec<NodeLogRow>>, QueueError> {
        Self::unwired()
    }

    async fn persist_node_created(
        &self,
        _node_id: &str,
        _entity_id: &str,
        _entity_name: &str,
        _created_at_ms: u128,
    ) -> Result<(), QueueError> {
        Self::unwired()
    }

    async fn update_node_resource(
        &self,
        _node_id: &str,
        _resource_id: Option<&str>,
    ) -> Result<(), QueueError> {
        Self::unwired()
    }

    async fn mark_node_completed(&self, _node_id: &str) -> Result<(), QueueError> {
        Self::unwired()
    }

    async fn insert_node_log(
        &self,
        _node_id: &str,
        _action: LogAction,
        _resource_id: Option<&str>,
        _ts_ms: u128,
    ) -> Result<(), QueueError> {
        Self::unwired()
    }
}
