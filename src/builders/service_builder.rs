//! Assembles a ready [`QueueService`] from resource specs and an optional
//! store: seed resources, then restore persisted nodes into them.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::{ResourceSpec, StoreConfig};
use crate::core::{QueueService, Resource};
use crate::infra::store::{PostgresStore, Store};

/// Build the store adapter for the given settings, or `None` when they are
/// incomplete and the service should run memory-only.
pub fn store_from_config(config: &StoreConfig) -> Option<Arc<dyn Store>> {
    if !config.enabled() {
        return None;
    }
    info!(host = %config.host, name = %config.name, "store configured");
    Some(Arc::new(PostgresStore::new(config.dsn())))
}

/// [`store_from_config`] over settings read from the environment.
pub fn store_from_env() -> Option<Arc<dyn Store>> {
    store_from_config(&StoreConfig::from_env())
}

/// Build a queue service: register resources, attach the store, and restore
/// persisted nodes.
///
/// Resource definitions listed by the store take precedence whenever it
/// returns any; the provided specs are the fallback (store unreachable,
/// empty, or absent). Specs that fail validation are skipped with a warning.
pub async fn build_queue_service(
    specs: &[ResourceSpec],
    store: Option<Arc<dyn Store>>,
) -> QueueService {
    let stored_resources = match &store {
        Some(store) => match store.list_resources().await {
            Ok(rows) if !rows.is_empty() => Some(rows),
            Ok(_) => None,
            Err(err) => {
                warn!(error = %err, "stored resource listing failed, using configured specs");
                None
            }
        },
        None => None,
    };

    let mut service = QueueService::new();
    if let Some(store) = store {
        service = service.with_store(store);
    }

    if let Some(rows) = stored_resources {
        for row in rows {
            info!(resource_id = %row.id, capacity = row.capacity, "registering stored resource");
            service
                .add_resource(Resource::new(row.id, row.capacity))
                .await;
        }
    } else {
        for spec in specs {
            if let Err(reason) = spec.validate() {
                warn!(resource_id = %spec.id, reason, "skipping invalid resource spec");
                continue;
            }
            info!(resource_id = %spec.id, capacity = spec.capacity, "registering resource");
            service
                .add_resource(Resource::new(spec.id.clone(), spec.capacity))
                .await;
        }
    }

    let restored = service.restore_from_store().await;
    info!(restored, "queue service ready");
    service
}
