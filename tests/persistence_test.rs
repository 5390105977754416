//! Best-effort persistence and restart round-trips.
//!
//! These validate:
//! 1. Store write failures never block queue operations
//! 2. A healthy store receives the full audit trail
//! 3. Completed nodes drop out of the restorable set
//! 4. A rebuilt service resumes exactly where the previous one stopped

use std::sync::Arc;

use prometheus_node_queue::builders::build_queue_service;
use prometheus_node_queue::config::ResourceSpec;
use prometheus_node_queue::core::{LogAction, QueueService, Resource};
use prometheus_node_queue::infra::store::{InMemoryStore, ResourceRow, Store};

fn specs() -> Vec<ResourceSpec> {
    vec![
        ResourceSpec {
            id: "A".into(),
            capacity: 1,
        },
        ResourceSpec {
            id: "B".into(),
            capacity: 2,
        },
    ]
}

#[tokio::test]
async fn test_write_failures_do_not_block_operations() {
    let store = InMemoryStore::new();
    store.fail_writes(true);

    let service = QueueService::new().with_store(Arc::new(store.clone()));
    service.add_resource(Resource::new("Room 1", 2)).await;

    let node = service.create_node("entity-a").await;
    service.move_node(&node.id, "Room 1").await.unwrap();
    service.allocate_node(&node.id).await.unwrap();
    service.complete_node(&node.id).await.unwrap();

    let completed = service.get_node(&node.id).await.unwrap();
    assert!(completed.completed);
    assert_eq!(completed.log.len(), 4);

    // Nothing reached the store.
    assert!(store.list_nodes().await.unwrap().is_empty());
    assert!(store
        .list_node_logs(&[node.id.clone()])
        .await
        .unwrap()
        .values()
        .all(Vec::is_empty));
}

#[tokio::test]
async fn test_store_receives_full_audit_trail() {
    let store = InMemoryStore::new();
    let service = QueueService::new().with_store(Arc::new(store.clone()));
    service.add_resource(Resource::new("Room 1", 2)).await;

    let node = service.create_node("entity-a").await;
    service.move_node(&node.id, "Room 1").await.unwrap();
    service.allocate_node(&node.id).await.unwrap();
    service.complete_node(&node.id).await.unwrap();

    let logs = store.list_node_logs(&[node.id.clone()]).await.unwrap();
    let rows = logs.get(&node.id).unwrap();
    let actions: Vec<LogAction> = rows.iter().map(|row| row.action).collect();
    assert_eq!(
        actions,
        vec![
            LogAction::Created,
            LogAction::MovedToWaitingQueue,
            LogAction::MovedToServiceQueue,
            LogAction::Completed,
        ]
    );
    assert!(rows[0].resource_id.is_none());
    assert_eq!(rows[3].resource_id.as_deref(), Some("Room 1"));

    // Completed nodes are gone from the restorable set.
    assert!(store.list_nodes().await.unwrap().is_empty());
    let rebuilt = QueueService::new().with_store(Arc::new(store));
    rebuilt.add_resource(Resource::new("Room 1", 2)).await;
    assert_eq!(rebuilt.restore_from_store().await, 0);
}

#[tokio::test]
async fn test_restart_resumes_previous_queue_state() {
    let store: Arc<dyn Store> = Arc::new(InMemoryStore::new());

    let first = build_queue_service(&specs(), Some(Arc::clone(&store))).await;
    let n1 = first.create_node("entity-1").await;
    first.move_node(&n1.id, "A").await.unwrap();
    first.allocate_node(&n1.id).await.unwrap();
    let n2 = first.create_node("entity-2").await;
    first.move_node(&n2.id, "A").await.unwrap();
    let n3 = first.create_node("entity-3").await;
    first.move_node(&n3.id, "B").await.unwrap();
    drop(first);

    let second = build_queue_service(&specs(), Some(store)).await;
    let a = second.get_resource("A").await.unwrap();
    assert_eq!(a.service, vec![n1.id.clone()]);
    assert_eq!(a.waiting, vec![n2.id.clone()]);
    let b = second.get_resource("B").await.unwrap();
    assert_eq!(b.waiting, vec![n3.id.clone()]);
    assert!(b.service.is_empty());

    let restored = second.get_node(&n1.id).await.unwrap();
    assert_eq!(restored.entity.name, "entity-1");
    assert_eq!(restored.resource_id.as_deref(), Some("A"));
}

#[tokio::test]
async fn test_stored_resources_override_boot_specs() {
    let store = InMemoryStore::new();
    store.seed_resources(vec![ResourceRow {
        id: "Stored".into(),
        capacity: 7,
    }]);

    let service = build_queue_service(&specs(), Some(Arc::new(store))).await;
    let listed = service.list_resources().await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, "Stored");
    assert_eq!(listed[0].capacity, 7);
    assert!(service.get_resource("A").await.is_err());
}
