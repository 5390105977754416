//! Comprehensive benchmarks for the node queue service.
//!
//! Benchmarks cover:
//! - Resource queue membership operations
//! - Node lifecycle throughput through the queue service
//! - Metrics derivation from event histories
//! - Restart recovery at increasing store sizes

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use std::sync::Arc;

use prometheus_node_queue::core::{
    compute_node_metrics, LogAction, Node, NodeEvent, NodeSnapshot, QueueService, Resource,
};
use prometheus_node_queue::infra::store::{InMemoryStore, Store};
use prometheus_node_queue::util::now_ms;

use rand::seq::SliceRandom;
use tokio::runtime::Runtime;

// ============================================================================
// Helper Functions
// ============================================================================

const BASE_MS: u128 = 1_000_000;

fn build_events(count: usize) -> Vec<NodeEvent> {
    (0..count)
        .map(|i| NodeEvent {
            action: if i % 2 == 0 {
                LogAction::MovedToWaitingQueue
            } else {
                LogAction::MovedToServiceQueue
            },
            resource_id: Some(format!("room-{}", (i / 2) % 8)),
            ts_ms: BASE_MS + i as u128 * 1_000,
        })
        .collect()
}

fn build_snapshot() -> NodeSnapshot {
    NodeSnapshot {
        id: "bench-node".to_string(),
        entity_name: "bench-entity".to_string(),
        created_at_ms: BASE_MS,
        completed: false,
    }
}

async fn seed_store(store: &InMemoryStore, count: u64) {
    for i in 0..count {
        let node_id = format!("node-{}", i);
        let room = format!("room-{}", i % 8);
        store
            .persist_node_created(
                &node_id,
                &format!("ent-{}", i),
                "bench-entity",
                BASE_MS + u128::from(i),
            )
            .await
            .unwrap();
        store
            .update_node_resource(&node_id, Some(&room))
            .await
            .unwrap();
        store
            .insert_node_log(
                &node_id,
                LogAction::MovedToWaitingQueue,
                Some(&room),
                BASE_MS + 10_000 + u128::from(i),
            )
            .await
            .unwrap();
    }
}

// ============================================================================
// Resource Queue Benchmarks
// ============================================================================

fn bench_resource_queue_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("resource_queue_cycle");

    for size in [100, 1_000, 5_000] {
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let mut resource = Resource::new("bench-room", size as usize);
                let mut nodes: Vec<Node> = (0..size)
                    .map(|i| Node::new(format!("entity-{}", i % 10)))
                    .collect();

                // Waiting queue admission
                for node in &mut nodes {
                    resource.add(node);
                }
                // Promotion into the service queue, in arrival-independent order
                let mut order: Vec<String> = nodes.iter().map(|n| n.id.clone()).collect();
                order.shuffle(&mut rand::rng());
                for id in &order {
                    resource.allocate(id).unwrap();
                }
                // Departure
                for node in &mut nodes {
                    resource.remove(node);
                }
                black_box(resource);
            });
        });
    }
    group.finish();
}

// ============================================================================
// Queue Service Benchmarks (Async)
// ============================================================================

fn bench_node_lifecycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("node_lifecycle");

    for count in [50, 200, 500] {
        group.throughput(Throughput::Elements(count));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.to_async(Runtime::new().unwrap()).iter(|| async move {
                let service = QueueService::new();
                service
                    .add_resource(Resource::new("bench-room", count as usize))
                    .await;

                for i in 0..count {
                    let node = service.create_node(&format!("entity-{}", i % 10)).await;
                    service.move_node(&node.id, "bench-room").await.unwrap();
                    service.allocate_node(&node.id).await.unwrap();
                    service.complete_node(&node.id).await.unwrap();
                }
            });
        });
    }
    group.finish();
}

fn bench_report_over_live_service(c: &mut Criterion) {
    let mut group = c.benchmark_group("report_over_live_service");

    for count in [50, 200] {
        group.throughput(Throughput::Elements(count));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.to_async(Runtime::new().unwrap()).iter(|| async move {
                let service = QueueService::new();
                service
                    .add_resource(Resource::new("bench-room", (count / 2) as usize))
                    .await;

                // Half the nodes reach service, half stay waiting
                for i in 0..count {
                    let node = service.create_node(&format!("entity-{}", i % 10)).await;
                    service.move_node(&node.id, "bench-room").await.unwrap();
                    if i % 2 == 0 {
                        service.allocate_node(&node.id).await.unwrap();
                    }
                }

                let report = service.node_metrics(now_ms()).await;
                black_box(report);
            });
        });
    }
    group.finish();
}

// ============================================================================
// Metrics Benchmarks
// ============================================================================

fn bench_metrics_derivation(c: &mut Criterion) {
    let mut group = c.benchmark_group("metrics_derivation");

    for events in [10, 100, 1_000] {
        group.throughput(Throughput::Elements(events));
        group.bench_with_input(BenchmarkId::from_parameter(events), &events, |b, &events| {
            let history = build_events(events as usize);
            let snapshot = build_snapshot();
            let report_at = BASE_MS + events as u128 * 1_000 + 1;

            b.iter(|| {
                let metrics = compute_node_metrics(report_at, &snapshot, history.clone());
                black_box(metrics);
            });
        });
    }
    group.finish();
}

// ============================================================================
// Restore Benchmarks
// ============================================================================

fn bench_restore_from_store(c: &mut Criterion) {
    let mut group = c.benchmark_group("restore_from_store");

    for count in [100, 1_000, 5_000] {
        group.throughput(Throughput::Elements(count));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let rt = Runtime::new().unwrap();
            let store = InMemoryStore::new();
            rt.block_on(seed_store(&store, count));

            b.to_async(&rt).iter(|| async {
                let service = QueueService::new().with_store(Arc::new(store.clone()));
                for r in 0..8 {
                    service
                        .add_resource(Resource::new(format!("room-{}", r), 16))
                        .await;
                }
                let restored = service.restore_from_store().await;
                black_box(restored);
            });
        });
    }
    group.finish();
}

// ============================================================================
// Benchmark Groups
// ============================================================================

criterion_group!(resource_benches, bench_resource_queue_cycle);

criterion_group!(
    service_benches,
    bench_node_lifecycle,
    bench_report_over_live_service
);

criterion_group!(metrics_benches, bench_metrics_derivation);

criterion_group!(restore_benches, bench_restore_from_store);

criterion_main!(
    resource_benches,
    service_benches,
    metrics_benches,
    restore_benches
);
