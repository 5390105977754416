//! # Prometheus Node Queue
//!
//! An admission-control and queueing core for orchestrating AI agent
//! workloads across capacity-limited resources.
//!
//! This library manages units of work ("nodes") flowing through named
//! resources. A node is created unassigned, assigned into a resource's
//! waiting queue, promoted into the capacity-consuming service queue when a
//! slot is free, and finally completed. Waiting never consumes capacity;
//! allocation is the only admission point where capacity is enforced.
//!
//! ## Core Problem Solved
//!
//! Agent workloads need explicit admission control rather than best-effort
//! fan-out:
//!
//! - **Bounded service slots**: Each resource serves a fixed number of nodes
//!   at once; everything else waits in line
//! - **Observable lifecycles**: Every transition is logged per node, so wait
//!   times and time-in-system can be derived after the fact
//! - **Restart recovery**: Queue state is rebuilt from a best-effort audit
//!   store, including waiting-queue order
//! - **Degraded operation**: The store being down never changes queueing
//!   behavior, only what survives a restart
//!
//! ## Key Features
//!
//! - **Single-writer state**: One owned data structure behind a request
//!   serializing lock; resources hold id back-references, the node index
//!   owns the nodes
//! - **Distinct failure modes**: Capacity exhaustion, queue-membership
//!   drift, completed-node reuse, and unknown ids are separate errors
//! - **Derived metrics**: Waiting segments and totals recomputed from the
//!   lifecycle logs on demand, never stored
//! - **Config bootstrap**: Resource definitions from a CSV file with
//!   built-in defaults; store settings from the environment
//!
//! ## Usage
//!
//! ```rust,ignore
//! use prometheus_node_queue::builders::build_queue_service;
//! use prometheus_node_queue::config::load_resource_specs;
//! use prometheus_node_queue::runtime::api::{self, CreateNodeRequest};
//!
//! let specs = load_resource_specs("config.txt");
//! let service = build_queue_service(&specs, None).await;
//!
//! let node = api::create_node(
//!     &service,
//!     CreateNodeRequest {
//!         entity_name: "entity-1".into(),
//!         resource_id: Some("Room 1".into()),
//!     },
//! )
//! .await?;
//! let node = api::allocate_node(&service, &node.id).await?;
//! api::complete_node(&service, &node.id).await?;
//! ```
//!
//! For complete examples, see:
//! - `tests/queue_service_test.rs` - Full lifecycle integration tests
//! - `tests/restore_test.rs` - Restart recovery behavior

#![deny(warnings)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core queueing state machine, metrics, and recovery.
pub mod core;
/// Configuration models for resources and the persistence store.
pub mod config;
/// Builders to construct the queue service from configuration.
pub mod builders;
/// Infrastructure adapters for persistence backends.
pub mod infra;
/// API surface for transport layers.
pub mod runtime;
/// Shared utilities.
pub mod util;
