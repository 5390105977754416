//! Builders to construct the queue service from configuration.

pub mod service_builder;

pub use service_builder::{build_queue_service, store_from_config, store_from_env};
