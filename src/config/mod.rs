//! Configuration models for resources and the persistence store.

pub mod resources;
pub mod store;

pub use resources::{default_resource_specs, load_resource_specs, ResourceSpec};
pub use store::StoreConfig;
