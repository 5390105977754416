//! Infrastructure adapters for persistence backends.

pub mod store;

pub use store::InMemoryStore;
pub use store::PostgresStore;
pub use store::Store;
