//! API surface for transport layers.

pub mod api;

pub use api::{status_code_for, CreateNodeRequest, ErrorResponse, MoveNodeRequest};
