//! Tests for request payloads and error mapping

use prometheus_node_queue::core::QueueError;
use prometheus_node_queue::runtime::{status_code_for, CreateNodeRequest, ErrorResponse, MoveNodeRequest};

#[test]
fn test_create_request_defaults_missing_fields() {
    let req: CreateNodeRequest = serde_json::from_str("{}").unwrap();
    assert!(req.entity_name.is_empty());
    assert!(req.resource_id.is_none());
}

#[test]
fn test_create_request_with_resource() {
    let req: CreateNodeRequest =
        serde_json::from_str(r#"{"entity_name":"e1","resource_id":"Room 1"}"#).unwrap();
    assert_eq!(req.entity_name, "e1");
    assert_eq!(req.resource_id.as_deref(), Some("Room 1"));
}

#[test]
fn test_move_request_defaults_missing_target() {
    let req: MoveNodeRequest = serde_json::from_str("{}").unwrap();
    assert!(req.target_resource_id.is_empty());
}

#[test]
fn test_error_response_carries_the_message() {
    let err = QueueError::NodeNotFound("n1".to_string());
    let body = serde_json::to_value(ErrorResponse::from(&err)).unwrap();
    assert_eq!(body, serde_json::json!({"error": "node not found: n1"}));
}

#[test]
fn test_status_codes_follow_error_class() {
    assert_eq!(
        status_code_for(&QueueError::NodeNotFound("n1".to_string())),
        404
    );
    assert_eq!(
        status_code_for(&QueueError::ResourceNotFound("r1".to_string())),
        404
    );
    assert_eq!(status_code_for(&QueueError::Store("down".to_string())), 500);
    assert_eq!(
        status_code_for(&QueueError::CapacityExhausted("r1".to_string())),
        400
    );
    assert_eq!(
        status_code_for(&QueueError::InvalidRequest("bad".to_string())),
        400
    );
    assert_eq!(
        status_code_for(&QueueError::NodeCompleted("n1".to_string())),
        400
    );
}
