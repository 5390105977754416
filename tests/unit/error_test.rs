//! Tests for error types

use prometheus_node_queue::core::QueueError;

#[test]
fn test_node_not_found_error() {
    let err = QueueError::NodeNotFound("n1".to_string());
    assert_eq!(format!("{}", err), "node not found: n1");
}

#[test]
fn test_resource_not_found_error() {
    let err = QueueError::ResourceNotFound("Room 1".to_string());
    assert_eq!(format!("{}", err), "resource not found: Room 1");
}

#[test]
fn test_node_completed_error() {
    let err = QueueError::NodeCompleted("n1".to_string());
    assert_eq!(format!("{}", err), "node n1 is already completed");
}

#[test]
fn test_node_unassigned_error() {
    let err = QueueError::NodeUnassigned("n1".to_string());
    assert_eq!(format!("{}", err), "node n1 is not assigned to a resource");
}

#[test]
fn test_already_in_service_error() {
    let err = QueueError::AlreadyInService {
        node_id: "n1".to_string(),
        resource_id: "Room 1".to_string(),
    };
    assert_eq!(
        format!("{}", err),
        "node n1 is already in the service queue of Room 1"
    );
}

#[test]
fn test_capacity_exhausted_error() {
    let err = QueueError::CapacityExhausted("Room 1".to_string());
    assert_eq!(format!("{}", err), "resource Room 1 is at full capacity");
}

#[test]
fn test_not_in_waiting_queue_error() {
    let err = QueueError::NotInWaitingQueue {
        node_id: "n1".to_string(),
        resource_id: "Room 1".to_string(),
    };
    assert_eq!(
        format!("{}", err),
        "node n1 is not in the waiting queue of Room 1"
    );
}

#[test]
fn test_invalid_request_error() {
    let err = QueueError::InvalidRequest("entity_name is required".to_string());
    assert_eq!(
        format!("{}", err),
        "invalid request: entity_name is required"
    );
}

#[test]
fn test_store_error() {
    let err = QueueError::Store("connection failed".to_string());
    assert_eq!(format!("{}", err), "store error: connection failed");
}

#[test]
fn test_not_found_class() {
    assert!(QueueError::NodeNotFound("n1".to_string()).is_not_found());
    assert!(QueueError::ResourceNotFound("r1".to_string()).is_not_found());
    assert!(!QueueError::NodeCompleted("n1".to_string()).is_not_found());
    assert!(!QueueError::Store("down".to_string()).is_not_found());
}

#[test]
fn test_invalid_state_class() {
    assert!(QueueError::NodeCompleted("n1".to_string()).is_invalid_state());
    assert!(QueueError::NodeUnassigned("n1".to_string()).is_invalid_state());
    assert!(QueueError::CapacityExhausted("r1".to_string()).is_invalid_state());
    assert!(QueueError::InvalidRequest("bad".to_string()).is_invalid_state());
    assert!(!QueueError::NodeNotFound("n1".to_string()).is_invalid_state());
    assert!(!QueueError::Store("down".to_string()).is_invalid_state());
}
