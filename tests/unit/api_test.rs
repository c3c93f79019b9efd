//! Tests for request/response models

use opd_token_engine::core::{
    AllocationError, AllocationOutcome, AllocationStatus, TokenId, TokenSource,
};
use opd_token_engine::runtime::{
    AllocationReceipt, AllocationResponse, CancelResponse, ResponseStatus, TokenRequest,
};

fn receipt(status: AllocationStatus, evicted: Option<TokenId>) -> AllocationReceipt {
    AllocationReceipt {
        token_id: TokenId::new_v4(),
        doctor_id: "D1".into(),
        slot_id: "9-10".into(),
        outcome: AllocationOutcome {
            status,
            evicted_token_id: evicted,
            priority: 65,
            diagnostic: None,
        },
        position_in_queue: None,
    }
}

#[test]
fn test_token_request_validation() {
    let req = TokenRequest::new("D1", "9-10", "P001", TokenSource::FollowUp);
    assert!(req.validate().is_ok());

    let req = TokenRequest::new("", "9-10", "P001", TokenSource::FollowUp);
    assert_eq!(req.validate().unwrap_err(), "Doctor ID is required");

    let req = TokenRequest::new("D1", "9-10", "", TokenSource::FollowUp);
    assert_eq!(req.validate().unwrap_err(), "Patient ID is required");
}

#[test]
fn test_response_from_receipt() {
    let allocated = AllocationResponse::from_receipt(&receipt(AllocationStatus::Allocated, None));
    assert_eq!(allocated.status, ResponseStatus::Allocated);
    assert!(allocated.token_id.is_some());

    let evicted = TokenId::new_v4();
    let reallocated =
        AllocationResponse::from_receipt(&receipt(AllocationStatus::Reallocated, Some(evicted)));
    assert_eq!(reallocated.status, ResponseStatus::Reallocated);
    assert_eq!(reallocated.evicted_token_id, Some(evicted));
    assert_eq!(
        reallocated.reason,
        "Lower-priority token was reallocated to the waiting queue based on fairness rules"
    );
}

#[test]
fn test_response_from_errors() {
    let resp = AllocationResponse::from_error(&AllocationError::SlotNotFound {
        doctor: "D1".into(),
        slot: "8-9".into(),
    });
    assert_eq!(resp.status, ResponseStatus::Error);
    assert_eq!(resp.reason, "Slot not found");

    let resp = AllocationResponse::from_error(&AllocationError::InvalidRequest(
        "Patient ID is required".into(),
    ));
    assert_eq!(resp.reason, "invalid request: Patient ID is required");
}

#[test]
fn test_response_wire_format() {
    let resp = AllocationResponse::from_receipt(&receipt(AllocationStatus::Waitlisted, None));
    let json = serde_json::to_value(&resp).unwrap();
    assert_eq!(json["status"], "WAITLISTED");
    assert!(json["evicted_token_id"].is_null());

    let cancel = serde_json::to_value(CancelResponse::new(false)).unwrap();
    assert_eq!(cancel["cancelled"], false);
}

#[test]
fn test_status_conversion() {
    for (status, expected) in [
        (AllocationStatus::Allocated, ResponseStatus::Allocated),
        (AllocationStatus::Waitlisted, ResponseStatus::Waitlisted),
        (AllocationStatus::Reallocated, ResponseStatus::Reallocated),
    ] {
        assert_eq!(ResponseStatus::from(status), expected);
    }
}
