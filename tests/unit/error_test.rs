//! Tests for error types

use opd_token_engine::core::AllocationError;

#[test]
fn test_doctor_not_found_error() {
    let err = AllocationError::DoctorNotFound("D7".to_string());
    assert_eq!(format!("{}", err), "doctor not found: D7");
    assert!(err.is_not_found());
}

#[test]
fn test_slot_not_found_error() {
    let err = AllocationError::SlotNotFound {
        doctor: "D1".to_string(),
        slot: "9-10".to_string(),
    };
    assert_eq!(format!("{}", err), "slot not found: D1/9-10");
    assert!(err.is_not_found());
}

#[test]
fn test_duplicate_slot_error() {
    let err = AllocationError::DuplicateSlot {
        doctor: "D1".to_string(),
        slot: "9-10".to_string(),
    };
    assert_eq!(format!("{}", err), "duplicate slot: D1/9-10");
    assert!(!err.is_not_found());
}

#[test]
fn test_invalid_efficiency_error() {
    let err = AllocationError::InvalidEfficiency(-0.5);
    assert_eq!(format!("{}", err), "invalid efficiency: -0.5");
}

#[test]
fn test_converts_into_anyhow() {
    fn fails() -> opd_token_engine::core::AppResult<()> {
        let result: Result<(), AllocationError> =
            Err(AllocationError::InvalidConfig("bad".to_string()));
        result?;
        Ok(())
    }
    let err = fails().unwrap_err();
    assert_eq!(err.to_string(), "invalid config: bad");
    assert!(err.downcast_ref::<AllocationError>().is_some());
}
