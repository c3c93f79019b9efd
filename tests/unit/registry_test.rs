//! Tests for the in-memory doctor registry

use opd_token_engine::core::{AllocationError, Doctor, DoctorRegistry};
use opd_token_engine::infra::InMemoryRegistry;

#[test]
fn test_register_and_resolve_slot() {
    let registry = InMemoryRegistry::new();
    let doctor = Doctor::new("D1", 1.2).unwrap();
    doctor.add_slot("9-10", 5).unwrap();
    registry.register(doctor).unwrap();

    let (doctor, slot) = registry.resolve_slot("D1", "9-10").unwrap();
    assert_eq!(doctor.id(), "D1");
    assert_eq!(slot.effective_capacity(), 6);
}

#[test]
fn test_resolution_failures() {
    let registry = InMemoryRegistry::new();
    registry.register(Doctor::new("D1", 1.0).unwrap()).unwrap();

    assert_eq!(
        registry.resolve_doctor("D2").unwrap_err(),
        AllocationError::DoctorNotFound("D2".into())
    );
    assert_eq!(
        registry.resolve_slot("D1", "9-10").unwrap_err(),
        AllocationError::SlotNotFound {
            doctor: "D1".into(),
            slot: "9-10".into()
        }
    );
}

#[test]
fn test_slots_added_after_registration_are_visible() {
    let registry = InMemoryRegistry::new();
    let doctor = registry.register(Doctor::new("D1", 1.0).unwrap()).unwrap();
    doctor.add_slot("14-15", 3).unwrap();

    assert!(registry.resolve_slot("D1", "14-15").is_ok());
    assert!(matches!(
        doctor.add_slot("14-15", 4),
        Err(AllocationError::DuplicateSlot { .. })
    ));
}

#[test]
fn test_remove_doctor() {
    let registry = InMemoryRegistry::new();
    registry.register(Doctor::new("D1", 1.0).unwrap()).unwrap();
    assert!(registry.remove("D1").is_some());
    assert!(registry.is_empty());
    assert!(registry.doctor("D1").is_none());
}
