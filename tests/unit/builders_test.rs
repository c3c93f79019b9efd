//! Tests for builder modules

use opd_token_engine::builders::{build_audit_sink, build_registry, build_service};
use opd_token_engine::config::{EngineConfig, RegistryConfig};
use opd_token_engine::core::{AllocationError, DoctorRegistry};
use opd_token_engine::util::ManualClock;

const REGISTRY_JSON: &str = r#"{
    "doctors": [
        {"id": "D1", "efficiency": 1.0, "slots": [
            {"id": "9-10", "base_capacity": 6},
            {"id": "10-11", "base_capacity": 6}
        ]},
        {"id": "D2", "efficiency": 0.5, "slots": [
            {"id": "9-10", "base_capacity": 5}
        ]},
        {"id": "D3", "efficiency": 1.2}
    ]
}"#;

#[test]
fn test_build_registry_from_json() {
    let cfg = RegistryConfig::from_json_str(REGISTRY_JSON).unwrap();
    let registry = build_registry(&cfg).unwrap();

    assert_eq!(registry.len(), 3);
    assert_eq!(registry.doctor_ids(), vec!["D1", "D2", "D3"]);

    let (_, slot) = registry.resolve_slot("D2", "9-10").unwrap();
    assert_eq!(slot.base_capacity(), 5);
    assert_eq!(slot.effective_capacity(), 2);

    let d3 = registry.resolve_doctor("D3").unwrap();
    assert!(d3.slot_ids().is_empty());
}

#[test]
fn test_build_registry_rejects_invalid_config() {
    let cfg = RegistryConfig { doctors: vec![] };
    assert!(matches!(
        build_registry(&cfg),
        Err(AllocationError::InvalidConfig(_))
    ));
}

#[test]
fn test_build_service_wires_engine_config() {
    let cfg = RegistryConfig::from_json_str(REGISTRY_JSON).unwrap();
    let engine_cfg = EngineConfig {
        reallocation_penalty: 25,
        ..EngineConfig::default()
    };
    let service = build_service(&engine_cfg, &cfg, ManualClock::new(0)).unwrap();
    assert_eq!(service.engine().calculator().reallocation_penalty(), 25);
    assert_eq!(service.health().doctors, 3);
}

#[test]
fn test_build_service_rejects_invalid_engine_config() {
    let cfg = RegistryConfig::from_json_str(REGISTRY_JSON).unwrap();
    let engine_cfg = EngineConfig {
        aging_factor: f64::NAN,
        ..EngineConfig::default()
    };
    assert!(matches!(
        build_service(&engine_cfg, &cfg, ManualClock::new(0)),
        Err(AllocationError::InvalidConfig(_))
    ));
}

#[test]
fn test_build_audit_sink_uses_capacity() {
    use opd_token_engine::core::{AuditAction, AuditEvent, AuditSink};

    let sink = build_audit_sink(&EngineConfig {
        audit_capacity: 1,
        ..EngineConfig::default()
    });
    let token = uuid::Uuid::new_v4();
    let mut guard = sink.lock();
    guard.record(AuditEvent::new(token, "D1", "s", AuditAction::Allocate, 0));
    guard.record(AuditEvent::new(token, "D1", "s", AuditAction::Cancel, 1));
    assert_eq!(guard.events().len(), 1);
    assert_eq!(guard.events()[0].action, AuditAction::Cancel);
    assert_eq!(guard.events()[0].seq, 2);
}
