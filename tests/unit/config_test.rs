//! Tests for configuration validation

use opd_token_engine::config::{
    CapacityShrink, DoctorConfig, EngineConfig, RegistryConfig, SlotConfig, WaitlistCancellation,
};

fn doctor(id: &str, efficiency: f64, slots: &[(&str, u32)]) -> DoctorConfig {
    DoctorConfig {
        id: id.to_string(),
        efficiency,
        slots: slots
            .iter()
            .map(|(id, cap)| SlotConfig {
                id: (*id).to_string(),
                base_capacity: *cap,
            })
            .collect(),
    }
}

#[test]
fn test_engine_config_defaults_are_valid() {
    let cfg = EngineConfig::default();
    assert!(cfg.validate().is_ok());
    assert!((cfg.aging_factor - 0.3).abs() < f64::EPSILON);
    assert_eq!(cfg.reallocation_penalty, 10);
}

#[test]
fn test_engine_config_invalid_values() {
    let negative_aging = EngineConfig {
        aging_factor: -0.1,
        ..EngineConfig::default()
    };
    assert!(negative_aging.validate().is_err());

    let negative_penalty = EngineConfig {
        reallocation_penalty: -1,
        ..EngineConfig::default()
    };
    assert!(negative_penalty.validate().is_err());

    let no_audit = EngineConfig {
        audit_capacity: 0,
        ..EngineConfig::default()
    };
    assert!(no_audit.validate().is_err());
}

#[test]
fn test_engine_config_from_partial_json() {
    let cfg = EngineConfig::from_json_str(
        r#"{"waitlist_cancellation": "remove", "capacity_shrink": "evict_excess"}"#,
    )
    .unwrap();
    assert_eq!(cfg.waitlist_cancellation, WaitlistCancellation::Remove);
    assert_eq!(cfg.capacity_shrink, CapacityShrink::EvictExcess);
    assert_eq!(cfg.reallocation_penalty, 10);

    let err = EngineConfig::from_json_str(r#"{"capacity_shrink": "sometimes"}"#).unwrap_err();
    assert!(err.starts_with("parse error"));
}

#[test]
fn test_engine_config_from_env_without_overrides() {
    // No OPD_* variables are set by the test harness.
    let cfg = EngineConfig::from_env().unwrap();
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_registry_config_validation() {
    let valid = RegistryConfig {
        doctors: vec![
            doctor("D1", 1.0, &[("9-10", 6), ("10-11", 6)]),
            doctor("D2", 0.8, &[("9-10", 4)]),
        ],
    };
    assert!(valid.validate().is_ok());
}

#[test]
fn test_registry_config_requires_doctors() {
    let empty = RegistryConfig { doctors: vec![] };
    assert!(empty.validate().is_err());
}

#[test]
fn test_registry_config_invalid_efficiency() {
    for efficiency in [0.0, -1.0, f64::INFINITY] {
        let cfg = RegistryConfig {
            doctors: vec![doctor("D1", efficiency, &[("9-10", 6)])],
        };
        assert!(cfg.validate().is_err(), "efficiency {efficiency} accepted");
    }
}

#[test]
fn test_registry_config_invalid_slots() {
    let zero = RegistryConfig {
        doctors: vec![doctor("D1", 1.0, &[("9-10", 0)])],
    };
    assert!(zero.validate().is_err());

    let duplicate = RegistryConfig {
        doctors: vec![doctor("D1", 1.0, &[("9-10", 6), ("9-10", 3)])],
    };
    let err = duplicate.validate().unwrap_err();
    assert!(err.contains("duplicate slot"));
}

#[test]
fn test_registry_config_duplicate_doctor() {
    let cfg = RegistryConfig {
        doctors: vec![doctor("D1", 1.0, &[]), doctor("D1", 1.2, &[])],
    };
    assert_eq!(cfg.validate().unwrap_err(), "duplicate doctor `D1`");
}
