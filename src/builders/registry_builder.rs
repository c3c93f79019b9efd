//! Builders to construct the doctor registry and allocation service.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::{EngineConfig, RegistryConfig};
use crate::core::{AllocationEngine, AllocationError, Doctor, DoctorRegistry, InMemoryAuditSink};
use crate::infra::InMemoryRegistry;
use crate::runtime::AllocationService;
use crate::util::clock::Clock;

/// Build an in-memory registry from configuration.
///
/// # Errors
///
/// Returns [`AllocationError::InvalidConfig`] if validation fails, or the
/// registration error for a conflicting doctor or slot.
pub fn build_registry(cfg: &RegistryConfig) -> Result<InMemoryRegistry, AllocationError> {
    cfg.validate().map_err(AllocationError::InvalidConfig)?;

    let registry = InMemoryRegistry::new();
    for doctor_cfg in &cfg.doctors {
        let doctor = Doctor::new(doctor_cfg.id.clone(), doctor_cfg.efficiency)?;
        for slot_cfg in &doctor_cfg.slots {
            doctor.add_slot(slot_cfg.id.clone(), slot_cfg.base_capacity)?;
        }
        registry.register(doctor)?;
    }
    tracing::info!(doctors = registry.len(), "registry initialized");
    Ok(registry)
}

/// Bounded in-memory audit sink sized by `cfg.audit_capacity`.
#[must_use]
pub fn build_audit_sink(cfg: &EngineConfig) -> Arc<Mutex<InMemoryAuditSink>> {
    Arc::new(Mutex::new(InMemoryAuditSink::new(cfg.audit_capacity)))
}

/// Build a service over a freshly seeded registry.
///
/// # Errors
///
/// Returns [`AllocationError::InvalidConfig`] if either configuration is
/// invalid, or any error from [`build_registry`].
pub fn build_service<C: Clock>(
    engine_cfg: &EngineConfig,
    registry_cfg: &RegistryConfig,
    clock: C,
) -> Result<AllocationService<InMemoryRegistry, C>, AllocationError> {
    engine_cfg.validate().map_err(AllocationError::InvalidConfig)?;
    let registry = Arc::new(build_registry(registry_cfg)?);
    Ok(AllocationService::new(
        registry,
        AllocationEngine::new(engine_cfg),
        clock,
    ))
}
