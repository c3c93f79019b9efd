//! Resolver abstraction over the doctor/slot registry.

use std::sync::Arc;

use crate::core::{AllocationError, Doctor, Slot};

/// Abstraction for doctor registries.
///
/// Implementations must tolerate concurrent lookups interleaved with
/// registrations.
pub trait DoctorRegistry: Send + Sync {
    /// Resolve a doctor by id.
    fn doctor(&self, doctor_id: &str) -> Option<Arc<Doctor>>;

    /// Register a doctor.
    ///
    /// # Errors
    ///
    /// Returns [`AllocationError::DuplicateDoctor`] if the id is taken.
    fn register(&self, doctor: Doctor) -> Result<Arc<Doctor>, AllocationError>;

    /// Registered doctor ids, sorted.
    fn doctor_ids(&self) -> Vec<String>;

    /// Resolve a doctor, mapping absence to an error.
    ///
    /// # Errors
    ///
    /// Returns [`AllocationError::DoctorNotFound`].
    fn resolve_doctor(&self, doctor_id: &str) -> Result<Arc<Doctor>, AllocationError> {
        self.doctor(doctor_id)
            .ok_or_else(|| AllocationError::DoctorNotFound(doctor_id.to_string()))
    }

    /// Resolve a doctor and one of their slots.
    ///
    /// # Errors
    ///
    /// Returns [`AllocationError::DoctorNotFound`] or
    /// [`AllocationError::SlotNotFound`].
    fn resolve_slot(
        &self,
        doctor_id: &str,
        slot_id: &str,
    ) -> Result<(Arc<Doctor>, Arc<Slot>), AllocationError> {
        let doctor = self.resolve_doctor(doctor_id)?;
        let slot = doctor.slot(slot_id).ok_or_else(|| AllocationError::SlotNotFound {
            doctor: doctor_id.to_string(),
            slot: slot_id.to_string(),
        })?;
        Ok((doctor, slot))
    }
}
