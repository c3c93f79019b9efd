//! In-memory doctor registry.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::core::{AllocationError, Doctor, DoctorRegistry};

/// Registry holding doctors in a `RwLock`-guarded map.
///
/// Constructed explicitly and injected into the service; dropping it tears
/// down every doctor and slot it owns.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    doctors: RwLock<HashMap<String, Arc<Doctor>>>,
}

impl InMemoryRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered doctors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.doctors.read().len()
    }

    /// True when no doctors are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.doctors.read().is_empty()
    }

    /// Remove a doctor, returning it if present.
    pub fn remove(&self, doctor_id: &str) -> Option<Arc<Doctor>> {
        self.doctors.write().remove(doctor_id)
    }
}

impl DoctorRegistry for InMemoryRegistry {
    fn doctor(&self, doctor_id: &str) -> Option<Arc<Doctor>> {
        self.doctors.read().get(doctor_id).cloned()
    }

    fn register(&self, doctor: Doctor) -> Result<Arc<Doctor>, AllocationError> {
        let mut doctors = self.doctors.write();
        if doctors.contains_key(doctor.id()) {
            return Err(AllocationError::DuplicateDoctor(doctor.id().to_string()));
        }
        let doctor = Arc::new(doctor);
        doctors.insert(doctor.id().to_string(), Arc::clone(&doctor));
        tracing::debug!(doctor = %doctor.id(), "doctor registered");
        Ok(doctor)
    }

    fn doctor_ids(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.doctors.read().keys().cloned().collect();
        ids.sort();
        ids
    }
}
