//! Doctors own slots and an efficiency multiplier that scales their capacity.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockWriteGuard};

use crate::core::{scaled_capacity, AllocationError, Slot};

/// Efficiency and slot map, guarded together by the doctor's lock.
#[derive(Debug)]
pub struct DoctorState {
    efficiency: f64,
    slots: HashMap<String, Arc<Slot>>,
}

impl DoctorState {
    /// Current efficiency score.
    #[must_use]
    pub const fn efficiency(&self) -> f64 {
        self.efficiency
    }

    /// Owned slots.
    pub fn slots(&self) -> impl Iterator<Item = &Arc<Slot>> {
        self.slots.values()
    }

    /// Multiply the efficiency score by `factor` and return the new score.
    pub(crate) fn scale_efficiency(&mut self, factor: f64) -> f64 {
        self.efficiency *= factor;
        self.efficiency
    }
}

/// A doctor and their slots.
///
/// Slot lookup takes a read lock and hands out an `Arc<Slot>`, so callers
/// never hold the doctor lock while working on a slot.
#[derive(Debug)]
pub struct Doctor {
    id: String,
    state: RwLock<DoctorState>,
}

impl Doctor {
    /// Create a doctor with no slots.
    ///
    /// # Errors
    ///
    /// Returns [`AllocationError::InvalidEfficiency`] unless `efficiency` is
    /// positive and finite.
    pub fn new(id: impl Into<String>, efficiency: f64) -> Result<Self, AllocationError> {
        if !(efficiency.is_finite() && efficiency > 0.0) {
            return Err(AllocationError::InvalidEfficiency(efficiency));
        }
        Ok(Self {
            id: id.into(),
            state: RwLock::new(DoctorState {
                efficiency,
                slots: HashMap::new(),
            }),
        })
    }

    /// Doctor identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current efficiency score.
    #[must_use]
    pub fn efficiency(&self) -> f64 {
        self.state.read().efficiency
    }

    /// Add a slot scaled by the current efficiency.
    ///
    /// # Errors
    ///
    /// Returns [`AllocationError::DuplicateSlot`] if the id is taken.
    pub fn add_slot(
        &self,
        slot_id: impl Into<String>,
        base_capacity: u32,
    ) -> Result<Arc<Slot>, AllocationError> {
        let slot_id = slot_id.into();
        let mut state = self.state.write();
        if state.slots.contains_key(&slot_id) {
            return Err(AllocationError::DuplicateSlot {
                doctor: self.id.clone(),
                slot: slot_id,
            });
        }
        let slot = Arc::new(Slot::new(slot_id.clone(), base_capacity, state.efficiency));
        state.slots.insert(slot_id, Arc::clone(&slot));
        tracing::debug!(
            doctor = %self.id,
            slot = %slot.id(),
            base_capacity,
            effective_capacity = scaled_capacity(base_capacity, state.efficiency),
            "slot added"
        );
        Ok(slot)
    }

    /// Resolve a slot by id.
    #[must_use]
    pub fn slot(&self, slot_id: &str) -> Option<Arc<Slot>> {
        self.state.read().slots.get(slot_id).cloned()
    }

    /// Owned slot ids, sorted.
    #[must_use]
    pub fn slot_ids(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.state.read().slots.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Exclusive access for efficiency updates.
    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, DoctorState> {
        self.state.write()
    }
}
