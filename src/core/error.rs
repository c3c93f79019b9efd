//! Error types for allocation operations.

use thiserror::Error;

/// Errors produced by the registry, configuration and orchestration layers.
///
/// Allocation decisions themselves are never errors; see
/// [`AllocationStatus`](crate::core::AllocationStatus).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AllocationError {
    /// No doctor registered under the given id.
    #[error("doctor not found: {0}")]
    DoctorNotFound(String),
    /// The doctor exists but owns no slot with the given id.
    #[error("slot not found: {doctor}/{slot}")]
    SlotNotFound {
        /// Doctor that was resolved.
        doctor: String,
        /// Slot id that was not found.
        slot: String,
    },
    /// A slot with this id is already owned by the doctor.
    #[error("duplicate slot: {doctor}/{slot}")]
    DuplicateSlot {
        /// Owning doctor.
        doctor: String,
        /// Conflicting slot id.
        slot: String,
    },
    /// A doctor with this id is already registered.
    #[error("duplicate doctor: {0}")]
    DuplicateDoctor(String),
    /// Efficiency scores and factors must be positive and finite.
    #[error("invalid efficiency: {0}")]
    InvalidEfficiency(f64),
    /// Configuration failed validation.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    /// A request was missing required fields.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl AllocationError {
    /// True for unresolved doctor/slot lookups, the only errors surfaced to
    /// requesters as an `ERROR` response.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::DoctorNotFound(_) | Self::SlotNotFound { .. })
    }
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
