//! Request/response models exchanged with the orchestration layer.

use serde::{Deserialize, Serialize};

use crate::core::{AllocationError, AllocationStatus, TokenId, TokenSource};
use crate::runtime::service::AllocationReceipt;

/// Token creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRequest {
    /// Target doctor.
    pub doctor_id: String,
    /// Target slot of that doctor.
    pub slot_id: String,
    /// Requesting patient.
    pub patient_id: String,
    /// Source category, fixes the base priority.
    pub source: TokenSource,
}

impl TokenRequest {
    /// Build a request.
    pub fn new(
        doctor_id: impl Into<String>,
        slot_id: impl Into<String>,
        patient_id: impl Into<String>,
        source: TokenSource,
    ) -> Self {
        Self {
            doctor_id: doctor_id.into(),
            slot_id: slot_id.into(),
            patient_id: patient_id.into(),
            source,
        }
    }

    /// Validate that all identifiers are present.
    pub fn validate(&self) -> Result<(), String> {
        if self.doctor_id.trim().is_empty() {
            return Err("Doctor ID is required".into());
        }
        if self.slot_id.trim().is_empty() {
            return Err("Slot ID is required".into());
        }
        if self.patient_id.trim().is_empty() {
            return Err("Patient ID is required".into());
        }
        Ok(())
    }
}

/// Externally visible allocation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseStatus {
    /// Admitted within capacity.
    Allocated,
    /// Placed on the waiting list.
    Waitlisted,
    /// Admitted by preempting a lower-priority token.
    Reallocated,
    /// Doctor or slot could not be resolved.
    Error,
}

impl From<AllocationStatus> for ResponseStatus {
    fn from(status: AllocationStatus) -> Self {
        match status {
            AllocationStatus::Allocated => Self::Allocated,
            AllocationStatus::Waitlisted => Self::Waitlisted,
            AllocationStatus::Reallocated => Self::Reallocated,
        }
    }
}

/// Allocation response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationResponse {
    /// Created token, absent on error.
    pub token_id: Option<TokenId>,
    /// Outcome.
    pub status: ResponseStatus,
    /// Human-readable explanation.
    pub reason: String,
    /// Token moved to the waiting list by a reallocation.
    pub evicted_token_id: Option<TokenId>,
    /// Approximate 1-based waiting position, for waitlisted tokens.
    pub position_in_queue: Option<usize>,
}

impl AllocationResponse {
    /// Map a successful engine decision.
    #[must_use]
    pub fn from_receipt(receipt: &AllocationReceipt) -> Self {
        let reason = match receipt.outcome.status {
            AllocationStatus::Allocated => "Token allocated successfully within slot capacity",
            AllocationStatus::Waitlisted => "Slot is full; token added to waiting queue",
            AllocationStatus::Reallocated => {
                "Lower-priority token was reallocated to the waiting queue based on fairness rules"
            }
        };
        Self {
            token_id: Some(receipt.token_id),
            status: receipt.outcome.status.into(),
            reason: reason.to_string(),
            evicted_token_id: receipt.outcome.evicted_token_id,
            position_in_queue: receipt.position_in_queue,
        }
    }

    /// Map a resolution or validation failure.
    #[must_use]
    pub fn from_error(err: &AllocationError) -> Self {
        let reason = match err {
            AllocationError::DoctorNotFound(_) => "Doctor not found".to_string(),
            AllocationError::SlotNotFound { .. } => "Slot not found".to_string(),
            other => other.to_string(),
        };
        Self {
            token_id: None,
            status: ResponseStatus::Error,
            reason,
            evicted_token_id: None,
            position_in_queue: None,
        }
    }
}

/// Cancellation response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelResponse {
    /// Whether a token was removed.
    pub cancelled: bool,
    /// Human-readable explanation.
    pub message: String,
}

impl CancelResponse {
    /// Build from the cancellation result.
    #[must_use]
    pub fn new(cancelled: bool) -> Self {
        let message = if cancelled {
            "Token cancelled successfully by patient"
        } else {
            "Token not found or already cancelled"
        };
        Self {
            cancelled,
            message: message.to_string(),
        }
    }
}

/// Health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    /// Healthy flag.
    pub ok: bool,
    /// Registered doctors.
    pub doctors: usize,
}
