//! Admission and preemption decisions for a single slot.
//!
//! Every operation takes the slot lock once and holds it for the whole
//! decision, so the size checks, the peek at the eviction candidate and the
//! resulting mutations are atomic with respect to other callers on the same
//! slot. Operations on different slots never contend.

use serde::{Deserialize, Serialize};

use crate::config::{CapacityShrink, EngineConfig, WaitlistCancellation, ZeroCapacityAdmission};
use crate::core::{
    scaled_capacity, AllocationError, Doctor, PriorityCalculator, Slot, SlotState, Token, TokenId,
};

/// Outcome category of an allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AllocationStatus {
    /// Admitted within capacity.
    Allocated,
    /// Placed on the waiting list.
    Waitlisted,
    /// Admitted by evicting a lower-priority admission.
    Reallocated,
}

impl AllocationStatus {
    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Allocated => "ALLOCATED",
            Self::Waitlisted => "WAITLISTED",
            Self::Reallocated => "REALLOCATED",
        }
    }
}

/// Anomalies observed while deciding. Logged, never treated as failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationDiagnostic {
    /// The slot reported no free capacity but had nothing admitted to
    /// compare against (zero effective capacity).
    EmptyAtCapacity,
    /// A token with the same id already sits in the slot; nothing changed and
    /// the outcome reports its current placement.
    AlreadyPlaced,
}

/// Result of [`AllocationEngine::allocate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationOutcome {
    /// Decision taken.
    pub status: AllocationStatus,
    /// Token moved from admitted to waiting, for `Reallocated`.
    pub evicted_token_id: Option<TokenId>,
    /// Priority the new token was snapshotted at.
    pub priority: i64,
    /// Anomaly observed, if any.
    pub diagnostic: Option<AllocationDiagnostic>,
}

impl AllocationOutcome {
    const fn new(status: AllocationStatus, priority: i64) -> Self {
        Self {
            status,
            evicted_token_id: None,
            priority,
            diagnostic: None,
        }
    }
}

/// The admission/preemption algorithm plus its policies.
#[derive(Debug, Clone)]
pub struct AllocationEngine {
    calculator: PriorityCalculator,
    waitlist_cancellation: WaitlistCancellation,
    capacity_shrink: CapacityShrink,
    zero_capacity: ZeroCapacityAdmission,
}

impl Default for AllocationEngine {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl AllocationEngine {
    /// Create an engine from configuration.
    #[must_use]
    pub const fn new(cfg: &EngineConfig) -> Self {
        Self {
            calculator: cfg.calculator(),
            waitlist_cancellation: cfg.waitlist_cancellation,
            capacity_shrink: cfg.capacity_shrink,
            zero_capacity: cfg.zero_capacity,
        }
    }

    /// Priority calculator in use.
    #[must_use]
    pub const fn calculator(&self) -> &PriorityCalculator {
        &self.calculator
    }

    /// Effective priority of `token` at `now_ms`.
    #[must_use]
    pub fn compute_priority(&self, token: &Token, now_ms: u128) -> i64 {
        self.calculator.calculate(token, now_ms)
    }

    /// Admit `token` into `slot`, preempting the lowest admission if the new
    /// token strictly outranks it, otherwise waitlisting it.
    ///
    /// A token whose id is already admitted or waiting in `slot` is not
    /// inserted again; the outcome carries [`AllocationDiagnostic::AlreadyPlaced`].
    pub fn allocate(&self, slot: &Slot, mut token: Token, now_ms: u128) -> AllocationOutcome {
        let priority = self.calculator.calculate(&token, now_ms);
        token.snapshot_priority = priority;
        let token_id = token.id();

        let mut state = slot.lock();

        if let Some(outcome) = Self::existing_placement(&state, &token_id) {
            tracing::warn!(
                slot = %slot.id(),
                token = %token_id,
                status = outcome.status.as_str(),
                "token already placed in slot; ignoring duplicate"
            );
            return outcome;
        }

        if state.has_free_capacity() {
            state.admit(token);
            tracing::info!(
                slot = %slot.id(),
                token = %token_id,
                priority,
                admitted = state.admitted_len(),
                waiting = state.waiting_len(),
                "token allocated"
            );
            return AllocationOutcome::new(AllocationStatus::Allocated, priority);
        }

        let Some(lowest_priority) = state.lowest_admitted().map(Token::snapshot_priority) else {
            // Only reachable with a zero ceiling.
            tracing::warn!(
                slot = %slot.id(),
                token = %token_id,
                effective_capacity = state.effective_capacity(),
                policy = ?self.zero_capacity,
                "slot at capacity with nothing admitted"
            );
            let status = match self.zero_capacity {
                ZeroCapacityAdmission::Admit => {
                    state.admit(token);
                    AllocationStatus::Allocated
                }
                ZeroCapacityAdmission::Waitlist => {
                    state.enqueue_waiting(token);
                    AllocationStatus::Waitlisted
                }
            };
            let mut outcome = AllocationOutcome::new(status, priority);
            outcome.diagnostic = Some(AllocationDiagnostic::EmptyAtCapacity);
            return outcome;
        };

        if priority > lowest_priority {
            let evicted = self.demote_lowest(&mut state, now_ms);
            state.admit(token);
            tracing::info!(
                slot = %slot.id(),
                token = %token_id,
                priority,
                evicted = ?evicted,
                admitted = state.admitted_len(),
                waiting = state.waiting_len(),
                "token reallocated over lower-priority admission"
            );
            let mut outcome = AllocationOutcome::new(AllocationStatus::Reallocated, priority);
            outcome.evicted_token_id = evicted;
            return outcome;
        }

        state.enqueue_waiting(token);
        tracing::debug!(
            slot = %slot.id(),
            token = %token_id,
            priority,
            lowest_admitted = lowest_priority,
            waiting = state.waiting_len(),
            "token waitlisted"
        );
        AllocationOutcome::new(AllocationStatus::Waitlisted, priority)
    }

    fn existing_placement(state: &SlotState, token_id: &TokenId) -> Option<AllocationOutcome> {
        let (status, token) = match state.admitted_token(token_id) {
            Some(token) => (AllocationStatus::Allocated, token),
            None => (AllocationStatus::Waitlisted, state.waiting_token(token_id)?),
        };
        let mut outcome = AllocationOutcome::new(status, token.snapshot_priority());
        outcome.diagnostic = Some(AllocationDiagnostic::AlreadyPlaced);
        Some(outcome)
    }

    /// Move the lowest admitted token to waiting, charging it a preemption.
    fn demote_lowest(&self, state: &mut SlotState, now_ms: u128) -> Option<TokenId> {
        let mut lowest = state.pop_lowest_admitted()?;
        lowest.preemption_count += 1;
        lowest.snapshot_priority = self.calculator.calculate(&lowest, now_ms);
        let id = lowest.id();
        state.enqueue_waiting(lowest);
        Some(id)
    }

    /// Cancel `token_id` in `slot`.
    ///
    /// Removing an admitted token promotes the highest waiting token into the
    /// freed place. Whether a token that is only waiting can be cancelled is
    /// governed by [`WaitlistCancellation`]. Returns whether a token was
    /// removed.
    pub fn cancel(&self, slot: &Slot, token_id: &TokenId, now_ms: u128) -> bool {
        let mut state = slot.lock();

        if state.remove_admitted(token_id).is_some() {
            tracing::info!(slot = %slot.id(), token = %token_id, "admitted token cancelled");
            if state.has_free_capacity() {
                if let Some(mut next) = state.pop_highest_waiting() {
                    next.snapshot_priority = self.calculator.calculate(&next, now_ms);
                    tracing::info!(
                        slot = %slot.id(),
                        token = %next.id(),
                        priority = next.snapshot_priority,
                        "waiting token promoted"
                    );
                    state.admit(next);
                }
            }
            return true;
        }

        match self.waitlist_cancellation {
            WaitlistCancellation::Remove => {
                let removed = state.remove_waiting(token_id).is_some();
                if removed {
                    tracing::info!(slot = %slot.id(), token = %token_id, "waiting token cancelled");
                }
                removed
            }
            WaitlistCancellation::Ignore => {
                if state.is_waiting(token_id) {
                    tracing::debug!(
                        slot = %slot.id(),
                        token = %token_id,
                        "cancellation ignored for waiting token"
                    );
                }
                false
            }
        }
    }

    /// Multiply `doctor`'s efficiency by `factor` and rescale every slot.
    ///
    /// Holds the doctor's write lock for the whole update, taking each slot's
    /// lock in turn.
    ///
    /// # Errors
    ///
    /// Returns [`AllocationError::InvalidEfficiency`] if `factor` or the
    /// resulting efficiency is not positive and finite; the doctor is left
    /// unchanged.
    pub fn apply_efficiency_delta(
        &self,
        doctor: &Doctor,
        factor: f64,
        now_ms: u128,
    ) -> Result<(), AllocationError> {
        if !(factor.is_finite() && factor > 0.0) {
            return Err(AllocationError::InvalidEfficiency(factor));
        }

        let mut doctor_state = doctor.write();
        let scaled = doctor_state.efficiency() * factor;
        if !(scaled.is_finite() && scaled > 0.0) {
            tracing::warn!(
                doctor = %doctor.id(),
                factor,
                efficiency = doctor_state.efficiency(),
                "efficiency update rejected"
            );
            return Err(AllocationError::InvalidEfficiency(scaled));
        }
        let efficiency = doctor_state.scale_efficiency(factor);
        tracing::info!(doctor = %doctor.id(), factor, efficiency, "efficiency updated");

        for slot in doctor_state.slots() {
            let capacity = scaled_capacity(slot.base_capacity(), efficiency);
            let mut state = slot.lock();
            state.set_effective_capacity(capacity);

            let excess = state.excess();
            if excess == 0 {
                continue;
            }
            match self.capacity_shrink {
                CapacityShrink::Lazy => {
                    tracing::warn!(
                        doctor = %doctor.id(),
                        slot = %slot.id(),
                        effective_capacity = capacity,
                        excess,
                        "slot above reduced capacity; blocking new admissions"
                    );
                }
                CapacityShrink::EvictExcess => {
                    for _ in 0..excess {
                        if let Some(evicted) = self.demote_lowest(&mut state, now_ms) {
                            tracing::info!(
                                doctor = %doctor.id(),
                                slot = %slot.id(),
                                token = %evicted,
                                "admission demoted after capacity reduction"
                            );
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
