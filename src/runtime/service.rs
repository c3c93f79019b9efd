//! Orchestration: resolve the slot, build the token, run the engine, map the
//! outcome.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::core::{
    AllocationEngine, AllocationError, AllocationOutcome, AllocationStatus,
    AuditAction, AuditEvent, AuditSink, DoctorRegistry, SlotSnapshot, Token, TokenId, TokenSource,
};
use crate::runtime::api::{AllocationResponse, CancelResponse, Health, TokenRequest};
use crate::util::clock::{Clock, SystemClock};

/// Shared audit sink handle.
pub type SharedAuditSink = Arc<Mutex<dyn AuditSink>>;

/// Typed result of a successful allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationReceipt {
    /// Token created for the request.
    pub token_id: TokenId,
    /// Doctor the slot belongs to.
    pub doctor_id: String,
    /// Slot the token was placed in.
    pub slot_id: String,
    /// Engine decision.
    pub outcome: AllocationOutcome,
    /// Approximate 1-based waiting position when waitlisted.
    pub position_in_queue: Option<usize>,
}

/// Decision counters.
#[derive(Debug, Default)]
struct ServiceCounters {
    allocated: AtomicU64,
    waitlisted: AtomicU64,
    reallocated: AtomicU64,
    cancelled: AtomicU64,
    errors: AtomicU64,
}

/// Snapshot of service counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStats {
    /// Tokens admitted within capacity.
    pub allocated: u64,
    /// Tokens placed on a waiting list.
    pub waitlisted: u64,
    /// Tokens admitted by preemption.
    pub reallocated: u64,
    /// Successful cancellations.
    pub cancelled: u64,
    /// Requests rejected before reaching the engine.
    pub errors: u64,
}

impl ServiceStats {
    /// Total allocation requests that reached a decision or failed.
    #[must_use]
    pub const fn total_requests(&self) -> u64 {
        self.allocated + self.waitlisted + self.reallocated + self.errors
    }
}

/// Thin orchestration layer over an injected registry and clock.
pub struct AllocationService<R, C = SystemClock> {
    registry: Arc<R>,
    engine: AllocationEngine,
    clock: C,
    audit: Option<SharedAuditSink>,
    counters: ServiceCounters,
}

impl<R: DoctorRegistry> AllocationService<R, SystemClock> {
    /// Service using the wall clock.
    pub fn with_system_clock(registry: Arc<R>, engine: AllocationEngine) -> Self {
        Self::new(registry, engine, SystemClock)
    }
}

impl<R: DoctorRegistry, C: Clock> AllocationService<R, C> {
    /// Create a service from its collaborators.
    pub fn new(registry: Arc<R>, engine: AllocationEngine, clock: C) -> Self {
        Self {
            registry,
            engine,
            clock,
            audit: None,
            counters: ServiceCounters::default(),
        }
    }

    /// Attach an audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: SharedAuditSink) -> Self {
        self.audit = Some(audit);
        self
    }

    /// The injected registry.
    pub const fn registry(&self) -> &Arc<R> {
        &self.registry
    }

    /// The engine in use.
    pub const fn engine(&self) -> &AllocationEngine {
        &self.engine
    }

    /// Current time according to the injected clock.
    pub fn now_ms(&self) -> u128 {
        self.clock.now_ms()
    }

    /// Resolve, build a token and allocate it.
    ///
    /// Resolution happens before the token is built, so a failed lookup
    /// creates nothing and touches no slot.
    ///
    /// # Errors
    ///
    /// [`AllocationError::InvalidRequest`], [`AllocationError::DoctorNotFound`]
    /// or [`AllocationError::SlotNotFound`].
    pub fn try_create_token(
        &self,
        req: &TokenRequest,
    ) -> Result<AllocationReceipt, AllocationError> {
        if let Err(e) = req.validate() {
            self.counters.errors.fetch_add(1, Ordering::Relaxed);
            return Err(AllocationError::InvalidRequest(e));
        }
        let (_doctor, slot) = match self.registry.resolve_slot(&req.doctor_id, &req.slot_id) {
            Ok(resolved) => resolved,
            Err(e) => {
                self.counters.errors.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(
                    doctor = %req.doctor_id,
                    slot = %req.slot_id,
                    patient = %req.patient_id,
                    error = %e,
                    "allocation rejected"
                );
                return Err(e);
            }
        };

        let now = self.clock.now_ms();
        let token = Token::new(req.patient_id.clone(), req.source, now);
        let token_id = token.id();
        let outcome = self.engine.allocate(&slot, token, now);

        let position_in_queue = if outcome.status == AllocationStatus::Waitlisted {
            // Taken after the decision; later callers may already have moved it.
            slot.lock().waiting_position(&token_id)
        } else {
            None
        };

        let counter = match outcome.status {
            AllocationStatus::Allocated => &self.counters.allocated,
            AllocationStatus::Waitlisted => &self.counters.waitlisted,
            AllocationStatus::Reallocated => &self.counters.reallocated,
        };
        counter.fetch_add(1, Ordering::Relaxed);

        let action = match outcome.status {
            AllocationStatus::Allocated => AuditAction::Allocate,
            AllocationStatus::Waitlisted => AuditAction::Waitlist,
            AllocationStatus::Reallocated => AuditAction::Reallocate,
        };
        let mut event = AuditEvent::new(token_id, &req.doctor_id, &req.slot_id, action, now)
            .with_source(req.source)
            .with_priority(outcome.priority);
        if let Some(evicted) = outcome.evicted_token_id {
            event = event.with_related(evicted);
        }
        self.record_audit(event);
        if let Some(evicted) = outcome.evicted_token_id {
            self.record_audit(
                AuditEvent::new(evicted, &req.doctor_id, &req.slot_id, AuditAction::Evict, now)
                    .with_related(token_id),
            );
        }

        Ok(AllocationReceipt {
            token_id,
            doctor_id: req.doctor_id.clone(),
            slot_id: req.slot_id.clone(),
            outcome,
            position_in_queue,
        })
    }

    /// Allocate and map the result to a response; failures become `ERROR`.
    pub fn create_token(
        &self,
        doctor_id: &str,
        slot_id: &str,
        patient_id: &str,
        source: TokenSource,
    ) -> AllocationResponse {
        let req = TokenRequest::new(doctor_id, slot_id, patient_id, source);
        match self.try_create_token(&req) {
            Ok(receipt) => AllocationResponse::from_receipt(&receipt),
            Err(e) => AllocationResponse::from_error(&e),
        }
    }

    /// Shorthand for an `EMERGENCY` token.
    pub fn create_emergency_token(
        &self,
        doctor_id: &str,
        slot_id: &str,
        patient_id: &str,
    ) -> AllocationResponse {
        self.create_token(doctor_id, slot_id, patient_id, TokenSource::Emergency)
    }

    /// Cancel a token in a slot.
    ///
    /// # Errors
    ///
    /// [`AllocationError::DoctorNotFound`] or [`AllocationError::SlotNotFound`].
    pub fn cancel_token(
        &self,
        doctor_id: &str,
        slot_id: &str,
        token_id: &TokenId,
    ) -> Result<bool, AllocationError> {
        let (_doctor, slot) = self
            .registry
            .resolve_slot(doctor_id, slot_id)
            .inspect_err(|e| {
                tracing::warn!(
                    doctor = %doctor_id,
                    slot = %slot_id,
                    token = %token_id,
                    error = %e,
                    "cancellation rejected"
                );
            })?;
        let now = self.clock.now_ms();
        let cancelled = self.engine.cancel(&slot, token_id, now);
        if cancelled {
            self.counters.cancelled.fetch_add(1, Ordering::Relaxed);
            self.record_audit(AuditEvent::new(
                *token_id,
                doctor_id,
                slot_id,
                AuditAction::Cancel,
                now,
            ));
        }
        Ok(cancelled)
    }

    /// Cancel and map to a response; unresolved doctor/slot reads as "not
    /// found".
    pub fn cancel_response(
        &self,
        doctor_id: &str,
        slot_id: &str,
        token_id: &TokenId,
    ) -> CancelResponse {
        CancelResponse::new(
            self.cancel_token(doctor_id, slot_id, token_id)
                .unwrap_or(false),
        )
    }

    /// Scale a doctor's efficiency (e.g. a running delay) by `factor`.
    ///
    /// # Errors
    ///
    /// [`AllocationError::DoctorNotFound`] or
    /// [`AllocationError::InvalidEfficiency`].
    pub fn apply_delay(&self, doctor_id: &str, factor: f64) -> Result<(), AllocationError> {
        let doctor = self.registry.resolve_doctor(doctor_id)?;
        self.engine
            .apply_efficiency_delta(&doctor, factor, self.clock.now_ms())
    }

    /// Consistent view of one slot.
    ///
    /// # Errors
    ///
    /// [`AllocationError::DoctorNotFound`] or [`AllocationError::SlotNotFound`].
    pub fn slot_snapshot(
        &self,
        doctor_id: &str,
        slot_id: &str,
    ) -> Result<SlotSnapshot, AllocationError> {
        let (_doctor, slot) = self.registry.resolve_slot(doctor_id, slot_id)?;
        Ok(slot.snapshot())
    }

    /// Effective priority of `token` now.
    pub fn compute_priority(&self, token: &Token) -> i64 {
        self.engine.compute_priority(token, self.clock.now_ms())
    }

    /// Counter snapshot.
    pub fn stats(&self) -> ServiceStats {
        ServiceStats {
            allocated: self.counters.allocated.load(Ordering::Relaxed),
            waitlisted: self.counters.waitlisted.load(Ordering::Relaxed),
            reallocated: self.counters.reallocated.load(Ordering::Relaxed),
            cancelled: self.counters.cancelled.load(Ordering::Relaxed),
            errors: self.counters.errors.load(Ordering::Relaxed),
        }
    }

    /// Health payload.
    pub fn health(&self) -> Health {
        Health {
            ok: true,
            doctors: self.registry.doctor_ids().len(),
        }
    }

    fn record_audit(&self, event: AuditEvent) {
        if let Some(sink) = &self.audit {
            sink.lock().record(event);
        }
    }
}
