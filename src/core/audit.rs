//! Audit trail of allocation decisions.
//!
//! Every decision the service takes on a slot becomes one [`AuditEvent`]. The
//! sink stamps a sequence number on arrival, so the trail of a slot can be
//! replayed in the order the decisions were made even when several events
//! share a millisecond.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{TokenId, TokenSource};

/// Kind of decision recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Token admitted within capacity.
    Allocate,
    /// Token placed on the waiting list.
    Waitlist,
    /// Token admitted by preempting another.
    Reallocate,
    /// Token moved from admitted to waiting by a preemption.
    Evict,
    /// Token cancelled by its requester.
    Cancel,
}

impl AuditAction {
    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Allocate => "allocate",
            Self::Waitlist => "waitlist",
            Self::Reallocate => "reallocate",
            Self::Evict => "evict",
            Self::Cancel => "cancel",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Arrival order assigned by the sink; 0 until recorded.
    pub seq: u64,
    /// Token the decision applies to.
    pub token_id: TokenId,
    /// Owning doctor.
    pub doctor_id: String,
    /// Slot the token sits in.
    pub slot_id: String,
    /// Decision taken.
    pub action: AuditAction,
    /// Decision time, ms since epoch, from the service clock.
    pub at_ms: u128,
    /// Source category of the token, when known.
    pub source: Option<TokenSource>,
    /// Snapshot priority the decision was taken at.
    pub priority: Option<i64>,
    /// Counterpart of a preemption: the evicted token on `Reallocate`, the
    /// preempting token on `Evict`.
    pub related_token_id: Option<TokenId>,
}

impl AuditEvent {
    /// Event for `action` on `token_id` in `doctor_id`/`slot_id` at `at_ms`.
    pub fn new(
        token_id: TokenId,
        doctor_id: impl Into<String>,
        slot_id: impl Into<String>,
        action: AuditAction,
        at_ms: u128,
    ) -> Self {
        Self {
            seq: 0,
            token_id,
            doctor_id: doctor_id.into(),
            slot_id: slot_id.into(),
            action,
            at_ms,
            source: None,
            priority: None,
            related_token_id: None,
        }
    }

    /// Attach the token's source.
    #[must_use]
    pub const fn with_source(mut self, source: TokenSource) -> Self {
        self.source = Some(source);
        self
    }

    /// Attach the decision priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Attach the other token of a preemption.
    #[must_use]
    pub const fn with_related(mut self, token_id: TokenId) -> Self {
        self.related_token_id = Some(token_id);
        self
    }
}

/// Destination for audit events.
pub trait AuditSink: Send {
    /// Record an event.
    fn record(&mut self, event: AuditEvent);
}

/// Ring buffer keeping the most recent events.
#[derive(Debug)]
pub struct InMemoryAuditSink {
    events: VecDeque<AuditEvent>,
    max_events: usize,
    next_seq: u64,
}

impl InMemoryAuditSink {
    /// Sink retaining at most `max_events`; 0 disables recording.
    #[must_use]
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_events.min(1024)),
            max_events,
            next_seq: 1,
        }
    }

    /// Retained events, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.iter().cloned().collect()
    }

    /// Retained events about one token, oldest first.
    #[must_use]
    pub fn events_for(&self, token_id: &TokenId) -> Vec<AuditEvent> {
        self.events
            .iter()
            .filter(|e| e.token_id == *token_id)
            .cloned()
            .collect()
    }

    /// Number of retained events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True when nothing is retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&mut self, mut event: AuditEvent) {
        if self.max_events == 0 {
            return;
        }
        event.seq = self.next_seq;
        self.next_seq += 1;
        if self.events.len() >= self.max_events {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}
