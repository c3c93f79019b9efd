//! Tests for audit sink

use opd_token_engine::core::{AuditAction, AuditEvent, AuditSink, InMemoryAuditSink, TokenSource};
use uuid::Uuid;

#[test]
fn test_in_memory_audit_sink() {
    let mut sink = InMemoryAuditSink::new(10);
    let token = Uuid::new_v4();

    let event = AuditEvent::new(token, "D1", "9-10", AuditAction::Allocate, 42)
        .with_source(TokenSource::WalkIn)
        .with_priority(40);
    assert_eq!(event.seq, 0);

    sink.record(event);
    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].seq, 1);
    assert_eq!(events[0].token_id, token);
    assert_eq!(events[0].action, AuditAction::Allocate);
    assert_eq!(events[0].source, Some(TokenSource::WalkIn));
    assert_eq!(events[0].priority, Some(40));
    assert!(events[0].related_token_id.is_none());
}

#[test]
fn test_sequence_orders_events_sharing_a_millisecond() {
    let mut sink = InMemoryAuditSink::new(10);
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

    sink.record(AuditEvent::new(a, "D1", "9-10", AuditAction::Allocate, 7));
    sink.record(AuditEvent::new(b, "D1", "9-10", AuditAction::Reallocate, 7).with_related(a));
    sink.record(AuditEvent::new(a, "D1", "9-10", AuditAction::Evict, 7).with_related(b));

    let seqs: Vec<u64> = sink.events().iter().map(|e| e.seq).collect();
    assert_eq!(seqs, vec![1, 2, 3]);

    let for_a = sink.events_for(&a);
    assert_eq!(for_a.len(), 2);
    assert_eq!(for_a[0].action, AuditAction::Allocate);
    assert_eq!(for_a[1].action, AuditAction::Evict);
    assert_eq!(for_a[1].related_token_id, Some(b));
    assert!(sink.events_for(&Uuid::new_v4()).is_empty());
}

#[test]
fn test_audit_sink_overflow() {
    let mut sink = InMemoryAuditSink::new(2);
    let ids = [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];

    sink.record(AuditEvent::new(ids[0], "D1", "9-10", AuditAction::Allocate, 1));
    sink.record(AuditEvent::new(ids[1], "D1", "9-10", AuditAction::Waitlist, 2));
    sink.record(AuditEvent::new(ids[2], "D1", "9-10", AuditAction::Reallocate, 3));

    let events = sink.events();
    assert_eq!(sink.len(), 2);
    assert_eq!(events[0].token_id, ids[1]); // oldest dropped
    assert_eq!(events[1].token_id, ids[2]);
    // Sequence keeps counting past dropped events.
    assert_eq!(events[1].seq, 3);
}

#[test]
fn test_zero_capacity_sink_records_nothing() {
    let mut sink = InMemoryAuditSink::new(0);
    sink.record(AuditEvent::new(Uuid::new_v4(), "D1", "9-10", AuditAction::Cancel, 0));
    assert!(sink.is_empty());
}

#[test]
fn test_audit_event_serializes_typed_fields() {
    let token = Uuid::new_v4();
    let other = Uuid::new_v4();
    let event = AuditEvent::new(token, "D1", "9-10", AuditAction::Evict, 5).with_related(other);

    assert_eq!(AuditAction::Evict.to_string(), "evict");

    let json = serde_json::to_string(&event).unwrap();
    assert!(json.contains("\"slot_id\":\"9-10\""));
    assert!(json.contains("\"action\":\"evict\""));
    assert!(json.contains(&other.to_string()));

    let back: AuditEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(back, event);
}
