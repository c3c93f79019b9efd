//! Core allocation model: tokens, priorities, slots, doctors and the engine.

pub mod audit;
pub mod doctor;
pub mod engine;
pub mod error;
pub mod priority;
pub mod queue;
pub mod registry;
pub mod slot;
pub mod token;

pub use audit::{AuditAction, AuditEvent, AuditSink, InMemoryAuditSink};
pub use doctor::{Doctor, DoctorState};
pub use engine::{AllocationDiagnostic, AllocationEngine, AllocationOutcome, AllocationStatus};
pub use error::{AllocationError, AppResult};
pub use priority::PriorityCalculator;
pub use queue::{HeapOrder, TokenHeap};
pub use registry::DoctorRegistry;
pub use slot::{scaled_capacity, Slot, SlotSnapshot, SlotState};
pub use token::{Token, TokenId, TokenSource};
