//! # OPD Token Engine
//!
//! A priority-aging admission engine for capacity-bounded appointment slots.
//!
//! Each doctor owns a set of time slots. A slot admits up to its *effective
//! capacity* (base capacity scaled by the doctor's efficiency) and parks every
//! other request on a waiting list. Requests arrive as tokens whose priority
//! comes from their source category, grows as they wait, and drops each time
//! they are bumped.
//!
//! ## Admission Rules
//!
//! - **Free capacity**: the token is admitted (`ALLOCATED`)
//! - **Full slot, new token strictly outranks the lowest admission**: the
//!   lowest admission is moved to the waiting list with a penalty and the new
//!   token takes its place (`REALLOCATED`)
//! - **Otherwise**: the token waits (`WAITLISTED`)
//! - **Cancellation** of an admitted token promotes the best waiting token
//!
//! Priorities are snapshotted when a token enters a heap, so queue ordering
//! never depends on the clock.
//!
//! ## Concurrency
//!
//! Every slot carries its own `parking_lot::Mutex`; a decision holds it from
//! the first size check to the last mutation. Different slots never contend.
//! The registry and each doctor's slot map sit behind `parking_lot::RwLock`s.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use opd_token_engine::core::{AllocationEngine, Doctor, DoctorRegistry, TokenSource};
//! use opd_token_engine::infra::InMemoryRegistry;
//! use opd_token_engine::runtime::{AllocationService, ResponseStatus};
//! use opd_token_engine::util::ManualClock;
//!
//! let registry = Arc::new(InMemoryRegistry::new());
//! let doctor = Doctor::new("D1", 1.0)?;
//! doctor.add_slot("9-10", 1)?;
//! registry.register(doctor)?;
//!
//! let service = AllocationService::new(
//!     Arc::clone(&registry),
//!     AllocationEngine::default(),
//!     ManualClock::new(0),
//! );
//!
//! let walk_in = service.create_token("D1", "9-10", "P001", TokenSource::WalkIn);
//! assert_eq!(walk_in.status, ResponseStatus::Allocated);
//!
//! let emergency = service.create_emergency_token("D1", "9-10", "P002");
//! assert_eq!(emergency.status, ResponseStatus::Reallocated);
//! assert_eq!(emergency.evicted_token_id, walk_in.token_id);
//! # Ok::<(), opd_token_engine::core::AllocationError>(())
//! ```
//!
//! For complete scenarios, see `tests/allocation_engine_test.rs`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core allocation model and engine.
pub mod core;
/// Configuration models for the engine and registry.
pub mod config;
/// Builders to construct registries and services from configuration.
pub mod builders;
/// Infrastructure adapters backing the core abstractions.
pub mod infra;
/// Orchestration layer and request/response models.
pub mod runtime;
/// Shared utilities.
pub mod util;
