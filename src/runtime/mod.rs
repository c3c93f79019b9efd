//! Orchestration surface: request/response models and the allocation service.

pub mod api;
pub mod service;

pub use api::{AllocationResponse, CancelResponse, Health, ResponseStatus, TokenRequest};
pub use service::{AllocationReceipt, AllocationService, ServiceStats, SharedAuditSink};
