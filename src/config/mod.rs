//! Configuration models for the engine and the doctor registry.

pub mod engine;
pub mod registry;

pub use engine::{CapacityShrink, EngineConfig, WaitlistCancellation, ZeroCapacityAdmission};
pub use registry::{DoctorConfig, RegistryConfig, SlotConfig};
