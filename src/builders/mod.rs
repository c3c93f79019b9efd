//! Builders to construct registries and services from configuration.

pub mod registry_builder;

pub use registry_builder::{build_audit_sink, build_registry, build_service};
