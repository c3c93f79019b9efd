//! Infrastructure adapters backing the core abstractions.

pub mod registry;

pub use registry::InMemoryRegistry;
