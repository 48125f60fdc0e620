//! Composition root and observability setup.
//!
//! # Main Components
//!
//! - [`ClientRegistry`] - The registry object built once at startup and passed to call sites
//! - [`ClientRegistryBuilder`] - Wires factories, configuration and TLS resolution
//! - [`setup_tracing`] - Initializes the tracing/logging infrastructure

pub mod registry;
pub mod tracing;

pub use registry::*;
pub use self::tracing::setup_tracing;
