//! Client construction and caching engine.
//!
//! # Main Components
//!
//! - [`ProtocolClient`] - Marker trait for the clients the registry hands out
//! - [`FactoryRegistry`] / [`ClientFactory`] - Protocol → constructor dispatch
//! - [`Options`] - Per-construction configuration passed to a factory
//! - [`ClientCreator`] - Builds one fresh client (TLS + options + factory)
//! - [`ClientCache`] - Two-level get-or-create cache with single-flight builds
//! - [`ClientError`] - Errors surfaced to callers
//!
//! # Testing
//!
//! See [`mock`] for test doubles of factories and TLS resolution.

pub mod cache;
pub mod client;
pub mod creator;
pub mod error;
pub mod factory;
pub mod mock;
pub mod options;

pub use cache::ClientCache;
pub use client::ProtocolClient;
pub use creator::ClientCreator;
pub use error::{ClientError, FactoryError};
pub use factory::{factory_fn, ClientFactory, FactoryRegistry, FnFactory};
pub use options::{Options, OptionsBuilder, DEFAULT_POOL_SIZE};
