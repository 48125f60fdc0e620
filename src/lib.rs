//! # Client Registry
//!
//! > **Lazily built, shared network clients per (protocol, service).**
//!
//! Callers ask the registry for a client by protocol and service name. The first
//! request builds one through the protocol's factory, with TLS and fault-injection
//! settings resolved from configuration; every later request gets the same
//! instance back.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### An object, not a global
//! The registry is a [`ClientRegistry`](lifecycle::ClientRegistry) value built once at
//! startup and handed to whoever needs clients. Tests build their own and throw it away.
//!
//! ### One construction per key
//! Concurrent first lookups for the same (protocol, service) share a single
//! construction instead of racing to build duplicates. See [`framework::cache`].
//!
//! ### "No TLS" is an answer, not an error
//! TLS resolution returns a tagged [`TlsResolution`](tls::TlsResolution); only
//! real failures use the `Err` path.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! - **Role**: Factory dispatch, option assembly, client construction and caching.
//! - **Key items**: [`ClientFactory`](framework::ClientFactory),
//!   [`ClientCreator`](framework::ClientCreator), [`ClientCache`](framework::ClientCache).
//!
//! ### 2. The Orchestrator ([`lifecycle`])
//! - **Role**: The dependency injection container that wires collaborators together.
//! - **Key items**: [`ClientRegistry`](lifecycle::ClientRegistry),
//!   [`setup_tracing`](lifecycle::setup_tracing).
//!
//! ### 3. The Collaborators ([`config`], [`tls`])
//! - **Role**: Protocol specs and TLS policies, behind the
//!   [`ConfigProvider`](config::ConfigProvider) and [`TlsResolver`](tls::TlsResolver) traits.
//!
//! ### 4. The Data ([`model`])
//! - **Role**: Serde DTOs for the mesh configuration.
//!
//! ## 🚀 Quick Start
//!
//! ```rust
//! use client_registry::framework::{Options, ProtocolClient};
//! use client_registry::lifecycle::ClientRegistry;
//! use std::sync::Arc;
//!
//! #[derive(Debug)]
//! struct RestClient { pool_size: usize }
//! impl ProtocolClient for RestClient {}
//!
//! #[tokio::main]
//! async fn main() {
//!     let registry = ClientRegistry::builder()
//!         .register_fn("rest", |options: Options| Ok(RestClient { pool_size: options.pool_size }))
//!         .build();
//!
//!     let first = registry.get_client("rest", "orders").await.unwrap();
//!     let second = registry.get_client("rest", "orders").await.unwrap();
//!     assert!(Arc::ptr_eq(&first, &second));
//! }
//! ```
//!
//! ### Running the Demo
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```

pub mod config;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod tls;
