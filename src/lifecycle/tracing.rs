//! # Observability & Tracing
//!
//! [`setup_tracing`] initializes structured logging with the `tracing` crate.
//! Lookups run inside `get_client` / `create_client` spans carrying the
//! protocol and service, so every event below them is attributed to its key.
//!
//! ## What Gets Traced
//!
//! - **Registry startup**: registered protocols
//! - **Cache**: new protocol maps, client construction, cache hits (`debug`)
//! - **TLS**: peer verification and cipher plugin when a policy applies (`warn`)
//! - **Errors**: lookups for protocols without a factory (`error`)
//!
//! ## Usage Examples
//!
//! ```bash
//! # Construction events only
//! RUST_LOG=info cargo run
//!
//! # Include cache hits and config loading
//! RUST_LOG=debug cargo run
//!
//! # Filter to the cache
//! RUST_LOG=client_registry::framework::cache=debug cargo run
//! ```
//!
//! **With `RUST_LOG=info`** (compact, first lookup of `rest`/`orders` in the demo):
//!
//! ```text
//! INFO Client registry ready protocols=["highway", "rest"]
//! INFO get_client: Creating client map protocol="rest" service="orders"
//! INFO get_client: Creating client protocol="rest" service="orders"
//! WARN get_client: TLS mode verify_peer=true cipher_plugin=default protocol="rest" service="orders"
//! INFO get_client: Dialing loopback protocol="rest" pool_size=50 tls=true protocol="rest" service="orders"
//! INFO get_client: Client created kind="LoopbackClient" protocol="rest" service="orders"
//! ```
//!
//! Compact output appends the fields of the enclosing spans after the event's
//! own fields. The `get_or_create` and `create` spans are `debug` level and
//! only show up with `RUST_LOG=debug`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
