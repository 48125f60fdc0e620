//! # ProtocolClient Trait
//!
//! The registry never calls into a client; it only builds, stores and hands out
//! shared handles. Protocol crates define whatever operations their client
//! needs on their own types and implement this marker trait for them.

use std::fmt::Debug;

/// A ready-to-use client for one protocol, as produced by a factory.
///
/// Handles are shared as `Arc<dyn ProtocolClient>` and live as long as the
/// registry that cached them.
pub trait ProtocolClient: Debug + Send + Sync + 'static {
    /// Short label used in log lines, e.g. `"RestClient"`.
    fn kind(&self) -> &'static str {
        std::any::type_name::<Self>()
            .rsplit("::")
            .next()
            .unwrap_or("Unknown")
    }
}
