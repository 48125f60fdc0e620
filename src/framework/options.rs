//! # Client Options
//!
//! [`Options`] is the immutable bundle a factory receives when it builds a
//! client. The creator assembles it from the protocol spec and the TLS
//! resolution; tests and custom creators can use [`OptionsBuilder`] directly.

use crate::tls::TlsConfig;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

/// Pool size handed to factories unless overridden.
pub const DEFAULT_POOL_SIZE: usize = 50;

/// Configuration for constructing one protocol client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Connection pool size; always positive.
    pub pool_size: usize,
    /// Idle lifetime of pooled connections. Not populated by the creator.
    pub pool_ttl: Option<Duration>,
    /// TLS settings, or `None` when no SSL policy applies to the target.
    pub tls_config: Option<Arc<TlsConfig>>,
    /// Fault-injection tokens configured for the protocol.
    pub failure: HashSet<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            pool_size: DEFAULT_POOL_SIZE,
            pool_ttl: None,
            tls_config: None,
            failure: HashSet::new(),
        }
    }
}

impl Options {
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::default()
    }

    /// Whether the fault-injection token `token` is active.
    pub fn injects(&self, token: &str) -> bool {
        self.failure.contains(token)
    }
}

/// Fluent builder for [`Options`].
#[derive(Debug, Default)]
pub struct OptionsBuilder {
    options: Options,
}

impl OptionsBuilder {
    /// Sets the pool size. Zero is ignored and the default is kept.
    pub fn pool_size(mut self, pool_size: usize) -> Self {
        if pool_size > 0 {
            self.options.pool_size = pool_size;
        }
        self
    }

    pub fn pool_ttl(mut self, ttl: Duration) -> Self {
        self.options.pool_ttl = Some(ttl);
        self
    }

    pub fn tls_config(mut self, tls_config: Option<Arc<TlsConfig>>) -> Self {
        self.options.tls_config = tls_config;
        self
    }

    pub fn failure(mut self, failure: HashSet<String>) -> Self {
        self.options.failure = failure;
        self
    }

    pub fn build(self) -> Options {
        self.options
    }
}
