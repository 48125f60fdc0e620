//! # Test Doubles
//!
//! In‑memory stand-ins for the registry's collaborators, for fast and
//! deterministic tests that never open a connection or read a certificate.
//!
//! | Double | Replaces | Typical use |
//! |--------|----------|-------------|
//! | [`CountingFactory`] | a protocol factory | count constructions, inject delays or failures |
//! | [`MockTlsResolver`] | a TLS resolver | script configured / not-configured / error answers |
//!
//! Both are cheap to clone and clones share state: hand one clone to the
//! registry and keep the other to make assertions.
//!
//! ```rust
//! use client_registry::framework::mock::{CountingFactory, MockTlsResolver};
//! use client_registry::lifecycle::ClientRegistry;
//!
//! #[tokio::main]
//! async fn main() {
//!     let factory = CountingFactory::new();
//!     let mut tls = MockTlsResolver::new();
//!     tls.expect_resolve().return_not_configured();
//!
//!     let registry = ClientRegistry::builder()
//!         .register("rest", factory.clone())
//!         .tls_resolver(tls.clone())
//!         .build();
//!
//!     registry.get_client("rest", "orders").await.unwrap();
//!     registry.get_client("rest", "orders").await.unwrap();
//!
//!     assert_eq!(factory.calls(), 1);
//!     tls.verify();
//! }
//! ```

use crate::framework::client::ProtocolClient;
use crate::framework::error::FactoryError;
use crate::framework::factory::ClientFactory;
use crate::framework::options::Options;
use crate::model::{Role, SslSpec};
use crate::tls::{TlsConfig, TlsError, TlsResolution, TlsResolver};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

// =============================================================================
// COUNTING FACTORY
// =============================================================================

/// Client produced by [`CountingFactory`].
#[derive(Debug)]
pub struct MockProtocolClient {
    /// 1-based construction number.
    pub serial: usize,
    pub options: Options,
}

impl ProtocolClient for MockProtocolClient {}

/// Error returned by a [`CountingFactory`] configured to fail.
#[derive(Debug, thiserror::Error)]
#[error("Injected factory failure on call {0}")]
pub struct InjectedFailure(pub usize);

#[derive(Default)]
struct FactoryState {
    calls: AtomicUsize,
    fail_first: usize,
    delay: Option<Duration>,
    last_options: Mutex<Option<Options>>,
}

/// Factory that counts its invocations.
#[derive(Clone, Default)]
pub struct CountingFactory {
    state: Arc<FactoryState>,
}

impl CountingFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleeps for `delay` inside every construction, widening race windows.
    pub fn with_delay(self, delay: Duration) -> Self {
        self.reconfigure(|state| state.delay = Some(delay))
    }

    /// Fails the first `n` constructions with [`InjectedFailure`].
    pub fn failing_first(self, n: usize) -> Self {
        self.reconfigure(|state| state.fail_first = n)
    }

    /// Number of constructions attempted so far, failed ones included.
    pub fn calls(&self) -> usize {
        self.state.calls.load(Ordering::SeqCst)
    }

    /// Options received by the most recent construction.
    pub fn last_options(&self) -> Option<Options> {
        self.state.last_options.lock().clone()
    }

    fn reconfigure(self, apply: impl FnOnce(&mut FactoryState)) -> Self {
        let mut state = FactoryState {
            calls: AtomicUsize::new(self.calls()),
            fail_first: self.state.fail_first,
            delay: self.state.delay,
            last_options: Mutex::new(self.last_options()),
        };
        apply(&mut state);
        Self {
            state: Arc::new(state),
        }
    }
}

#[async_trait]
impl ClientFactory for CountingFactory {
    async fn create(&self, options: Options) -> Result<Arc<dyn ProtocolClient>, FactoryError> {
        let serial = self.state.calls.fetch_add(1, Ordering::SeqCst) + 1;
        *self.state.last_options.lock() = Some(options.clone());

        if let Some(delay) = self.state.delay {
            tokio::time::sleep(delay).await;
        }
        if serial <= self.state.fail_first {
            return Err(FactoryError::new(InjectedFailure(serial)));
        }
        Ok(Arc::new(MockProtocolClient { serial, options }))
    }
}

// =============================================================================
// MOCK TLS RESOLVER
// =============================================================================

type ResolveResult = Result<TlsResolution, TlsError>;

#[derive(Default)]
struct ResolverState {
    expectations: VecDeque<ResolveResult>,
    requests: Vec<(String, String, Role)>,
}

/// TLS resolver answering from a queue of scripted results.
///
/// Each `resolve` call pops the next expectation. A call with no expectation
/// left panics, like an unexpected request would.
#[derive(Clone, Default)]
pub struct MockTlsResolver {
    state: Arc<Mutex<ResolverState>>,
}

impl MockTlsResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expects one `resolve` call.
    pub fn expect_resolve(&mut self) -> ResolveExpectationBuilder {
        ResolveExpectationBuilder {
            state: self.state.clone(),
        }
    }

    /// (service, protocol, role) of every `resolve` call received.
    pub fn requests(&self) -> Vec<(String, String, Role)> {
        self.state.lock().requests.clone()
    }

    /// Panics unless every expectation was consumed.
    pub fn verify(&self) {
        let remaining = self.state.lock().expectations.len();
        if remaining > 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
    }
}

#[async_trait]
impl TlsResolver for MockTlsResolver {
    async fn resolve(&self, service: &str, protocol: &str, role: Role) -> ResolveResult {
        let mut state = self.state.lock();
        state
            .requests
            .push((service.to_string(), protocol.to_string(), role));
        match state.expectations.pop_front() {
            Some(result) => result,
            None => panic!("Unexpected TLS resolution for {}.{}.{}", service, protocol, role),
        }
    }
}

/// Builder for `resolve` expectations.
pub struct ResolveExpectationBuilder {
    state: Arc<Mutex<ResolverState>>,
}

impl ResolveExpectationBuilder {
    /// Answers with the given policy. An invalid policy answers with its error.
    pub fn return_configured(self, spec: SslSpec) {
        let result = TlsConfig::from_spec("mock", &spec).map(|config| TlsResolution::Configured {
            config: Arc::new(config),
            spec,
        });
        self.push(result);
    }

    pub fn return_not_configured(self) {
        self.push(Ok(TlsResolution::NotConfigured));
    }

    pub fn return_err(self, error: TlsError) {
        self.push(Err(error));
    }

    fn push(self, result: ResolveResult) {
        self.state.lock().expectations.push_back(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_counting_factory() {
        let factory = CountingFactory::new().failing_first(1);
        let handle = factory.clone();

        assert!(factory.create(Options::default()).await.is_err());
        let client = factory
            .create(Options::builder().pool_size(3).build())
            .await
            .unwrap();

        assert_eq!(handle.calls(), 2);
        assert_eq!(handle.last_options().unwrap().pool_size, 3);
        assert!(format!("{:?}", client).contains("serial: 2"));
    }

    #[tokio::test]
    async fn test_mock_resolver_replays_in_order() {
        let mut tls = MockTlsResolver::new();
        tls.expect_resolve().return_not_configured();
        tls.expect_resolve()
            .return_err(TlsError::Load("boom".to_string()));

        let first = tls.resolve("a", "rest", Role::Consumer).await;
        let second = tls.resolve("b", "rest", Role::Provider).await;

        assert!(matches!(first, Ok(TlsResolution::NotConfigured)));
        assert!(matches!(second, Err(TlsError::Load(_))));
        assert_eq!(tls.requests().len(), 2);
        tls.verify();
    }

    #[test]
    #[should_panic(expected = "Not all expectations were met")]
    fn test_verify_reports_leftovers() {
        let mut tls = MockTlsResolver::new();
        tls.expect_resolve().return_not_configured();
        tls.verify();
    }
}
