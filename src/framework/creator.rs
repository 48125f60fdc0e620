//! # Client Creator
//!
//! Builds one fresh client for a (protocol, service) pair, bypassing any cache.
//!
//! ## Steps
//!
//! 1. Look up the protocol's factory. A missing factory is fatal for the call.
//! 2. Resolve TLS for the service as a [`Role::Consumer`]. A
//!    [`TlsResolution::NotConfigured`] answer means "no TLS"; an `Err` aborts.
//! 3. Read the protocol spec and parse its fault-injection tokens.
//! 4. Assemble [`Options`] and invoke the factory. Factory errors are passed
//!    through as [`ClientError::Factory`].

use crate::config::ConfigProvider;
use crate::framework::client::ProtocolClient;
use crate::framework::error::ClientError;
use crate::framework::factory::FactoryRegistry;
use crate::framework::options::Options;
use crate::model::{ProtocolSpec, Role};
use crate::tls::{TlsResolution, TlsResolver};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Orchestrates factory dispatch, TLS resolution and option assembly.
#[derive(Clone)]
pub struct ClientCreator {
    factories: Arc<FactoryRegistry>,
    config: Arc<dyn ConfigProvider>,
    tls: Arc<dyn TlsResolver>,
}

impl ClientCreator {
    pub fn new(
        factories: Arc<FactoryRegistry>,
        config: Arc<dyn ConfigProvider>,
        tls: Arc<dyn TlsResolver>,
    ) -> Self {
        Self {
            factories,
            config,
            tls,
        }
    }

    pub fn factories(&self) -> &FactoryRegistry {
        &self.factories
    }

    /// Passthrough to the configuration provider.
    pub fn protocol_spec(&self, protocol: &str) -> ProtocolSpec {
        self.config.protocol_spec(protocol)
    }

    /// Builds a new client. Never consults or fills a cache.
    #[instrument(level = "debug", skip(self))]
    pub async fn create(
        &self,
        protocol: &str,
        service: &str,
    ) -> Result<Arc<dyn ProtocolClient>, ClientError> {
        let factory = self.factories.lookup(protocol).map_err(|e| {
            error!(error = %e, "No factory registered");
            e
        })?;

        let tls_config = match self.tls.resolve(service, protocol, Role::Consumer).await? {
            TlsResolution::Configured { config, spec } => {
                warn!(
                    verify_peer = spec.verify_peer,
                    cipher_plugin = %spec.cipher_plugin,
                    "TLS mode"
                );
                Some(config)
            }
            TlsResolution::NotConfigured => None,
        };

        let spec = self.config.protocol_spec(protocol);
        let options = Options::builder()
            .tls_config(tls_config)
            .failure(spec.failure_set())
            .build();

        let client = factory.create(options).await?;
        info!(kind = client.kind(), "Client created");
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MeshConfig;
    use crate::framework::mock::{CountingFactory, MockTlsResolver};
    use crate::model::SslSpec;
    use crate::tls::{NoTls, TlsError};

    fn creator(
        factory: &CountingFactory,
        config: MeshConfig,
        tls: Arc<dyn TlsResolver>,
    ) -> ClientCreator {
        let mut factories = FactoryRegistry::new();
        factories.register("rest", Arc::new(factory.clone()));
        ClientCreator::new(Arc::new(factories), Arc::new(config), tls)
    }

    #[tokio::test]
    async fn test_unsupported_protocol_skips_tls_and_factory() {
        let factory = CountingFactory::new();
        let tls = MockTlsResolver::new();
        let creator = creator(&factory, MeshConfig::default(), Arc::new(tls.clone()));

        let result = creator.create("grpc", "orders").await;
        assert!(matches!(result, Err(ClientError::UnsupportedProtocol(p)) if p == "grpc"));
        assert_eq!(factory.calls(), 0);
        assert!(tls.requests().is_empty());
    }

    #[tokio::test]
    async fn test_options_assembled_from_spec() {
        let factory = CountingFactory::new();
        let config = MeshConfig::default().with_protocol(
            "rest",
            ProtocolSpec {
                failure: "http_500,,timeout".to_string(),
                ..ProtocolSpec::default()
            },
        );
        let creator = creator(&factory, config, Arc::new(NoTls));

        creator.create("rest", "orders").await.unwrap();

        let options = factory.last_options().unwrap();
        assert_eq!(options.pool_size, 50);
        assert!(options.pool_ttl.is_none());
        assert!(options.tls_config.is_none());
        assert_eq!(options.failure.len(), 2);
        assert!(options.injects("http_500"));
        assert!(options.injects("timeout"));
    }

    #[tokio::test]
    async fn test_tls_resolved_as_consumer() {
        let factory = CountingFactory::new();
        let mut tls = MockTlsResolver::new();
        tls.expect_resolve().return_configured(SslSpec {
            verify_peer: true,
            cipher_plugin: "aes".to_string(),
            ..SslSpec::default()
        });
        let creator = creator(&factory, MeshConfig::default(), Arc::new(tls.clone()));

        creator.create("rest", "orders").await.unwrap();

        let options = factory.last_options().unwrap();
        assert!(options.tls_config.unwrap().verify_peer);
        assert_eq!(
            tls.requests(),
            vec![("orders".to_string(), "rest".to_string(), Role::Consumer)]
        );
        tls.verify();
    }

    #[tokio::test]
    async fn test_tls_not_configured_proceeds_without_tls() {
        let factory = CountingFactory::new();
        let mut tls = MockTlsResolver::new();
        tls.expect_resolve().return_not_configured();
        let creator = creator(&factory, MeshConfig::default(), Arc::new(tls.clone()));

        assert!(creator.create("rest", "orders").await.is_ok());
        assert!(factory.last_options().unwrap().tls_config.is_none());
        tls.verify();
    }

    #[tokio::test]
    async fn test_tls_error_aborts_creation() {
        let factory = CountingFactory::new();
        let mut tls = MockTlsResolver::new();
        tls.expect_resolve()
            .return_err(TlsError::Load("vault sealed".to_string()));
        let creator = creator(&factory, MeshConfig::default(), Arc::new(tls.clone()));

        let result = creator.create("rest", "orders").await;
        assert!(matches!(
            result,
            Err(ClientError::Tls(TlsError::Load(msg))) if msg == "vault sealed"
        ));
        assert_eq!(factory.calls(), 0);
    }

    #[tokio::test]
    async fn test_factory_error_passes_through() {
        let factory = CountingFactory::new().failing_first(1);
        let creator = creator(&factory, MeshConfig::default(), Arc::new(NoTls));

        let result = creator.create("rest", "orders").await;
        assert!(matches!(result, Err(ClientError::Factory(_))));
        assert_eq!(factory.calls(), 1);
    }

    #[tokio::test]
    async fn test_every_call_builds_a_new_client() {
        let factory = CountingFactory::new();
        let creator = creator(&factory, MeshConfig::default(), Arc::new(NoTls));

        let first = creator.create("rest", "orders").await.unwrap();
        let second = creator.create("rest", "orders").await.unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(factory.calls(), 2);
    }
}
