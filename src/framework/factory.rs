//! # Factory Registry
//!
//! Maps a protocol identifier to the [`ClientFactory`] that builds its clients.
//! The registry is filled once at startup (see
//! [`ClientRegistryBuilder`](crate::lifecycle::ClientRegistryBuilder)) and only
//! read afterwards, so it needs no locking of its own.

use crate::framework::client::ProtocolClient;
use crate::framework::error::{ClientError, FactoryError};
use crate::framework::options::Options;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Builds a client for one protocol.
///
/// Factories may open connections and therefore block; the registry calls
/// them without a timeout.
#[async_trait]
pub trait ClientFactory: Send + Sync {
    async fn create(&self, options: Options) -> Result<Arc<dyn ProtocolClient>, FactoryError>;
}

/// Adapter turning a synchronous closure into a [`ClientFactory`].
///
/// Created with [`factory_fn`].
#[derive(Clone)]
pub struct FnFactory<F> {
    f: F,
}

/// Wraps `f` so it can be registered as a factory.
///
/// ```
/// use client_registry::framework::{factory_fn, Options, ProtocolClient};
///
/// #[derive(Debug)]
/// struct RestClient { pool_size: usize }
/// impl ProtocolClient for RestClient {}
///
/// let factory = factory_fn(|options: Options| Ok(RestClient { pool_size: options.pool_size }));
/// # let _ = factory;
/// ```
pub fn factory_fn<F, C>(f: F) -> FnFactory<F>
where
    F: Fn(Options) -> Result<C, FactoryError> + Send + Sync,
    C: ProtocolClient,
{
    FnFactory { f }
}

#[async_trait]
impl<F, C> ClientFactory for FnFactory<F>
where
    F: Fn(Options) -> Result<C, FactoryError> + Send + Sync,
    C: ProtocolClient,
{
    async fn create(&self, options: Options) -> Result<Arc<dyn ProtocolClient>, FactoryError> {
        let client = (self.f)(options)?;
        Ok(Arc::new(client))
    }
}

/// Protocol identifier → factory table.
#[derive(Clone, Default)]
pub struct FactoryRegistry {
    factories: HashMap<String, Arc<dyn ClientFactory>>,
}

impl FactoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `factory` for `protocol`, replacing any earlier one.
    pub fn register(&mut self, protocol: impl Into<String>, factory: Arc<dyn ClientFactory>) {
        self.factories.insert(protocol.into(), factory);
    }

    /// Returns the factory for `protocol`.
    pub fn lookup(&self, protocol: &str) -> Result<Arc<dyn ClientFactory>, ClientError> {
        self.factories
            .get(protocol)
            .cloned()
            .ok_or_else(|| ClientError::UnsupportedProtocol(protocol.to_string()))
    }

    pub fn contains(&self, protocol: &str) -> bool {
        self.factories.contains_key(protocol)
    }

    /// Registered protocol identifiers, sorted.
    pub fn protocols(&self) -> Vec<String> {
        let mut protocols: Vec<String> = self.factories.keys().cloned().collect();
        protocols.sort();
        protocols
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for FactoryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryRegistry")
            .field("protocols", &self.protocols())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct RestClient {
        pool_size: usize,
    }

    impl ProtocolClient for RestClient {}

    fn rest_factory() -> Arc<dyn ClientFactory> {
        Arc::new(factory_fn(|options: Options| {
            Ok(RestClient {
                pool_size: options.pool_size,
            })
        }))
    }

    #[test]
    fn test_lookup_unregistered_protocol() {
        let registry = FactoryRegistry::new();
        let result = registry.lookup("grpc");
        assert!(matches!(result, Err(ClientError::UnsupportedProtocol(p)) if p == "grpc"));
    }

    #[test]
    fn test_register_and_list() {
        let mut registry = FactoryRegistry::new();
        registry.register("rest", rest_factory());
        registry.register("highway", rest_factory());

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("rest"));
        assert!(registry.lookup("rest").is_ok());
        assert_eq!(registry.protocols(), vec!["highway", "rest"]);
    }

    #[tokio::test]
    async fn test_fn_factory_builds_client() {
        let factory = rest_factory();
        let client = factory
            .create(Options::builder().pool_size(7).build())
            .await
            .unwrap();
        assert_eq!(client.kind(), "RestClient");
        assert!(format!("{:?}", client).contains("pool_size: 7"));
    }

    #[tokio::test]
    async fn test_fn_factory_propagates_error() {
        let factory = factory_fn(|_: Options| -> Result<RestClient, FactoryError> {
            Err(FactoryError::new("dial tcp: connection refused"))
        });
        let result = factory.create(Options::default()).await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "dial tcp: connection refused"
        );
    }
}
