use crate::config::{ConfigProvider, MeshConfig};
use crate::framework::{
    factory_fn, ClientCache, ClientCreator, ClientError, ClientFactory, FactoryError,
    FactoryRegistry, Options, ProtocolClient,
};
use crate::model::ProtocolSpec;
use crate::tls::{NoTls, SslPolicyResolver, TlsResolver};
use std::sync::Arc;
use tracing::{info, instrument};

/// The process-wide client registry, as an explicit object.
///
/// `ClientRegistry` is responsible for:
/// - **Lookup**: Handing out a cached client per (protocol, service)
/// - **Construction**: Building uncached clients on demand
/// - **Configuration passthrough**: Exposing protocol specs to callers
///
/// It is cheap to clone; clones share one cache. Dropping the last clone drops
/// every cached client, which is the only teardown there is.
///
/// # Example
///
/// ```ignore
/// let registry = ClientRegistry::builder()
///     .mesh_config(MeshConfig::from_path("mesh.json")?)
///     .register("rest", RestFactory::default())
///     .build();
///
/// let client = registry.get_client("rest", "orders").await?;
/// ```
#[derive(Clone)]
pub struct ClientRegistry {
    cache: Arc<ClientCache>,
}

impl ClientRegistry {
    pub fn builder() -> ClientRegistryBuilder {
        ClientRegistryBuilder::default()
    }

    /// Returns the cached client for (protocol, service), building it on first use.
    ///
    /// Concurrent first lookups of the same key share a single construction.
    /// A failed lookup caches nothing; the next call retries.
    #[instrument(skip(self))]
    pub async fn get_client(
        &self,
        protocol: &str,
        service: &str,
    ) -> Result<Arc<dyn ProtocolClient>, ClientError> {
        self.cache.get_or_create(protocol, service).await
    }

    /// Builds a fresh client, bypassing the cache.
    #[instrument(skip(self))]
    pub async fn create_client(
        &self,
        protocol: &str,
        service: &str,
    ) -> Result<Arc<dyn ProtocolClient>, ClientError> {
        self.cache.creator().create(protocol, service).await
    }

    /// Returns the configured spec for `protocol`, or the zero value.
    pub fn lookup_protocol_spec(&self, protocol: &str) -> ProtocolSpec {
        self.cache.creator().protocol_spec(protocol)
    }

    /// Protocols with a registered factory, sorted.
    pub fn protocols(&self) -> Vec<String> {
        self.cache.creator().factories().protocols()
    }

    /// Number of clients currently cached.
    pub fn cached_clients(&self) -> usize {
        self.cache.len()
    }
}

/// Startup wiring for a [`ClientRegistry`].
///
/// Without explicit collaborators the registry uses an empty [`MeshConfig`]
/// and no TLS.
#[derive(Default)]
pub struct ClientRegistryBuilder {
    factories: FactoryRegistry,
    config: Option<Arc<dyn ConfigProvider>>,
    tls: Option<Arc<dyn TlsResolver>>,
}

impl ClientRegistryBuilder {
    /// Registers the factory for `protocol`, replacing any earlier one.
    pub fn register(
        mut self,
        protocol: impl Into<String>,
        factory: impl ClientFactory + 'static,
    ) -> Self {
        self.factories.register(protocol, Arc::new(factory));
        self
    }

    /// Registers a closure as the factory for `protocol`.
    pub fn register_fn<F, C>(self, protocol: impl Into<String>, f: F) -> Self
    where
        F: Fn(Options) -> Result<C, FactoryError> + Send + Sync + 'static,
        C: ProtocolClient,
    {
        self.register(protocol, factory_fn(f))
    }

    pub fn config(mut self, config: impl ConfigProvider + 'static) -> Self {
        self.config = Some(Arc::new(config));
        self
    }

    pub fn tls_resolver(mut self, tls: impl TlsResolver + 'static) -> Self {
        self.tls = Some(Arc::new(tls));
        self
    }

    /// Uses `config` for protocol specs and its SSL table for TLS resolution.
    pub fn mesh_config(self, config: MeshConfig) -> Self {
        let tls = SslPolicyResolver::from_config(&config);
        self.config(config).tls_resolver(tls)
    }

    pub fn build(self) -> ClientRegistry {
        let config: Arc<dyn ConfigProvider> = match self.config {
            Some(config) => config,
            None => Arc::new(MeshConfig::default()),
        };
        let tls: Arc<dyn TlsResolver> = match self.tls {
            Some(tls) => tls,
            None => Arc::new(NoTls),
        };

        info!(protocols = ?self.factories.protocols(), "Client registry ready");
        let creator = ClientCreator::new(Arc::new(self.factories), config, tls);
        ClientRegistry {
            cache: Arc::new(ClientCache::new(creator)),
        }
    }
}
