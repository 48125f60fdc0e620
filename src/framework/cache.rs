//! # Client Cache
//!
//! Two-level concurrent map (protocol → service → client) with get-or-create
//! semantics on top of the [`ClientCreator`].
//!
//! ## Locking
//!
//! - One `RwLock` guards the protocol map; it is written only when a protocol
//!   is seen for the first time.
//! - One `RwLock` per protocol guards its service map; it is written only when
//!   a service is seen for the first time.
//! - Neither lock is held while a client is being built.
//!
//! ## Single-flight construction
//!
//! Each (protocol, service) key owns a slot backed by an async once-cell. The
//! first caller to find the slot empty builds the client; callers arriving
//! meanwhile wait on the same cell instead of building their own. A failed
//! build leaves the slot empty, so the error reaches only the caller that ran
//! it and the next caller tries again.
//!
//! Failed lookups leave nothing behind: protocols without a factory are
//! rejected before any map is touched, and an empty slot whose build failed is
//! removed once no other caller holds it.

use crate::framework::client::ProtocolClient;
use crate::framework::creator::ClientCreator;
use crate::framework::error::ClientError;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, error, info, instrument};

type Slot = Arc<OnceCell<Arc<dyn ProtocolClient>>>;
type ServiceMap = RwLock<HashMap<String, Slot>>;

/// Cache of built clients. Entries are never evicted.
pub struct ClientCache {
    creator: ClientCreator,
    protocols: RwLock<HashMap<String, Arc<ServiceMap>>>,
}

impl ClientCache {
    pub fn new(creator: ClientCreator) -> Self {
        Self {
            creator,
            protocols: RwLock::new(HashMap::new()),
        }
    }

    pub fn creator(&self) -> &ClientCreator {
        &self.creator
    }

    /// Returns the cached client for the key, building it on first use.
    #[instrument(level = "debug", skip(self))]
    pub async fn get_or_create(
        &self,
        protocol: &str,
        service: &str,
    ) -> Result<Arc<dyn ProtocolClient>, ClientError> {
        if let Some(client) = self.cached(protocol, service) {
            debug!("Cache hit");
            return Ok(client);
        }
        if !self.creator.factories().contains(protocol) {
            error!("No factory registered");
            return Err(ClientError::UnsupportedProtocol(protocol.to_string()));
        }

        let services = self.services(protocol);
        let slot = Self::slot(&services, service);
        let result = slot
            .get_or_try_init(|| async {
                info!("Creating client");
                self.creator.create(protocol, service).await
            })
            .await
            .cloned();
        if result.is_err() {
            Self::discard_empty(&services, service, &slot);
        }
        result
    }

    /// Returns the client for the key if one has been built, without building.
    pub fn cached(&self, protocol: &str, service: &str) -> Option<Arc<dyn ProtocolClient>> {
        let services = self.protocols.read().get(protocol).cloned()?;
        let slot = services.read().get(service).cloned()?;
        slot.get().cloned()
    }

    /// Number of clients built and stored.
    pub fn len(&self) -> usize {
        self.protocols
            .read()
            .values()
            .map(|services| {
                services
                    .read()
                    .values()
                    .filter(|slot| slot.initialized())
                    .count()
            })
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn services(&self, protocol: &str) -> Arc<ServiceMap> {
        if let Some(services) = self.protocols.read().get(protocol) {
            return services.clone();
        }
        info!("Creating client map");
        // Another caller may have inserted the map since the read; keep theirs.
        self.protocols
            .write()
            .entry(protocol.to_string())
            .or_default()
            .clone()
    }

    fn slot(services: &ServiceMap, service: &str) -> Slot {
        if let Some(slot) = services.read().get(service) {
            return slot.clone();
        }
        services
            .write()
            .entry(service.to_string())
            .or_default()
            .clone()
    }

    /// Drops `slot` from the map if it is still empty and unused elsewhere.
    fn discard_empty(services: &ServiceMap, service: &str, slot: &Slot) {
        let mut services = services.write();
        let unused = match services.get(service) {
            // One reference in the map, one held by the caller.
            Some(current) => Arc::ptr_eq(current, slot) && Arc::strong_count(slot) == 2,
            None => false,
        };
        if unused && !slot.initialized() {
            services.remove(service);
        }
    }

    /// Number of slots in the maps, built or not.
    #[cfg(test)]
    fn slot_count(&self) -> usize {
        self.protocols
            .read()
            .values()
            .map(|services| services.read().len())
            .sum()
    }
}
