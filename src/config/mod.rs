//! # Mesh Configuration
//!
//! The registry reads per-protocol settings through the [`ConfigProvider`] trait.
//! [`MeshConfig`] is the stock provider: a serde document loaded from JSON that
//! also carries the SSL policy table consumed by
//! [`SslPolicyResolver`](crate::tls::SslPolicyResolver).
//!
//! ```json
//! {
//!   "protocols": { "rest": { "listenAddress": "0.0.0.0:8080", "failure": "http_500" } },
//!   "ssl": { "orders.rest.Consumer": { "verifyPeer": true, "caFile": "/etc/ca.pem" } }
//! }
//! ```

use crate::model::{ProtocolSpec, SslSpec};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Read-only source of protocol specs.
///
/// Implementations return `ProtocolSpec::default()` for protocols they know
/// nothing about; a missing section is not an error.
pub trait ConfigProvider: Send + Sync {
    fn protocol_spec(&self, protocol: &str) -> ProtocolSpec;
}

/// Errors raised while loading a [`MeshConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Service mesh configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    /// Protocol sections keyed by protocol identifier.
    pub protocols: HashMap<String, ProtocolSpec>,
    /// SSL policies keyed by tag (see [`ssl_tag`](crate::model::ssl_tag)).
    pub ssl: HashMap<String, SslSpec>,
}

impl MeshConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        debug!(
            protocols = config.protocols.len(),
            ssl_policies = config.ssl.len(),
            "Loaded mesh config"
        );
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Adds or replaces a protocol section.
    pub fn with_protocol(mut self, protocol: impl Into<String>, spec: ProtocolSpec) -> Self {
        self.protocols.insert(protocol.into(), spec);
        self
    }

    /// Adds or replaces an SSL policy under `tag`.
    pub fn with_ssl(mut self, tag: impl Into<String>, spec: SslSpec) -> Self {
        self.ssl.insert(tag.into(), spec);
        self
    }
}

impl ConfigProvider for MeshConfig {
    fn protocol_spec(&self, protocol: &str) -> ProtocolSpec {
        self.protocols.get(protocol).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "protocols": {
            "rest": { "listenAddress": "127.0.0.1:8080", "failure": "http_500,,timeout" },
            "highway": { "workerNumber": 4 }
        },
        "ssl": {
            "orders.rest.Consumer": { "verifyPeer": true, "cipherPlugin": "aes" }
        }
    }"#;

    #[test]
    fn test_load_from_json() {
        let config = MeshConfig::from_json_str(DOC).unwrap();
        assert_eq!(config.protocols.len(), 2);
        assert_eq!(config.ssl.len(), 1);

        let rest = config.protocol_spec("rest");
        assert_eq!(rest.listen_address, "127.0.0.1:8080");
        assert_eq!(rest.failure_set().len(), 2);
        assert_eq!(config.protocol_spec("highway").worker_number, 4);
    }

    #[test]
    fn test_unknown_protocol_yields_zero_value() {
        let config = MeshConfig::from_json_str(DOC).unwrap();
        assert_eq!(config.protocol_spec("grpc"), ProtocolSpec::default());
    }

    #[test]
    fn test_empty_document() {
        let config = MeshConfig::from_json_str("{}").unwrap();
        assert_eq!(config, MeshConfig::default());
    }

    #[test]
    fn test_invalid_document() {
        let result = MeshConfig::from_json_str("{ not json");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = MeshConfig::from_path("/definitely/not/here/mesh.json");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
