//! # TLS Resolution
//!
//! Client creation asks a [`TlsResolver`] whether a TLS policy applies to the
//! target. The answer is a tagged [`TlsResolution`]: either a ready
//! [`TlsConfig`] or an explicit [`TlsResolution::NotConfigured`]. Only real
//! failures travel through the `Err` side as [`TlsError`], so "no policy" can
//! never be confused with "policy is broken".

use crate::config::MeshConfig;
use crate::model::{ssl_tag, Role, SslSpec};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors raised while turning an SSL policy into a [`TlsConfig`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TlsError {
    #[error("Unsupported TLS version: {0}")]
    UnsupportedVersion(String),

    #[error("SSL policy {tag} has a certificate but no private key")]
    MissingKey { tag: String },

    #[error("SSL policy {tag} has a private key but no certificate")]
    MissingCertificate { tag: String },

    /// Failure reported by a resolver backend (e.g. a secrets store).
    #[error("Failed to load TLS material: {0}")]
    Load(String),
}

/// Minimum TLS protocol version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TlsVersion {
    Tls10,
    Tls11,
    Tls12,
    Tls13,
}

impl TlsVersion {
    pub fn parse(raw: &str) -> Result<Self, TlsError> {
        match raw {
            "TLSv1.0" | "TLSv1" => Ok(TlsVersion::Tls10),
            "TLSv1.1" => Ok(TlsVersion::Tls11),
            "TLSv1.2" | "" => Ok(TlsVersion::Tls12),
            "TLSv1.3" => Ok(TlsVersion::Tls13),
            other => Err(TlsError::UnsupportedVersion(other.to_string())),
        }
    }
}

/// Resolved, validated TLS settings handed to a protocol factory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsConfig {
    pub verify_peer: bool,
    pub min_version: TlsVersion,
    pub ciphers: Vec<String>,
    pub ca_file: Option<String>,
    pub cert_file: Option<String>,
    pub key_file: Option<String>,
    pub key_password_file: Option<String>,
}

impl TlsConfig {
    /// Validates the policy stored under `tag` and converts it.
    pub fn from_spec(tag: &str, spec: &SslSpec) -> Result<Self, TlsError> {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());

        let cert_file = non_empty(&spec.cert_file);
        let key_file = non_empty(&spec.key_file);
        match (&cert_file, &key_file) {
            (Some(_), None) => return Err(TlsError::MissingKey { tag: tag.to_string() }),
            (None, Some(_)) => {
                return Err(TlsError::MissingCertificate { tag: tag.to_string() })
            }
            _ => {}
        }

        Ok(Self {
            verify_peer: spec.verify_peer,
            min_version: TlsVersion::parse(&spec.protocol)?,
            ciphers: spec.ciphers.clone(),
            ca_file: non_empty(&spec.ca_file),
            cert_file,
            key_password_file: key_file
                .as_ref()
                .and_then(|_| non_empty(&spec.cert_pwd_file)),
            key_file,
        })
    }
}

/// Outcome of a successful TLS lookup.
#[derive(Debug, Clone)]
pub enum TlsResolution {
    Configured {
        config: Arc<TlsConfig>,
        spec: SslSpec,
    },
    NotConfigured,
}

impl TlsResolution {
    pub fn config(&self) -> Option<Arc<TlsConfig>> {
        match self {
            TlsResolution::Configured { config, .. } => Some(config.clone()),
            TlsResolution::NotConfigured => None,
        }
    }
}

/// Decides whether and how TLS applies to a (service, protocol, role) target.
///
/// Resolution may perform I/O; callers inherit whatever blocking the
/// implementation does.
#[async_trait]
pub trait TlsResolver: Send + Sync {
    async fn resolve(
        &self,
        service: &str,
        protocol: &str,
        role: Role,
    ) -> Result<TlsResolution, TlsError>;
}

/// Resolver backed by a static table of SSL policies keyed by tag.
///
/// A service-specific policy (`"orders.rest.Consumer"`) wins over the
/// protocol-wide one (`"rest.Consumer"`).
#[derive(Debug, Clone, Default)]
pub struct SslPolicyResolver {
    policies: HashMap<String, SslSpec>,
}

impl SslPolicyResolver {
    pub fn new(policies: HashMap<String, SslSpec>) -> Self {
        Self { policies }
    }

    pub fn from_config(config: &MeshConfig) -> Self {
        Self::new(config.ssl.clone())
    }

    fn lookup(&self, service: &str, protocol: &str, role: Role) -> Option<(String, &SslSpec)> {
        [ssl_tag(service, protocol, role), ssl_tag("", protocol, role)]
            .into_iter()
            .find_map(|tag| self.policies.get(&tag).map(|spec| (tag, spec)))
    }
}

#[async_trait]
impl TlsResolver for SslPolicyResolver {
    async fn resolve(
        &self,
        service: &str,
        protocol: &str,
        role: Role,
    ) -> Result<TlsResolution, TlsError> {
        match self.lookup(service, protocol, role) {
            Some((tag, spec)) => {
                debug!(%tag, "SSL policy found");
                let config = TlsConfig::from_spec(&tag, spec)?;
                Ok(TlsResolution::Configured {
                    config: Arc::new(config),
                    spec: spec.clone(),
                })
            }
            None => Ok(TlsResolution::NotConfigured),
        }
    }
}

/// Resolver for deployments without any TLS.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTls;

#[async_trait]
impl TlsResolver for NoTls {
    async fn resolve(&self, _: &str, _: &str, _: Role) -> Result<TlsResolution, TlsError> {
        Ok(TlsResolution::NotConfigured)
    }
}
