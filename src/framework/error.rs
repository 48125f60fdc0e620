//! # Registry Errors
//!
//! Every failure of a lookup surfaces as a [`ClientError`]. Nothing is retried
//! and nothing is cached on failure, so the caller may simply ask again later.

use crate::tls::TlsError;
use thiserror::Error;

/// Errors returned by client creation and lookup.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No factory is registered for the protocol.
    #[error("Unsupported protocol: {0}")]
    UnsupportedProtocol(String),

    /// TLS resolution failed for a reason other than "no policy configured".
    #[error(transparent)]
    Tls(#[from] TlsError),

    /// The protocol factory itself failed.
    #[error(transparent)]
    Factory(#[from] FactoryError),
}

/// Opaque error raised by a [`ClientFactory`](crate::framework::ClientFactory).
///
/// The factory's own error is kept as the source so callers can downcast it.
#[derive(Debug, Error)]
#[error("{source}")]
pub struct FactoryError {
    source: Box<dyn std::error::Error + Send + Sync>,
}

impl FactoryError {
    pub fn new(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn downcast_ref<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.source.downcast_ref::<E>()
    }

    pub fn into_inner(self) -> Box<dyn std::error::Error + Send + Sync> {
        self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("connection refused")]
    struct Refused;

    #[test]
    fn test_factory_error_keeps_source() {
        let err = ClientError::from(FactoryError::new(Refused));
        assert_eq!(err.to_string(), "connection refused");

        let ClientError::Factory(inner) = err else {
            panic!("expected a factory error");
        };
        assert!(inner.downcast_ref::<Refused>().is_some());
    }

    #[test]
    fn test_display() {
        let err = ClientError::UnsupportedProtocol("grpc".to_string());
        assert_eq!(err.to_string(), "Unsupported protocol: grpc");

        let err = ClientError::from(TlsError::Load("vault sealed".to_string()));
        assert_eq!(err.to_string(), "Failed to load TLS material: vault sealed");
    }
}
