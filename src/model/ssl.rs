use serde::{Deserialize, Serialize};
use std::fmt;

/// Side of a connection an SSL policy applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// The calling side. Client creation always resolves TLS as a consumer.
    Consumer,
    /// The serving side.
    Provider,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Consumer => "Consumer",
            Role::Provider => "Provider",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw SSL policy as written in the mesh configuration.
///
/// Certificate material is referenced by path only; reading the files belongs
/// to whatever transport consumes the resulting [`TlsConfig`](crate::tls::TlsConfig).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SslSpec {
    pub verify_peer: bool,
    pub cipher_plugin: String,
    /// Minimum protocol version, e.g. `"TLSv1.2"`.
    pub protocol: String,
    pub ciphers: Vec<String>,
    pub ca_file: String,
    pub cert_file: String,
    pub key_file: String,
    /// File holding the passphrase of `key_file`.
    pub cert_pwd_file: String,
}

impl Default for SslSpec {
    fn default() -> Self {
        Self {
            verify_peer: false,
            cipher_plugin: "default".to_string(),
            protocol: "TLSv1.2".to_string(),
            ciphers: Vec::new(),
            ca_file: String::new(),
            cert_file: String::new(),
            key_file: String::new(),
            cert_pwd_file: String::new(),
        }
    }
}

/// Builds the lookup tag of an SSL policy.
///
/// With a service name the tag is `"{service}.{protocol}.{role}"`; without one
/// it is the protocol-wide `"{protocol}.{role}"`.
pub fn ssl_tag(service: &str, protocol: &str, role: Role) -> String {
    if service.is_empty() {
        format!("{}.{}", protocol, role)
    } else {
        format!("{}.{}.{}", service, protocol, role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ssl_tag() {
        assert_eq!(ssl_tag("orders", "rest", Role::Consumer), "orders.rest.Consumer");
        assert_eq!(ssl_tag("", "rest", Role::Provider), "rest.Provider");
    }

    #[test]
    fn test_ssl_spec_defaults() {
        let spec: SslSpec = serde_json::from_str(r#"{ "verifyPeer": true }"#).unwrap();
        assert!(spec.verify_peer);
        assert_eq!(spec.cipher_plugin, "default");
        assert_eq!(spec.protocol, "TLSv1.2");
    }

    #[test]
    fn test_role_renders_as_tag_segment() {
        assert_eq!(Role::Consumer.to_string(), "Consumer");
        assert_eq!(Role::Provider.as_str(), "Provider");
    }
}
