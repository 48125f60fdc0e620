use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Per-protocol section of the service mesh configuration.
///
/// Every field defaults, so a protocol that is missing from the configuration
/// is represented by `ProtocolSpec::default()` rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProtocolSpec {
    /// Address the local server for this protocol listens on.
    pub listen_address: String,
    /// Address advertised to the registry, if different from `listen_address`.
    pub advertise_address: String,
    /// Number of workers serving this protocol.
    pub worker_number: u32,
    /// Name of the transport plugin backing the protocol.
    pub transport: String,
    /// Comma-separated fault-injection tokens, e.g. `"http_500,timeout"`.
    pub failure: String,
}

impl ProtocolSpec {
    /// The fault-injection tokens of this spec as a set.
    pub fn failure_set(&self) -> HashSet<String> {
        parse_failure_tokens(&self.failure)
    }
}

/// Splits a comma-separated token list into a set, dropping empty tokens.
///
/// Tokens are kept verbatim, so whitespace around a token is part of it.
///
/// ```
/// use client_registry::model::parse_failure_tokens;
///
/// assert!(parse_failure_tokens("").is_empty());
/// assert!(parse_failure_tokens(",").is_empty());
/// assert_eq!(parse_failure_tokens("a,,b").len(), 2);
/// ```
pub fn parse_failure_tokens(raw: &str) -> HashSet<String> {
    raw.split(',')
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .collect()
}
