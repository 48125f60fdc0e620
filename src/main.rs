use client_registry::config::MeshConfig;
use client_registry::framework::{FactoryError, Options, ProtocolClient};
use client_registry::lifecycle::{setup_tracing, ClientRegistry};
use tracing::{error, info, Instrument};

const MESH_CONFIG: &str = r#"{
    "protocols": {
        "rest": { "listenAddress": "127.0.0.1:8080", "failure": "http_500" },
        "highway": { "listenAddress": "127.0.0.1:7070", "workerNumber": 4 }
    },
    "ssl": {
        "orders.rest.Consumer": { "verifyPeer": true, "caFile": "/etc/mesh/ca.pem" }
    }
}"#;

/// Stand-in transport that only remembers how it was configured.
#[derive(Debug)]
#[allow(dead_code)]
struct LoopbackClient {
    protocol: &'static str,
    options: Options,
}

impl ProtocolClient for LoopbackClient {}

fn loopback(protocol: &'static str) -> impl Fn(Options) -> Result<LoopbackClient, FactoryError> {
    move |options| {
        info!(
            protocol,
            pool_size = options.pool_size,
            tls = options.tls_config.is_some(),
            "Dialing loopback"
        );
        Ok(LoopbackClient { protocol, options })
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = MeshConfig::from_json_str(MESH_CONFIG).map_err(|e| e.to_string())?;
    let registry = ClientRegistry::builder()
        .mesh_config(config)
        .register_fn("rest", loopback("rest"))
        .register_fn("highway", loopback("highway"))
        .build();

    info!(spec = ?registry.lookup_protocol_spec("rest"), "Protocol spec");

    let span = tracing::info_span!("concurrent_lookups");
    async {
        let mut handles = vec![];
        for _ in 0..8 {
            let registry = registry.clone();
            handles.push(tokio::spawn(async move {
                registry.get_client("rest", "orders").await
            }));
        }
        for handle in handles {
            match handle.await {
                Ok(Ok(client)) => info!(?client, "Got client"),
                Ok(Err(e)) => error!(error = %e, "Lookup failed"),
                Err(e) => error!(error = %e, "Lookup task failed"),
            }
        }
    }
    .instrument(span)
    .await;

    let highway = registry
        .get_client("highway", "users")
        .await
        .map_err(|e| e.to_string())?;
    info!(?highway, "Got client");

    if let Err(e) = registry.get_client("grpc", "orders").await {
        error!(error = %e, "Expected failure");
    }

    info!(
        protocols = ?registry.protocols(),
        cached = registry.cached_clients(),
        "Done"
    );
    Ok(())
}
