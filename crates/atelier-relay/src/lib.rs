#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

pub mod encoding;
mod error;
mod forwarder;
mod operation;
mod payload;
mod server;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::post,
};

pub use error::{ErrorPolicy, RelayError, Result};
pub use forwarder::{Forwarder, UpstreamForwarder, UpstreamResponse, decode_body};
pub use operation::{ImageField, Operation};
pub use payload::RelayPayload;
pub use server::{Relay, RelayBuilder};

/// Build the relay from configuration
///
/// # Errors
///
/// Returns an error if the upstream HTTP client cannot be constructed
pub fn build_server(config: &atelier_config::Config) -> anyhow::Result<Arc<Relay>> {
    let relay = RelayBuilder::new(config)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to initialize relay: {e}"))?;

    Ok(Arc::new(relay))
}

/// Create the router serving every relay operation
pub fn endpoint_router() -> Router<Arc<Relay>> {
    Operation::ALL.into_iter().fold(Router::new(), |router, operation| {
        router.route(
            operation.path(),
            post(move |State(relay): State<Arc<Relay>>, RelayPayload(payload): RelayPayload| {
                handle(relay, operation, payload)
            }),
        )
    })
}

/// Relay one request, mirroring the upstream status and body
async fn handle(relay: Arc<Relay>, operation: Operation, payload: serde_json::Value) -> Response {
    match relay.relay(operation, payload).await {
        Ok(upstream) => (upstream.status, Json(upstream.body)).into_response(),
        Err(e) => {
            tracing::error!(operation = operation.name(), error = %e, "relay failed");
            e.into_response_with(relay.error_policy())
        }
    }
}
