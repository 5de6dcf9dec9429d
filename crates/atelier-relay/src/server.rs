use std::sync::Arc;

use serde_json::Value;
use tracing::Instrument;

use crate::{
    error::{ErrorPolicy, RelayError},
    forwarder::{Forwarder, UpstreamForwarder, UpstreamResponse},
    operation::Operation,
};

/// Shared, immutable relay state: one forwarder and the error policy
pub struct Relay {
    forwarder: Arc<dyn Forwarder>,
    errors: ErrorPolicy,
}

impl Relay {
    pub fn new(forwarder: Arc<dyn Forwarder>, errors: ErrorPolicy) -> Self {
        Self { forwarder, errors }
    }

    pub const fn error_policy(&self) -> ErrorPolicy {
        self.errors
    }

    /// Sanitize the image fields of `payload` for `operation` and forward it
    pub async fn relay(&self, operation: Operation, mut payload: Value) -> Result<UpstreamResponse, RelayError> {
        let span = tracing::info_span!("relay", operation = operation.name());

        async move {
            for (field, preview) in operation.sanitize(&mut payload) {
                tracing::info!(field, len = preview.len, "sanitized image field");
                tracing::debug!(field, start = %preview.start, end = %preview.end, "image field preview");
            }

            let response = self.forwarder.forward(&payload).await?;

            tracing::info!(status = %response.status, "upstream responded");
            tracing::debug!(body = %response.body, "upstream response body");

            Ok(response)
        }
        .instrument(span)
        .await
    }
}

/// Builder for constructing the relay from configuration
pub struct RelayBuilder<'a> {
    config: &'a atelier_config::Config,
}

impl<'a> RelayBuilder<'a> {
    pub fn new(config: &'a atelier_config::Config) -> Self {
        Self { config }
    }

    pub fn build(self) -> anyhow::Result<Relay> {
        let forwarder = UpstreamForwarder::new(&self.config.upstream)?;

        if self.config.upstream.deployment_name().is_some() {
            tracing::debug!(
                header = %self.config.upstream.deployment_header,
                "upstream requests pinned to a deployment"
            );
        }

        Ok(Relay::new(
            Arc::new(forwarder),
            ErrorPolicy::from_collapse_flag(self.config.server.collapse_errors),
        ))
    }
}
