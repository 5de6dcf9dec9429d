use async_trait::async_trait;
use atelier_config::UpstreamConfig;
use axum::http::{HeaderName, HeaderValue, StatusCode, header};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};

use crate::error::{RelayError, Result};

/// Status and decoded body returned by the inference endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Sends one relay payload upstream and hands back whatever came back
#[async_trait]
pub trait Forwarder: Send + Sync {
    /// Forward `payload` and return the upstream status and body
    ///
    /// Non-2xx statuses are returned as `Ok`; only local or network
    /// failures are errors.
    async fn forward(&self, payload: &Value) -> Result<UpstreamResponse>;
}

/// Forwarder for an HTTP scoring endpoint authenticated with a bearer key
pub struct UpstreamForwarder {
    client: Client,
    url: Option<String>,
    api_key: Option<SecretString>,
    deployment: Option<(HeaderName, HeaderValue)>,
}

impl UpstreamForwarder {
    /// Build a forwarder from upstream configuration
    ///
    /// A missing URL or key is not rejected here; each call to
    /// [`Forwarder::forward`] fails instead, before touching the network.
    pub fn new(config: &UpstreamConfig) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout_duration()? {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build upstream HTTP client: {e}"))?;

        let deployment = config
            .deployment_name()
            .map(|name| {
                let header_name = HeaderName::try_from(config.deployment_header.as_str())
                    .map_err(|e| anyhow::anyhow!("invalid deployment header '{}': {e}", config.deployment_header))?;
                let value = HeaderValue::from_str(name)
                    .map_err(|e| anyhow::anyhow!("invalid deployment name '{name}': {e}"))?;
                anyhow::Ok((header_name, value))
            })
            .transpose()?;

        Ok(Self {
            client,
            url: config.url.clone().filter(|url| !url.trim().is_empty()),
            api_key: config.api_key.clone().filter(|key| !key.expose_secret().is_empty()),
            deployment,
        })
    }
}

#[async_trait]
impl Forwarder for UpstreamForwarder {
    async fn forward(&self, payload: &Value) -> Result<UpstreamResponse> {
        let (Some(url), Some(api_key)) = (self.url.as_deref(), self.api_key.as_ref()) else {
            return Err(RelayError::Config("upstream URL or API key not set".to_owned()));
        };

        let body = serde_json::to_vec(payload)
            .map_err(|e| RelayError::Internal(format!("failed to serialize relay payload: {e}")))?;

        let mut request = self
            .client
            .post(url)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json")
            .bearer_auth(api_key.expose_secret())
            .body(body);

        if let Some((name, value)) = &self.deployment {
            request = request.header(name, value);
        }

        tracing::debug!(%url, "forwarding payload upstream");

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;

        Ok(UpstreamResponse {
            status,
            body: decode_body(&text),
        })
    }
}

fn transport_error(e: reqwest::Error) -> RelayError {
    if e.is_timeout() {
        RelayError::Timeout(e.to_string())
    } else {
        RelayError::Connection(e.to_string())
    }
}

/// Decode an upstream body that may be JSON, JSON-in-a-string, or not JSON at all
///
/// Some scoring runtimes serialize their output twice, so a top-level JSON
/// string is parsed once more; if that fails the string itself is kept.
/// Text that is not JSON is wrapped as `{"error": text}`.
pub fn decode_body(text: &str) -> Value {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::String(inner)) => serde_json::from_str(&inner).unwrap_or(Value::String(inner)),
        Ok(value) => value,
        Err(_) => json!({ "error": text }),
    }
}
