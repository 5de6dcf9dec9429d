use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;

/// Header used by managed inference endpoints to pin a named deployment
pub const DEFAULT_DEPLOYMENT_HEADER: &str = "azureml-deployment";

/// Remote inference endpoint settings
///
/// `url` and `api_key` are optional here so that a half-configured relay can
/// still be assembled in tests; [`crate::Config::validate`] rejects them at
/// startup.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpstreamConfig {
    /// Scoring URL that receives the forwarded JSON body
    #[serde(default)]
    pub url: Option<String>,
    /// Bearer credential sent in the `Authorization` header
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Deployment to route to; empty means let the endpoint decide
    #[serde(default)]
    pub deployment: Option<String>,
    #[serde(default = "default_deployment_header")]
    pub deployment_header: String,
    /// Request timeout as a duration string (e.g. "90s"); unset means none
    #[serde(default)]
    pub timeout: Option<String>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            deployment: None,
            deployment_header: default_deployment_header(),
            timeout: None,
        }
    }
}

impl UpstreamConfig {
    /// Deployment name, treating an empty string as absent
    pub fn deployment_name(&self) -> Option<&str> {
        self.deployment.as_deref().map(str::trim).filter(|name| !name.is_empty())
    }

    /// Parse the configured timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the timeout string is not a valid duration
    pub fn timeout_duration(&self) -> anyhow::Result<Option<Duration>> {
        self.timeout
            .as_deref()
            .map(|raw| {
                duration_str::parse(raw).map_err(|e| anyhow::anyhow!("invalid upstream timeout '{raw}': {e}"))
            })
            .transpose()
    }
}

fn default_deployment_header() -> String {
    DEFAULT_DEPLOYMENT_HEADER.to_owned()
}
