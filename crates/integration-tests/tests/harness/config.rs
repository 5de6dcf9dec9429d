//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use atelier_config::{Config, CorsConfig, HealthConfig, ServerConfig, UpstreamConfig};
use secrecy::SecretString;

/// Bearer key every test upstream expects
pub const TEST_API_KEY: &str = "test-key";

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with minimal defaults and no upstream
    pub fn new() -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: SocketAddr::from(([127, 0, 0, 1], 0)),
                    health: HealthConfig {
                        enabled: true,
                        ..HealthConfig::default()
                    },
                    ..ServerConfig::default()
                },
                upstream: UpstreamConfig::default(),
                ..Config::default()
            },
        }
    }

    /// Point the relay at a mock upstream with the test credential
    pub fn with_upstream(mut self, url: &str) -> Self {
        self.config.upstream.url = Some(url.to_owned());
        self.config.upstream.api_key = Some(SecretString::from(TEST_API_KEY));
        self
    }

    /// Point the relay at an upstream without supplying a credential
    pub fn with_upstream_url_only(mut self, url: &str) -> Self {
        self.config.upstream.url = Some(url.to_owned());
        self.config.upstream.api_key = None;
        self
    }

    /// Route upstream requests to a named deployment
    pub fn with_deployment(mut self, name: &str) -> Self {
        self.config.upstream.deployment = Some(name.to_owned());
        self
    }

    /// Set an upstream timeout (duration string)
    pub fn with_timeout(mut self, timeout: &str) -> Self {
        self.config.upstream.timeout = Some(timeout.to_owned());
        self
    }

    /// Report upstream connection failures as 502 and timeouts as 504
    pub fn with_distinguished_errors(mut self) -> Self {
        self.config.server.collapse_errors = false;
        self
    }

    /// Set the request body ceiling in bytes
    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.config.server.body_limit = limit;
        self
    }

    /// Set CORS configuration
    pub fn with_cors(mut self, config: CorsConfig) -> Self {
        self.config.server.cors = Some(config);
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
