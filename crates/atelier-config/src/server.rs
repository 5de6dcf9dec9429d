use std::net::SocketAddr;

use serde::Deserialize;

use crate::{cors::CorsConfig, health::HealthConfig};

/// Default request body ceiling (100 MiB), sized for two inline images
pub const DEFAULT_BODY_LIMIT: usize = 100 << 20;

/// Default listener port
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_listen_address")]
    pub listen_address: SocketAddr,
    /// Maximum accepted request body in bytes
    #[serde(default = "default_body_limit")]
    pub body_limit: usize,
    /// Report every local fault as a flat 500; `false` maps upstream failures to 502/504
    #[serde(default = "default_collapse_errors")]
    pub collapse_errors: bool,
    #[serde(default)]
    pub health: HealthConfig,
    #[serde(default)]
    pub cors: Option<CorsConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: default_listen_address(),
            body_limit: DEFAULT_BODY_LIMIT,
            collapse_errors: true,
            health: HealthConfig::default(),
            cors: None,
        }
    }
}

fn default_listen_address() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT))
}

const fn default_body_limit() -> usize {
    DEFAULT_BODY_LIMIT
}

const fn default_collapse_errors() -> bool {
    true
}
