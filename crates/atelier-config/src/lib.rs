#![allow(clippy::must_use_candidate)]

pub mod cors;
mod env;
pub mod health;
mod loader;
pub mod server;
pub mod telemetry;
pub mod upstream;

use serde::Deserialize;

pub use cors::*;
pub use env::ExpandError;
pub use health::*;
pub use loader::{load_dotenv, load_dotenv_from, vars};
pub use server::*;
pub use telemetry::*;
pub use upstream::*;

/// Top-level relay configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Listener, limits, and HTTP middleware
    #[serde(default)]
    pub server: ServerConfig,
    /// Remote inference endpoint the relay forwards to
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// Log output settings
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}
