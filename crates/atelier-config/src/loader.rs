use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};

use crate::{Config, CorsConfig, DEFAULT_BODY_LIMIT, DEFAULT_PORT, ServerConfig, UpstreamConfig};

/// Environment variables read in environment mode
pub mod vars {
    pub const UPSTREAM_URL: &str = "AZURE_TRYON_URL";
    pub const UPSTREAM_API_KEY: &str = "AZURE_TRYON_API_KEY";
    pub const DEPLOYMENT: &str = "AZURE_DEPLOYMENT_NAME";
    pub const PORT: &str = "PORT";
    pub const BODY_LIMIT: &str = "ATELIER_BODY_LIMIT";
    pub const UPSTREAM_TIMEOUT: &str = "ATELIER_UPSTREAM_TIMEOUT";
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// `{{ env.VAR }}` placeholders are expanded before parsing and the
    /// result is validated.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, a placeholder cannot be
    /// resolved, the TOML is malformed, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        let expanded = crate::env::expand_env(&raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Build configuration from process environment variables
    ///
    /// Browser clients are served cross-origin, so CORS is permissive in
    /// this mode.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable does not parse or validation fails
    pub fn from_env() -> anyhow::Result<Self> {
        let port = match non_empty_var(vars::PORT) {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| anyhow::anyhow!("invalid {}: '{raw}': {e}", vars::PORT))?,
            None => DEFAULT_PORT,
        };

        let body_limit = match non_empty_var(vars::BODY_LIMIT) {
            Some(raw) => raw
                .parse::<usize>()
                .map_err(|e| anyhow::anyhow!("invalid {}: '{raw}': {e}", vars::BODY_LIMIT))?,
            None => DEFAULT_BODY_LIMIT,
        };

        let config = Self {
            server: ServerConfig {
                listen_address: SocketAddr::from(([0, 0, 0, 0], port)),
                body_limit,
                cors: Some(CorsConfig::permissive()),
                ..ServerConfig::default()
            },
            upstream: UpstreamConfig {
                url: non_empty_var(vars::UPSTREAM_URL),
                api_key: non_empty_var(vars::UPSTREAM_API_KEY).map(SecretString::from),
                deployment: non_empty_var(vars::DEPLOYMENT),
                timeout: non_empty_var(vars::UPSTREAM_TIMEOUT),
                ..UpstreamConfig::default()
            },
            ..Self::default()
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate that the relay can serve requests with this configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream URL or credential is missing or
    /// malformed, the timeout does not parse, or server limits are invalid
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_upstream()?;
        self.validate_server()?;
        Ok(())
    }

    fn validate_upstream(&self) -> anyhow::Result<()> {
        let Some(raw_url) = self.upstream.url.as_deref().filter(|u| !u.trim().is_empty()) else {
            anyhow::bail!("upstream.url must be set (or {} in environment mode)", vars::UPSTREAM_URL);
        };

        let url = url::Url::parse(raw_url).map_err(|e| anyhow::anyhow!("invalid upstream.url '{raw_url}': {e}"))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("upstream.url must use http or https, got '{}'", url.scheme());
        }

        let has_key = self
            .upstream
            .api_key
            .as_ref()
            .is_some_and(|key| !key.expose_secret().is_empty());
        if !has_key {
            anyhow::bail!(
                "upstream.api_key must be set (or {} in environment mode)",
                vars::UPSTREAM_API_KEY
            );
        }

        if self.upstream.deployment_header.trim().is_empty() {
            anyhow::bail!("upstream.deployment_header must not be empty");
        }

        self.upstream.timeout_duration()?;

        Ok(())
    }

    fn validate_server(&self) -> anyhow::Result<()> {
        if self.server.body_limit == 0 {
            anyhow::bail!("server.body_limit must be greater than 0");
        }

        if self.server.health.enabled && !self.server.health.path.starts_with('/') {
            anyhow::bail!("server.health.path must start with '/'");
        }

        Ok(())
    }
}

/// Load `.env` from the working directory or one of its parents
///
/// Variables already set in the process environment win over file entries.
/// Returns the path of the loaded file, or `None` when there is none.
///
/// # Errors
///
/// Returns an error if a `.env` file exists but cannot be read or parsed
pub fn load_dotenv() -> anyhow::Result<Option<PathBuf>> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => anyhow::bail!("failed to load .env file: {e}"),
    }
}

/// Load a specific dotenv file, returning `false` if it does not exist
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed
pub fn load_dotenv_from(path: &Path) -> anyhow::Result<bool> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(e) if e.not_found() => Ok(false),
        Err(e) => anyhow::bail!("failed to load {}: {e}", path.display()),
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}
