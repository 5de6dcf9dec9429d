use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Image relay for AI photoshoot and virtual try-on
#[derive(Debug, Parser)]
#[command(
    name = "atelier",
    about = "Relay garment and model images to a remote inference endpoint"
)]
pub struct Args {
    /// Path to a TOML configuration file; without it, settings come from the environment
    #[arg(short, long, env = "ATELIER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the listen address
    #[arg(long, env = "ATELIER_LISTEN")]
    pub listen: Option<SocketAddr>,

    /// Override the log filter (e.g. "debug" or "atelier_relay=debug")
    #[arg(long, env = "ATELIER_LOG")]
    pub log_filter: Option<String>,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn flags_parse() {
        let args = Args::try_parse_from(["atelier", "--config", "relay.toml", "--listen", "127.0.0.1:8080"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("relay.toml")));
        assert_eq!(args.listen, Some("127.0.0.1:8080".parse().unwrap()));
    }
}
