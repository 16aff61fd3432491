use std::{
    net::{IpAddr, SocketAddr},
    path::PathBuf,
    time::Duration,
};

use clap::Parser;

use crate::catalog::DEFAULT_BASE_URL;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "rawg-gateway",
    version,
    about = "JSON-RPC tool server for the RAWG video games database"
)]
pub struct Args {
    #[arg(long, env = "RAWG_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    #[arg(long, env = "RAWG_PORT", default_value_t = 8003)]
    pub port: u16,

    #[arg(long, env = "RAWG_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "RAWG_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(long, env = "RAWG_UPSTREAM_TIMEOUT_MS", default_value_t = 10_000)]
    pub upstream_timeout_ms: u64,

    #[arg(
        long,
        env = "RAWG_TRANSCRIPT_PATH",
        default_value = "logs/rawg_mcp_log.json"
    )]
    pub transcript_path: PathBuf,

    #[arg(long, env = "RAWG_SERVER_VERSION", default_value = env!("CARGO_PKG_VERSION"))]
    pub server_version: String,

    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_filter: String,

    #[arg(long, env = "RAWG_JSON_LOGS", default_value_t = false)]
    pub json_logs: bool,
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub host: IpAddr,
    pub port: u16,
    pub api_key: String,
    pub base_url: String,
    pub upstream_timeout: Duration,
    pub transcript_path: PathBuf,
    pub server_version: String,
}

impl RuntimeConfig {
    pub fn from_args(args: Args) -> Result<Self, String> {
        let api_key = resolve_api_key(args.api_key)?;

        if args.port == 0 {
            return Err("port must be greater than 0".to_owned());
        }
        if args.upstream_timeout_ms == 0 {
            return Err("upstream_timeout_ms must be greater than 0".to_owned());
        }
        let base_url = args.base_url.trim().to_owned();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err("RAWG_BASE_URL must start with http:// or https://".to_owned());
        }

        Ok(Self {
            host: args.host,
            port: args.port,
            api_key,
            base_url,
            upstream_timeout: Duration::from_millis(args.upstream_timeout_ms),
            transcript_path: args.transcript_path,
            server_version: args.server_version,
        })
    }

    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    #[must_use]
    pub fn for_test(host: IpAddr, port: u16, base_url: String, transcript_path: PathBuf) -> Self {
        Self {
            host,
            port,
            api_key: "test-key".to_owned(),
            base_url,
            upstream_timeout: Duration::from_millis(2_000),
            transcript_path,
            server_version: "test".to_owned(),
        }
    }
}

fn resolve_api_key(input: Option<String>) -> Result<String, String> {
    input
        .and_then(|value| {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_owned())
            }
        })
        .ok_or_else(|| {
            "RAWG_API_KEY is not set; export it or add it to a .env file".to_owned()
        })
}
