use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};

/// Default per-operation timeout, in milliseconds.
const DEFAULT_TIMEOUT: &str = "5000";

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Concurrent HTTP load generator - parallel clients, per-connection throughput accounting, and a fixed-format results report."
)]
pub struct LoadArgs {
    /// Number of requests per client
    #[arg(long = "requests", short = 'r', conflicts_with = "duration")]
    pub requests: Option<u64>,

    /// Number of concurrent clients
    #[arg(long = "clients", short = 'c', default_value_t = 100)]
    pub clients: usize,

    /// Target URL
    #[arg(long = "url", short = 'u')]
    pub url: Option<String>,

    /// URL list file path (newline separated)
    #[arg(long = "urls-file", short = 'f')]
    pub urls_file: Option<PathBuf>,

    /// Send a keep-alive Connection header on every request
    #[arg(
        long = "keep-alive",
        short = 'k',
        default_value_t = true,
        action = ArgAction::Set
    )]
    pub keep_alive: bool,

    /// Reuse established connections between requests
    #[arg(
        long = "reuse-connections",
        short = 'q',
        default_value_t = true,
        action = ArgAction::Set
    )]
    pub reuse_connections: bool,

    /// HTTP POST data file path
    #[arg(long = "data-file", short = 'd')]
    pub data_file: Option<PathBuf>,

    /// Period of time (in seconds)
    #[arg(long = "duration", short = 't', conflicts_with = "requests")]
    pub duration: Option<u64>,

    /// Connect timeout (in milliseconds)
    #[arg(
        long = "connect-timeout",
        default_value = DEFAULT_TIMEOUT,
        value_parser = parse_timeout_ms
    )]
    pub connect_timeout: Duration,

    /// Write timeout (in milliseconds)
    #[arg(
        long = "write-timeout",
        default_value = DEFAULT_TIMEOUT,
        value_parser = parse_timeout_ms
    )]
    pub write_timeout: Duration,

    /// Read timeout (in milliseconds)
    #[arg(
        long = "read-timeout",
        default_value = DEFAULT_TIMEOUT,
        value_parser = parse_timeout_ms
    )]
    pub read_timeout: Duration,

    /// Enable verbose transport logging
    #[arg(long = "verbose", visible_alias = "log")]
    pub verbose: bool,
}

fn parse_timeout_ms(s: &str) -> Result<Duration, String> {
    let millis: u64 = s
        .trim()
        .parse()
        .map_err(|err| format!("Invalid timeout '{}': {}", s, err))?;
    if millis == 0 {
        return Err("Timeout must be > 0.".to_owned());
    }
    Ok(Duration::from_millis(millis))
}
