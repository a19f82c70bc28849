use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Reference service for typed error handling
#[derive(Debug, Parser)]
#[command(name = "faultline", about = "HTTP and WebSocket service with typed error handlers")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "faultline.toml", env = "FAULTLINE_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "FAULTLINE_LISTEN")]
    pub listen: Option<SocketAddr>,
}
