#![allow(clippy::must_use_candidate)]

pub mod auth;
mod env;
pub mod health;
mod loader;
pub mod server;
pub mod telemetry;
pub mod ws;

use serde::Deserialize;

pub use auth::*;
pub use health::*;
pub use server::*;
pub use telemetry::TelemetryConfig;
pub use ws::*;

/// Top-level configuration of the reference service
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Listener and health endpoint
    #[serde(default)]
    pub server: ServerConfig,
    /// Token check guarding every route except health
    #[serde(default)]
    pub auth: AuthConfig,
    /// WebSocket endpoint limits
    #[serde(default)]
    pub ws: WsConfig,
    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}
