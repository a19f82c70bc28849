//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use faultline_config::{AuthConfig, Config, HealthConfig, ServerConfig, WsConfig};
use secrecy::SecretString;

/// Token every builder config expects unless overridden
pub const TOKEN: &str = "TOKEN";

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with minimal defaults
    pub fn new() -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    health: HealthConfig::default(),
                },
                auth: AuthConfig {
                    token: SecretString::from(TOKEN),
                    ..AuthConfig::default()
                },
                ws: WsConfig::default(),
                telemetry: None,
            },
        }
    }

    /// Disable the health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Serve health on a different path
    pub fn with_health_path(mut self, path: &str) -> Self {
        self.config.server.health.path = path.to_owned();
        self
    }

    /// Expect the token in a different header
    pub fn with_auth_header(mut self, header_name: &str) -> Self {
        self.config.auth.header_name = header_name.to_owned();
        self
    }

    /// Cap the size of text frames on the WebSocket endpoint
    pub fn with_max_message_bytes(mut self, max_message_bytes: usize) -> Self {
        self.config.ws.max_message_bytes = max_message_bytes;
        self
    }

    /// Disable the WebSocket endpoint
    pub fn without_ws(mut self) -> Self {
        self.config.ws.enabled = false;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Config {
        self.config
    }
}
