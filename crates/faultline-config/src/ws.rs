use serde::Deserialize;

/// WebSocket endpoint configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WsConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_path")]
    pub path: String,
    /// Longest text frame, in bytes, the echo session accepts
    #[serde(default = "default_max_message_bytes")]
    pub max_message_bytes: usize,
}

impl Default for WsConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            path: default_path(),
            max_message_bytes: default_max_message_bytes(),
        }
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_enabled() -> bool {
    true
}

fn default_path() -> String {
    "/ws".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_max_message_bytes() -> usize {
    64 * 1024
}
