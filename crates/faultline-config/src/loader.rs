use std::path::Path;

use secrecy::ExposeSecret;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, a placeholder cannot be
    /// expanded, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::from_toml(&raw)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if placeholder expansion, parsing, or validation fails
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if the auth token is empty, a route path is not
    /// absolute, or telemetry settings are out of range
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_auth()?;
        self.validate_paths()?;
        self.validate_telemetry()?;
        Ok(())
    }

    fn validate_auth(&self) -> anyhow::Result<()> {
        if self.auth.token.expose_secret().is_empty() {
            anyhow::bail!("auth.token must not be empty");
        }

        if http_header_name_is_invalid(&self.auth.header_name) {
            anyhow::bail!("auth.header_name `{}` is not a valid header name", self.auth.header_name);
        }

        Ok(())
    }

    fn validate_paths(&self) -> anyhow::Result<()> {
        if self.server.health.enabled && !self.server.health.path.starts_with('/') {
            anyhow::bail!("server.health.path must start with '/'");
        }

        if self.ws.enabled && !self.ws.path.starts_with('/') {
            anyhow::bail!("ws.path must start with '/'");
        }

        // `/` is the user lookup route
        if self.server.health.enabled && self.server.health.path == "/" {
            anyhow::bail!("server.health.path must not be '/'");
        }

        if self.ws.enabled && self.ws.path == "/" {
            anyhow::bail!("ws.path must not be '/'");
        }

        if self.server.health.enabled && self.ws.enabled && self.server.health.path == self.ws.path {
            anyhow::bail!("server.health.path and ws.path must differ, both are '{}'", self.ws.path);
        }

        if self.ws.max_message_bytes == 0 {
            anyhow::bail!("ws.max_message_bytes must be greater than 0");
        }

        Ok(())
    }

    fn validate_telemetry(&self) -> anyhow::Result<()> {
        let Some(ref telemetry) = self.telemetry else {
            return Ok(());
        };

        if let Some(ref tracing) = telemetry.tracing
            && !(0.0..=1.0).contains(&tracing.sampling_rate)
        {
            anyhow::bail!("telemetry.tracing.sampling_rate must be between 0.0 and 1.0");
        }

        Ok(())
    }
}

/// Header names are non-empty tokens: visible ASCII without separators
fn http_header_name_is_invalid(name: &str) -> bool {
    name.is_empty()
        || !name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const MINIMAL: &str = r#"
[auth]
token = "TOKEN"
"#;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = Config::from_toml(MINIMAL).unwrap();

        assert_eq!(config.server.listen_address, None);
        assert!(config.server.health.enabled);
        assert_eq!(config.server.health.path, "/health");
        assert_eq!(config.auth.header_name, "token");
        assert_eq!(config.auth.token.expose_secret(), "TOKEN");
        assert!(config.ws.enabled);
        assert_eq!(config.ws.path, "/ws");
        assert_eq!(config.ws.max_message_bytes, 64 * 1024);
        assert!(config.telemetry.is_none());
    }

    #[test]
    fn full_config() {
        let raw = r#"
[server]
listen_address = "127.0.0.1:4000"

[server.health]
enabled = false

[auth]
header_name = "x-api-token"
token = "secret"

[ws]
path = "/socket"
max_message_bytes = 16

[telemetry]
service_name = "users"

[telemetry.exporter]
endpoint = "http://localhost:4317"
protocol = "http_proto"

[telemetry.tracing]
sampling_rate = 0.5
"#;
        let config = Config::from_toml(raw).unwrap();

        assert_eq!(config.server.listen_address.unwrap().port(), 4000);
        assert!(!config.server.health.enabled);
        assert_eq!(config.auth.header_name, "x-api-token");
        assert_eq!(config.ws.path, "/socket");
        assert_eq!(config.ws.max_message_bytes, 16);

        let telemetry = config.telemetry.unwrap();
        assert_eq!(telemetry.service_name, "users");
        let exporter = telemetry.tracing_exporter().unwrap();
        assert_eq!(exporter.endpoint.as_str(), "http://localhost:4317/");
        assert_eq!(exporter.protocol, crate::telemetry::exporters::ExportProtocol::HttpProto);
        assert!(telemetry.metrics_exporter().is_some());
    }

    #[test]
    fn token_from_environment() {
        temp_env::with_var("FAULTLINE_TOKEN", Some("from-env"), || {
            let config = Config::from_toml("[auth]\ntoken = \"{{ env.FAULTLINE_TOKEN }}\"\n").unwrap();
            assert_eq!(config.auth.token.expose_secret(), "from-env");
        });
    }

    #[test]
    fn empty_token_is_rejected() {
        let err = Config::from_toml("").unwrap_err();
        assert!(err.to_string().contains("auth.token"));
    }

    #[test]
    fn invalid_header_name_is_rejected() {
        let err = Config::from_toml("[auth]\ntoken = \"TOKEN\"\nheader_name = \"bad header\"\n").unwrap_err();
        assert!(err.to_string().contains("header_name"));
    }

    #[test]
    fn relative_paths_are_rejected() {
        let err = Config::from_toml("[auth]\ntoken = \"TOKEN\"\n[ws]\npath = \"ws\"\n").unwrap_err();
        assert!(err.to_string().contains("ws.path"));
    }

    #[test]
    fn health_path_on_root_is_rejected() {
        let err = Config::from_toml("[auth]\ntoken = \"TOKEN\"\n[server.health]\npath = \"/\"\n").unwrap_err();
        assert!(err.to_string().contains("server.health.path must not be '/'"));
    }

    #[test]
    fn ws_path_on_root_is_rejected() {
        let err = Config::from_toml("[auth]\ntoken = \"TOKEN\"\n[ws]\npath = \"/\"\n").unwrap_err();
        assert!(err.to_string().contains("ws.path must not be '/'"));
    }

    #[test]
    fn health_and_ws_on_same_path_are_rejected() {
        let err = Config::from_toml("[auth]\ntoken = \"TOKEN\"\n[ws]\npath = \"/health\"\n").unwrap_err();
        assert!(err.to_string().contains("must differ"));
    }

    #[test]
    fn shared_path_is_fine_when_one_side_is_disabled() {
        let raw = "[auth]\ntoken = \"TOKEN\"\n[server.health]\nenabled = false\n[ws]\npath = \"/health\"\n";
        let config = Config::from_toml(raw).unwrap();
        assert_eq!(config.ws.path, "/health");
    }

    #[test]
    fn sampling_rate_out_of_range() {
        let raw = "[auth]\ntoken = \"TOKEN\"\n[telemetry.tracing]\nsampling_rate = 2.0\n";
        let err = Config::from_toml(raw).unwrap_err();
        assert!(err.to_string().contains("sampling_rate"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = Config::from_toml("[auth]\ntoken = \"TOKEN\"\nretries = 3\n").unwrap_err();
        assert!(err.to_string().contains("failed to parse config"));
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.auth.token.expose_secret(), "TOKEN");
    }

    #[test]
    fn load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/faultline.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }
}
