use secrecy::SecretString;
use serde::Deserialize;

/// Header-token authorization for the reference routes
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Request header that carries the token
    #[serde(default = "default_header_name")]
    pub header_name: String,
    /// Expected token value
    #[serde(default = "empty_token")]
    pub token: SecretString,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            header_name: default_header_name(),
            token: empty_token(),
        }
    }
}

fn default_header_name() -> String {
    "token".to_string()
}

fn empty_token() -> SecretString {
    SecretString::from(String::new())
}
