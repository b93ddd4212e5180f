//! Configuration module for environment variable parsing.
//!
//! Secrets are read here once at startup and handed to the relay per request,
//! so nothing below the web layer touches the process environment.

use std::env;
use std::fmt;

use tracing::warn;
use url::Url;

use crate::relay::Secrets;

/// Default request body limit (1 MiB).
const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// Shared secret Bitbucket uses to sign webhook bodies
    pub bitbucket_key: Option<String>,

    /// Discord webhook URL that receives the relayed messages
    pub discord_url: Option<String>,

    /// Largest request body accepted on the webhook endpoint
    pub max_body_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Config {
            port: parse_number("PORT", 8080),

            bitbucket_key: non_empty_var("BITBUCKET_KEY"),

            discord_url: non_empty_var("DISCORD_URL"),

            max_body_bytes: parse_number("MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES),
        }
    }

    /// Secrets for a single relay invocation.
    pub fn secrets(&self) -> Secrets {
        Secrets::new(self.bitbucket_key.clone(), self.discord_url.clone())
    }

    /// Host part of the Discord URL, safe to log (the path carries the webhook token).
    pub fn discord_host(&self) -> Option<String> {
        self.discord_url
            .as_deref()
            .and_then(|raw| Url::parse(raw).ok())
            .and_then(|url| url.host_str().map(str::to_string))
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("bitbucket_key", &self.bitbucket_key.as_ref().map(|_| "<redacted>"))
            .field("discord_url", &self.discord_url.as_ref().map(|_| "<redacted>"))
            .field("max_body_bytes", &self.max_body_bytes)
            .finish()
    }
}

/// Read an environment variable, treating empty or blank values as unset.
fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Parse a numeric environment variable, falling back to `default` when unset or invalid.
fn parse_number<T: std::str::FromStr + Copy + fmt::Display>(name: &str, default: T) -> T {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            warn!(
                env_var = name,
                value = %raw,
                default = %default,
                "Invalid number, using default"
            );
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_valid() {
        env::set_var("TEST_RELAY_PORT", "9090");
        let result: u16 = parse_number("TEST_RELAY_PORT", 8080);
        assert_eq!(result, 9090);
        env::remove_var("TEST_RELAY_PORT");
    }

    #[test]
    fn test_parse_number_invalid_uses_default() {
        env::set_var("TEST_RELAY_LIMIT", "lots");
        let result: usize = parse_number("TEST_RELAY_LIMIT", 42);
        assert_eq!(result, 42);
        env::remove_var("TEST_RELAY_LIMIT");
    }

    #[test]
    fn test_parse_number_default() {
        let result: u16 = parse_number("NONEXISTENT_RELAY_VAR", 8080);
        assert_eq!(result, 8080);
    }

    #[test]
    fn test_non_empty_var_blank_is_unset() {
        env::set_var("TEST_RELAY_BLANK", "   ");
        assert_eq!(non_empty_var("TEST_RELAY_BLANK"), None);
        env::remove_var("TEST_RELAY_BLANK");
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = Config {
            port: 8080,
            bitbucket_key: Some("super-secret".to_string()),
            discord_url: Some("https://discord.com/api/webhooks/1/token".to_string()),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        };

        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
        assert!(!rendered.contains("token"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_discord_host() {
        let config = Config {
            port: 8080,
            bitbucket_key: None,
            discord_url: Some("https://discord.com/api/webhooks/1/token".to_string()),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        };

        assert_eq!(config.discord_host().as_deref(), Some("discord.com"));
    }
}
