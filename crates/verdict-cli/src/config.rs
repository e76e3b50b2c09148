//! Process configuration from the environment.
//!
//! A `.env` file in the working directory is loaded first. Command-line flags
//! override whatever is found here. Eligibility rules are not configurable.

use std::env;
use std::net::{IpAddr, SocketAddr};

use thiserror::Error;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid port {value:?}: expected an integer between 0 and 65535")]
    InvalidPort { value: String },

    #[error("invalid host {value:?}: {source}")]
    InvalidHost {
        value: String,
        source: std::net::AddrParseError,
    },
}

/// Top-level configuration for the binary.
#[derive(Debug, Clone, PartialEq)]
pub struct CliConfig {
    pub server: ServerConfig,
    pub log_level: String,
}

impl CliConfig {
    /// Load from `VERDICT_HOST`, `VERDICT_PORT` and `VERDICT_LOG_LEVEL`.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("VERDICT_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup("VERDICT_PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort { value })?,
            None => DEFAULT_PORT,
        };
        let log_level =
            lookup("VERDICT_LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        Ok(Self {
            server: ServerConfig { host, port },
            log_level,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost {
                value: self.host.clone(),
                source,
            })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = CliConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_overrides() {
        let config = CliConfig::from_lookup(lookup(&[
            ("VERDICT_HOST", "0.0.0.0"),
            ("VERDICT_PORT", "9000"),
            ("VERDICT_LOG_LEVEL", "debug"),
        ]))
        .unwrap();
        assert_eq!(config.server.socket_addr().unwrap().to_string(), "0.0.0.0:9000");
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_invalid_port() {
        let result = CliConfig::from_lookup(lookup(&[("VERDICT_PORT", "http")]));
        assert!(matches!(result, Err(ConfigError::InvalidPort { .. })));
    }

    #[test]
    fn test_localhost_and_invalid_host() {
        let local = ServerConfig {
            host: "localhost".to_string(),
            port: 3000,
        };
        assert_eq!(local.socket_addr().unwrap().to_string(), "127.0.0.1:3000");

        let bad = ServerConfig {
            host: "not a host".to_string(),
            port: 3000,
        };
        assert!(matches!(bad.socket_addr(), Err(ConfigError::InvalidHost { .. })));
    }
}
