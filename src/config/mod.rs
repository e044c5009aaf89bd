//! Configuration module - environment variable parsing

use std::env;
use std::net::IpAddr;

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Bind address
    pub host: IpAddr,
    /// First TCP port to try (auto-increments on collision)
    pub port: u16,
    /// Cap on the port auto-increment loop
    pub max_bind_attempts: u16,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Arena edge length, fixed for the process lifetime
    pub map_size: f32,
    /// Optional RNG seed for deterministic spawn positions
    pub rng_seed: Option<u64>,
}

impl Config {
    /// Load configuration from environment variables. Every variable has a
    /// default; only an unparseable value is an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: parse_or("HOST", "0.0.0.0")?,
            port: parse_or("PORT", "3000")?,
            max_bind_attempts: parse_or("MAX_BIND_ATTEMPTS", "16")?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            map_size: parse_or("MAP_SIZE", "100")?,
            rng_seed: match env::var("RNG_SEED") {
                Ok(v) => Some(v.parse().map_err(|_| ConfigError::Invalid("RNG_SEED"))?),
                Err(_) => None,
            },
        })
    }
}

fn parse_or<T: std::str::FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError> {
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|_| ConfigError::Invalid(key))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: 3000,
            max_bind_attempts: 16,
            log_level: "info".to_string(),
            map_size: 100.0,
            rng_seed: None,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.max_bind_attempts, 16);
        assert_eq!(config.map_size, 100.0);
        assert!(config.rng_seed.is_none());
    }
}
