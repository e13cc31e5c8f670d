use serde::{Deserialize, Serialize};

use error::ConfigError;

/// Listen address used when `GATEWAY_ADDR` is not set
pub const DEFAULT_LISTEN_ADDR: &str = "localhost:8090";

/// Shared API prefix used when `GATEWAY_API_PREFIX` is not set
pub const DEFAULT_API_PREFIX: &str = "/api/infrastructure/v1";

/// Gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Listen address (`host:port`)
    pub listen_addr: String,

    /// Shared prefix every service is additionally mounted under.
    /// Empty disables the prefixed mount.
    pub api_prefix: String,

    /// Serve gRPC server reflection
    pub reflection: bool,

    /// Service version
    pub version: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            reflection: true,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl GatewayConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("GATEWAY_ADDR") {
            config.listen_addr = addr;
        }

        if let Ok(prefix) = std::env::var("GATEWAY_API_PREFIX") {
            config.api_prefix = prefix;
        }

        if let Ok(reflection) = std::env::var("GATEWAY_REFLECTION") {
            config.reflection = reflection.to_lowercase() == "true" || reflection == "1";
        }

        config
    }

    /// Check the listen address and prefix before anything is bound
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_listen_addr(&self.listen_addr)?;
        ConfigError::check_prefix(&self.api_prefix)
    }

    /// Shared prefix, if one is configured
    pub fn api_prefix(&self) -> Option<&str> {
        if self.api_prefix.is_empty() {
            None
        } else {
            Some(&self.api_prefix)
        }
    }
}

fn check_listen_addr(addr: &str) -> Result<(), ConfigError> {
    let Some((host, port)) = addr.rsplit_once(':') else {
        return Err(ConfigError::invalid_address(addr, "expected host:port"));
    };

    if host.is_empty() {
        return Err(ConfigError::invalid_address(addr, "missing host"));
    }
    if host.contains('/') || host.chars().any(char::is_whitespace) {
        return Err(ConfigError::invalid_address(addr, "malformed host"));
    }
    if port.parse::<u16>().is_err() {
        return Err(ConfigError::invalid_address(addr, "port must be 0-65535"));
    }

    Ok(())
}
