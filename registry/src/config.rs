use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use proto::Service;

/// Address every downstream service is reached at unless overridden
pub const DEFAULT_BASE_ADDRESS: &str = "http://localhost:8090";

/// Service registry configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Base address used for services without an override
    pub base_address: String,

    /// Base address overrides keyed by a dotted prefix of the service's
    /// fully-qualified name, e.g. `infrastructure` or `infrastructure.v1`.
    /// The longest matching key wins.
    #[serde(default)]
    pub addresses: BTreeMap<String, String>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_address: DEFAULT_BASE_ADDRESS.to_string(),
            addresses: BTreeMap::new(),
        }
    }
}

impl RegistryConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("REGISTRY_BASE_ADDRESS") {
            config.base_address = addr;
        }

        config
    }

    /// Point every service at `base_address`
    pub fn with_base_address(mut self, base_address: impl Into<String>) -> Self {
        self.base_address = base_address.into();
        self
    }

    /// Override the base address for every service under `package`
    pub fn with_package_address(
        mut self,
        package: impl Into<String>,
        base_address: impl Into<String>,
    ) -> Self {
        self.addresses.insert(package.into(), base_address.into());
        self
    }

    /// Base address a service's client is bound to
    pub fn base_address_for(&self, service: Service) -> &str {
        let full_name = service.full_name();
        self.addresses
            .iter()
            .filter(|(key, _)| covers(key, full_name))
            .max_by_key(|(key, _)| key.len())
            .map(|(_, addr)| addr.as_str())
            .unwrap_or(&self.base_address)
    }

    /// API path prefix a service's client is bound to.
    ///
    /// Must match the prefix the gateway mounts the service under.
    pub fn path_prefix_for(&self, service: Service) -> String {
        service.api_prefix()
    }
}

/// `key` names `full_name` or one of its enclosing packages
fn covers(key: &str, full_name: &str) -> bool {
    match full_name.strip_prefix(key) {
        Some(rest) => !key.is_empty() && (rest.is_empty() || rest.starts_with('.')),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RegistryConfig::default();
        assert_eq!(config.base_address, "http://localhost:8090");
        assert!(config.addresses.is_empty());
        assert_eq!(
            config.base_address_for(Service::Ping),
            "http://localhost:8090"
        );
        assert_eq!(
            config.path_prefix_for(Service::Ping),
            "/api/infrastructure/v1"
        );
    }

    #[test]
    fn test_package_override() {
        let config = RegistryConfig::default()
            .with_package_address("infrastructure.v1", "http://10.0.0.5:9000")
            .with_package_address("billing.v1", "http://10.0.0.6:9000");

        assert_eq!(
            config.base_address_for(Service::Ping),
            "http://10.0.0.5:9000"
        );
    }

    #[test]
    fn test_longest_package_prefix_wins() {
        let config = RegistryConfig::default()
            .with_package_address("infrastructure", "http://10.0.0.1:9000")
            .with_package_address("infrastructure.v1", "http://10.0.0.2:9000");
        assert_eq!(config.base_address_for(Service::Ping), "http://10.0.0.2:9000");

        let config =
            RegistryConfig::default().with_package_address("infrastructure", "http://10.0.0.1:9000");
        assert_eq!(config.base_address_for(Service::Ping), "http://10.0.0.1:9000");

        let config = RegistryConfig::default()
            .with_package_address("infrastructure.v1.PingService", "http://10.0.0.3:9000");
        assert_eq!(config.base_address_for(Service::Ping), "http://10.0.0.3:9000");
    }

    #[test]
    fn test_partial_segment_does_not_match() {
        let config = RegistryConfig::default()
            .with_package_address("infra", "http://10.0.0.1:9000")
            .with_package_address("infrastructure.v2", "http://10.0.0.2:9000")
            .with_package_address("", "http://10.0.0.3:9000");

        assert_eq!(config.base_address_for(Service::Ping), DEFAULT_BASE_ADDRESS);
    }
}
