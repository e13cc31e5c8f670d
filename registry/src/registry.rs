//! The process-wide service registry
//!
//! Built once at startup and passed by reference to whatever needs a
//! client. Read-only after construction.

use std::collections::HashMap;

use tonic::transport::Channel;

use error::{ConfigError, RegistryError};
use proto::Service;

use crate::config::RegistryConfig;
use crate::handle::{lazy_channel, parse_base_address, ClientHandle};

/// One client handle per known downstream service.
///
/// Each handle's base address and prefix must match how the target gateway
/// mounts that service. Neither side checks this; a mismatch shows up as
/// `NotFound`/`Unimplemented` on the first call.
#[derive(Debug)]
pub struct Registry {
    ping: ClientHandle,
}

impl Registry {
    /// Build every handle from `config`.
    ///
    /// Services sharing a base address share one channel. No network I/O is
    /// performed; channels connect on first use. Returns
    /// [`ConfigError::NoRuntime`] when called outside a Tokio runtime.
    pub fn new(config: &RegistryConfig) -> Result<Self, ConfigError> {
        let mut channels: HashMap<String, Channel> = HashMap::new();

        let mut build = |service: Service| -> Result<ClientHandle, ConfigError> {
            let base_address = parse_base_address(config.base_address_for(service))?;
            let key = base_address
                .authority()
                .map(|a| a.as_str().to_string())
                .unwrap_or_default();
            let channel = match channels.get(&key) {
                Some(channel) => channel.clone(),
                None => {
                    let channel = lazy_channel(&base_address)?;
                    channels.insert(key, channel.clone());
                    channel
                }
            };

            ClientHandle::with_channel(
                service,
                base_address,
                &config.path_prefix_for(service),
                channel,
            )
        };

        let registry = Self {
            ping: build(Service::Ping)?,
        };

        for handle in registry.iter() {
            tracing::info!(
                service = %handle.service(),
                origin = %handle.origin(),
                "Registry handle bound"
            );
        }

        Ok(registry)
    }

    /// Build the registry from the default constants
    pub fn from_defaults() -> Result<Self, ConfigError> {
        Self::new(&RegistryConfig::default())
    }

    /// Handle for a known service
    pub fn handle(&self, service: Service) -> &ClientHandle {
        match service {
            Service::Ping => &self.ping,
        }
    }

    /// Handle for a service by logical name, e.g. `"ping"`
    pub fn get(&self, name: &str) -> Result<&ClientHandle, RegistryError> {
        Service::from_name(name)
            .map(|service| self.handle(service))
            .ok_or_else(|| RegistryError::UnknownService(name.to_string()))
    }

    /// Handle for a fully-qualified service type name,
    /// e.g. `"infrastructure.v1.PingService"`
    pub fn resolve(&self, type_name: &str) -> Result<&ClientHandle, RegistryError> {
        Service::from_type_name(type_name)
            .map(|service| self.handle(service))
            .ok_or_else(|| RegistryError::UnknownService(type_name.to_string()))
    }

    /// Ping service handle
    pub fn ping(&self) -> &ClientHandle {
        &self.ping
    }

    /// All handles, in [`Service::ALL`] order
    pub fn iter(&self) -> impl Iterator<Item = &ClientHandle> + '_ {
        Service::ALL.into_iter().map(move |service| self.handle(service))
    }
}
