//! Shared RPC definitions for all services
//!
//! This crate provides the closed set of RPC services known to the system,
//! their message types and the generated client/server stubs.
//! Use feature flags to select optional parts:
//!
//! - `reflection`: Build a descriptor set for gRPC server reflection

use std::fmt;

pub mod ping;

#[cfg(feature = "reflection")]
pub mod descriptor;

// Re-export commonly used types for convenience
pub use ping::{ping_service_client, ping_service_server, PingRequest, PingResponse};

/// Every RPC service known to the gateway and its clients.
///
/// Adding a service means adding a variant here; every `match` on it, in the
/// registry and in the gateway bindings, then has to handle the new variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Service {
    Ping,
}

impl Service {
    /// All services, in declaration order
    pub const ALL: [Service; 1] = [Service::Ping];

    /// Logical name used for registry lookups
    pub const fn name(self) -> &'static str {
        match self {
            Service::Ping => "ping",
        }
    }

    /// Protobuf package the service is declared in
    pub const fn package(self) -> &'static str {
        match self {
            Service::Ping => "infrastructure.v1",
        }
    }

    /// Fully-qualified service name, e.g. `infrastructure.v1.PingService`
    pub const fn full_name(self) -> &'static str {
        match self {
            Service::Ping => "infrastructure.v1.PingService",
        }
    }

    /// Canonical mount path generated from the service identity.
    pub fn canonical_path(self) -> String {
        format!("/{}/", self.full_name())
    }

    /// Versioned API prefix derived from the package,
    /// e.g. `infrastructure.v1` -> `/api/infrastructure/v1`.
    pub fn api_prefix(self) -> String {
        format!("/api/{}", self.package().replace('.', "/"))
    }

    /// Look up a service by its logical name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }

    /// Look up a service by a fully-qualified type name.
    ///
    /// The type name matches when it equals the service's full name or when it
    /// is nested inside the service's package (`infrastructure.v1.PingService`
    /// and `infrastructure.v1.PingService.Ping` both resolve to `Ping`).
    pub fn from_type_name(type_name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| {
            let full = s.full_name();
            type_name == full
                || type_name
                    .strip_prefix(full)
                    .is_some_and(|rest| rest.starts_with('.') || rest.starts_with('/'))
        })
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
