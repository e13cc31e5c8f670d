//! Service Registry
//!
//! Typed RPC clients for every downstream service, constructed once and
//! shared read-only with the rest of the application.
//!
//! ```rust,ignore
//! let registry = registry::Registry::from_defaults()?;
//! let mut client = registry.get("ping")?.ping().expect("ping handle");
//! let reply = client.ping(proto::PingRequest { message: "hello".into() }).await?;
//! ```

pub mod config;
pub mod handle;
pub mod registry;

pub use config::{RegistryConfig, DEFAULT_BASE_ADDRESS};
pub use handle::{ClientHandle, PingClient, ServiceClient};
pub use registry::Registry;
