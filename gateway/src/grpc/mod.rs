//! gRPC module
//!
//! Contains the generated gRPC code and service implementations.

// Re-export proto types from the shared proto crate
pub mod ping_server {
    pub use proto::ping::*;
}

pub mod ping_service;

pub use ping_service::PingServiceImpl;
