//! Gateway library
//!
//! Exposes the gateway as a library so the mux, middleware and server can
//! be built and exercised outside the binary.

pub mod config;
pub mod grpc;
pub mod middleware;
pub mod router;
pub mod server;

pub use config::GatewayConfig;
pub use grpc::PingServiceImpl;
pub use middleware::{CatchPanicLayer, CorsLayer};
pub use router::{Mux, ServiceBinding};
pub use server::{serve_listener, wrap, GatewayServer, GatewayService};
