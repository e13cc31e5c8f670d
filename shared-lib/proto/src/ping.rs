//! Ping service definitions
//!
//! `infrastructure.v1.PingService`: one unary call echoing a message back
//! with the server's current time.

/// Ping request
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PingRequest {
    #[prost(string, tag = "1")]
    pub message: ::prost::alloc::string::String,
}

/// Ping response
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PingResponse {
    #[prost(string, tag = "1")]
    pub message: ::prost::alloc::string::String,
    /// Server-generated timestamp
    #[prost(string, tag = "2")]
    pub server_time: ::prost::alloc::string::String,
}

// Generated `ping_service_client` and `ping_service_server` modules
include!(concat!(env!("OUT_DIR"), "/infrastructure.v1.PingService.rs"));
