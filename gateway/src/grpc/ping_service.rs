//! Ping gRPC service implementation
//!
//! Example handler: echoes the message back with the server time.

use chrono::Local;
use tonic::{Request, Response, Status};

use super::ping_server::ping_service_server::PingService;
use super::ping_server::{PingRequest, PingResponse};

/// Ping service implementation
#[derive(Debug, Default, Clone)]
pub struct PingServiceImpl;

impl PingServiceImpl {
    pub fn new() -> Self {
        Self
    }
}

#[tonic::async_trait]
impl PingService for PingServiceImpl {
    async fn ping(&self, request: Request<PingRequest>) -> Result<Response<PingResponse>, Status> {
        let req = request.into_inner();
        tracing::info!("Received ping: {}", req.message);

        let response = PingResponse {
            message: format!("Pong: {}", req.message),
            server_time: Local::now().to_rfc3339(),
        };
        Ok(Response::new(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ping_replies_with_pong() {
        let service = PingServiceImpl::new();

        let response = service
            .ping(Request::new(PingRequest {
                message: "hello".to_string(),
            }))
            .await
            .unwrap()
            .into_inner();

        assert_eq!(response.message, "Pong: hello");
        assert!(!response.server_time.is_empty());
    }

    #[tokio::test]
    async fn test_ping_empty_message() {
        let service = PingServiceImpl::new();

        let response = service
            .ping(Request::new(PingRequest::default()))
            .await
            .unwrap()
            .into_inner();

        assert_eq!(response.message, "Pong: ");
    }
}
