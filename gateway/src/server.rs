//! Gateway server
//!
//! Binds every known service into the mux, wraps it with the middleware
//! stack and serves it on one listener. The listener speaks HTTP/1.1 and
//! cleartext HTTP/2 (prior knowledge), which is what gRPC clients use
//! without TLS. TLS is expected to be terminated by a reverse proxy.

use std::future::Future;

use axum::Router;
use tokio::net::TcpListener;
use tower::make::Shared;
use tower::ServiceBuilder;

use error::{ConfigError, ListenError};
use proto::Service;

use crate::config::GatewayConfig;
use crate::grpc::ping_server::ping_service_server::PingServiceServer;
use crate::grpc::PingServiceImpl;
use crate::middleware::{CatchPanic, CatchPanicLayer, Cors, CorsLayer};
use crate::router::{Mux, ServiceBinding};

/// The final request handler: CORS, then panic isolation, then the mux
pub type GatewayService = Cors<CatchPanic<Router>>;

/// Wrap a finished router with the middleware stack
pub fn wrap(router: Router) -> GatewayService {
    ServiceBuilder::new()
        .layer(CorsLayer::new())
        .layer(CatchPanicLayer::new())
        .service(router)
}

/// Bind one known service into the mux
fn bind_service(mux: Mux, service: Service) -> Result<Mux, ConfigError> {
    match service {
        Service::Ping => mux.bind(PingServiceServer::new(PingServiceImpl::new())),
    }
}

#[cfg(feature = "reflection")]
fn bind_reflection(mux: Mux) -> Result<Mux, ConfigError> {
    let reflection = tonic_reflection::server::Builder::configure()
        .register_file_descriptor_set(proto::descriptor::file_descriptor_set())
        .build_v1()
        .map_err(|e| ConfigError::Descriptor(e.to_string()))?;

    mux.bind(reflection)
}

/// Gateway with every service bound, ready to serve
#[derive(Debug)]
pub struct GatewayServer {
    config: GatewayConfig,
    mux: Mux,
}

impl GatewayServer {
    /// Validate `config` and bind every service in [`Service::ALL`]
    pub fn new(config: GatewayConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut mux = Mux::new(config.api_prefix())?;
        for service in Service::ALL {
            mux = bind_service(mux, service)?;
        }

        #[cfg(feature = "reflection")]
        if config.reflection {
            mux = bind_reflection(mux)?;
        }

        Ok(Self { config, mux })
    }

    /// Services bound into the mux
    pub fn bindings(&self) -> &[ServiceBinding] {
        self.mux.bindings()
    }

    /// Wrap the mux into the final request handler
    pub fn into_service(self) -> GatewayService {
        wrap(self.mux.into_router())
    }

    /// Bind the configured address and serve until `shutdown` resolves.
    ///
    /// Returns [`ListenError::Bind`] if the address cannot be bound; nothing is
    /// reachable in that case.
    pub async fn serve<F>(self, shutdown: F) -> Result<(), ListenError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.listen_addr.clone();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ListenError::Bind { addr, source })?;

        let prefix = self.config.api_prefix.clone();
        let local = listener.local_addr()?;
        tracing::info!("Server listening on http://{}{}", local, prefix);

        serve_listener(listener, self.into_service(), shutdown).await
    }
}

/// Serve `service` on an already bound listener until `shutdown` resolves
pub async fn serve_listener<F>(
    listener: TcpListener,
    service: GatewayService,
    shutdown: F,
) -> Result<(), ListenError>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, Shared::new(service))
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Gateway shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> GatewayConfig {
        GatewayConfig {
            listen_addr: "127.0.0.1:0".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_binds_every_known_service() {
        let server = GatewayServer::new(test_config()).unwrap();

        for service in Service::ALL {
            let binding = server
                .bindings()
                .iter()
                .find(|b| b.service == service.full_name())
                .unwrap_or_else(|| panic!("{} not bound", service));
            assert_eq!(binding.path, service.canonical_path());
            assert_eq!(
                binding.prefixed_path.as_deref(),
                Some(format!("{}{}", service.api_prefix(), service.canonical_path()).as_str())
            );
        }
    }

    #[cfg(feature = "reflection")]
    #[test]
    fn test_reflection_toggle() {
        let server = GatewayServer::new(test_config()).unwrap();
        assert!(server
            .bindings()
            .iter()
            .any(|b| b.service == "grpc.reflection.v1.ServerReflection"));

        let server = GatewayServer::new(GatewayConfig {
            reflection: false,
            ..test_config()
        })
        .unwrap();
        assert_eq!(server.bindings().len(), Service::ALL.len());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = GatewayServer::new(GatewayConfig {
            listen_addr: "no-port".to_string(),
            ..Default::default()
        });
        assert!(matches!(result, Err(ConfigError::InvalidAddress { .. })));
    }

    #[tokio::test]
    async fn test_bind_failure_is_listen_error() {
        let occupied = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = occupied.local_addr().unwrap();

        let server = GatewayServer::new(GatewayConfig {
            listen_addr: addr.to_string(),
            ..Default::default()
        })
        .unwrap();

        let result = server.serve(std::future::pending()).await;
        assert!(matches!(result, Err(ListenError::Bind { .. })));
    }
}
