//! Service Router
//!
//! Builds the request multiplexer: every gRPC service is mounted at its
//! canonical path (`/<package>.<Service>/`) and, when a shared API prefix is
//! configured, again under that prefix with the prefix stripped before
//! dispatch. Both mounts reach the same handler.
//!
//! Routes are fixed once serving starts. Overlapping mounts are rejected
//! while binding instead of being resolved by registration order.

use std::convert::Infallible;

use axum::extract::Request;
use axum::response::IntoResponse;
use axum::Router;
use tonic::server::NamedService;
use tower::Service;

use error::ConfigError;

/// One service mounted on the mux
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceBinding {
    /// Fully-qualified service name, e.g. `infrastructure.v1.PingService`
    pub service: &'static str,
    /// Canonical mount path, e.g. `/infrastructure.v1.PingService/`
    pub path: String,
    /// Same mount under the shared prefix, if one is configured
    pub prefixed_path: Option<String>,
}

/// Request multiplexer under construction
#[derive(Debug)]
pub struct Mux {
    prefix: Option<String>,
    routes: Router,
    prefixed: Router,
    bindings: Vec<ServiceBinding>,
}

impl Mux {
    /// Create an empty mux, optionally mounting services under `prefix` too
    pub fn new(prefix: Option<&str>) -> Result<Self, ConfigError> {
        let prefix = match prefix {
            Some(p) if !p.is_empty() => {
                ConfigError::check_prefix(p)?;
                Some(p.to_string())
            }
            _ => None,
        };

        Ok(Self {
            prefix,
            routes: Router::new(),
            prefixed: Router::new(),
            bindings: Vec::new(),
        })
    }

    /// Shared prefix, if any
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Services bound so far, in binding order
    pub fn bindings(&self) -> &[ServiceBinding] {
        &self.bindings
    }

    /// Mount a generated gRPC service.
    ///
    /// Fails with [`ConfigError::RouteConflict`] if the service's path is
    /// already claimed or overlaps the shared prefix.
    pub fn bind<S>(mut self, service: S) -> Result<Self, ConfigError>
    where
        S: Service<Request, Error = Infallible> + NamedService + Clone + Send + 'static,
        S::Response: IntoResponse,
        S::Future: Send + 'static,
    {
        let name = S::NAME;
        let path = format!("/{}/", name);

        if let Some(existing) = self.bindings.iter().find(|b| b.path == path) {
            return Err(ConfigError::RouteConflict {
                path,
                existing: existing.service.to_string(),
                incoming: name.to_string(),
            });
        }

        if let Some(prefix) = &self.prefix {
            let overlaps = path.starts_with(&format!("{}/", prefix)) || prefix.starts_with(&path);
            if overlaps {
                return Err(ConfigError::RouteConflict {
                    path,
                    existing: format!("API prefix {}", prefix),
                    incoming: name.to_string(),
                });
            }
        }

        let pattern = format!("/{}/*method", name);
        let prefixed_path = self.prefix.as_ref().map(|prefix| format!("{}{}", prefix, path));

        self.routes = self.routes.route_service(&pattern, service.clone());
        if self.prefix.is_some() {
            self.prefixed = self.prefixed.route_service(&pattern, service);
        }

        tracing::info!(
            service = name,
            path = %path,
            prefixed_path = prefixed_path.as_deref().unwrap_or("-"),
            "Service bound"
        );

        self.bindings.push(ServiceBinding {
            service: name,
            path,
            prefixed_path,
        });

        Ok(self)
    }

    /// Finish binding and produce the router.
    ///
    /// Unmatched paths fall through to the router's `404 Not Found`.
    pub fn into_router(self) -> Router {
        match self.prefix {
            Some(prefix) if !self.bindings.is_empty() => {
                self.routes.nest_service(&prefix, self.prefixed)
            }
            _ => self.routes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use http::{Method, StatusCode};
    use tower::ServiceExt;

    use crate::grpc::ping_server::ping_service_server::PingServiceServer;
    use crate::grpc::PingServiceImpl;

    fn ping() -> PingServiceServer<PingServiceImpl> {
        PingServiceServer::new(PingServiceImpl::new())
    }

    #[test]
    fn test_bind_records_paths() {
        let mux = Mux::new(Some("/api/infrastructure/v1"))
            .unwrap()
            .bind(ping())
            .unwrap();

        assert_eq!(
            mux.bindings(),
            &[ServiceBinding {
                service: "infrastructure.v1.PingService",
                path: "/infrastructure.v1.PingService/".to_string(),
                prefixed_path: Some(
                    "/api/infrastructure/v1/infrastructure.v1.PingService/".to_string()
                ),
            }]
        );
    }

    #[test]
    fn test_bind_without_prefix() {
        let mux = Mux::new(None).unwrap().bind(ping()).unwrap();
        assert_eq!(mux.prefix(), None);
        assert_eq!(mux.bindings()[0].prefixed_path, None);

        let mux = Mux::new(Some("")).unwrap();
        assert_eq!(mux.prefix(), None);
    }

    #[test]
    fn test_duplicate_binding_rejected() {
        let result = Mux::new(None).unwrap().bind(ping()).unwrap().bind(ping());

        match result {
            Err(ConfigError::RouteConflict { path, existing, incoming }) => {
                assert_eq!(path, "/infrastructure.v1.PingService/");
                assert_eq!(existing, "infrastructure.v1.PingService");
                assert_eq!(incoming, "infrastructure.v1.PingService");
            }
            other => panic!("expected route conflict, got {:?}", other.map(|m| m.bindings().to_vec())),
        }
    }

    #[test]
    fn test_prefix_overlapping_service_rejected() {
        for prefix in [
            "/infrastructure.v1.PingService",
            "/infrastructure.v1.PingService/Ping",
        ] {
            let result = Mux::new(Some(prefix)).unwrap().bind(ping());
            assert!(
                matches!(result, Err(ConfigError::RouteConflict { .. })),
                "prefix {} should conflict",
                prefix
            );
        }
    }

    #[test]
    fn test_invalid_prefix_rejected() {
        assert!(matches!(
            Mux::new(Some("api/v1/")),
            Err(ConfigError::InvalidPrefix { .. })
        ));
    }

    #[tokio::test]
    async fn test_unbound_path_not_found() {
        let router = Mux::new(Some("/api/infrastructure/v1"))
            .unwrap()
            .bind(ping())
            .unwrap()
            .into_router();

        for uri in [
            "/nothing.here/Method",
            "/api/infrastructure/v1/nothing.here/Method",
            "/api/other/v1/infrastructure.v1.PingService/Ping",
        ] {
            let req = Request::builder()
                .method(Method::POST)
                .uri(uri)
                .body(Body::empty())
                .unwrap();
            let response = router.clone().oneshot(req).await.unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
        }
    }
}
