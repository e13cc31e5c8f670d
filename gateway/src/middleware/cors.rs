//! Cross-origin policy for every route.
//!
//! One blanket policy: any origin, `POST`/`OPTIONS`, and the two request
//! headers RPC clients send. Preflight requests are answered here and never
//! reach the mux.

use std::task::{Context, Poll};

use futures_util::future::BoxFuture;
use http::header::{
    HeaderMap, HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN,
};
use http::{Method, Request, Response, StatusCode};
use tower::{Layer, Service};

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "POST, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type, Connect-Protocol-Version";

/// Tower layer that applies the cross-origin policy.
#[derive(Clone, Copy, Debug, Default)]
pub struct CorsLayer;

impl CorsLayer {
    pub const fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for CorsLayer {
    type Service = Cors<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Cors::new(inner)
    }
}

/// The service wrapper that answers preflights and sets CORS headers.
#[derive(Clone, Debug)]
pub struct Cors<S> {
    inner: S,
}

impl<S> Cors<S> {
    pub const fn new(inner: S) -> Self {
        Self { inner }
    }
}

fn apply_headers(headers: &mut HeaderMap) {
    headers.insert(
        ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(ALLOW_ORIGIN),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for Cors<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send,
    ReqBody: Send + 'static,
    ResBody: Default + Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        if req.method() == Method::OPTIONS {
            let mut response = Response::new(ResBody::default());
            *response.status_mut() = StatusCode::OK;
            apply_headers(response.headers_mut());
            return Box::pin(async move { Ok(response) });
        }

        // Call the instance that was driven to readiness
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let mut response = inner.call(req).await?;
            apply_headers(response.headers_mut());
            Ok(response)
        })
    }
}
