//! Client handles
//!
//! A handle ties one service identity to the address and path prefix its
//! client talks to. Handles are built once by the registry and never change.

use http::Uri;
use tonic::transport::Channel;

use error::ConfigError;
use proto::ping_service_client::PingServiceClient;
use proto::Service;

/// Typed client for `infrastructure.v1.PingService`
pub type PingClient = PingServiceClient<Channel>;

/// Typed client for one service
#[derive(Debug, Clone)]
pub enum ServiceClient {
    Ping(PingClient),
}

impl ServiceClient {
    fn new(service: Service, channel: Channel, origin: Uri) -> Self {
        match service {
            Service::Ping => ServiceClient::Ping(PingServiceClient::with_origin(channel, origin)),
        }
    }

    /// Service this client calls
    pub fn service(&self) -> Service {
        match self {
            ServiceClient::Ping(_) => Service::Ping,
        }
    }
}

/// Client bound to one downstream service
#[derive(Debug)]
pub struct ClientHandle {
    service: Service,
    base_address: Uri,
    path_prefix: String,
    origin: Uri,
    client: ServiceClient,
}

impl ClientHandle {
    /// Create a handle with its own lazily-connected channel.
    ///
    /// No connection is attempted until the first call. Outside a Tokio
    /// runtime this fails with [`ConfigError::NoRuntime`].
    pub fn new(service: Service, base_address: &str, path_prefix: &str) -> Result<Self, ConfigError> {
        let base_address = parse_base_address(base_address)?;
        let channel = lazy_channel(&base_address)?;
        Self::with_channel(service, base_address, path_prefix, channel)
    }

    /// Create a handle on an existing channel to `base_address`
    pub(crate) fn with_channel(
        service: Service,
        base_address: Uri,
        path_prefix: &str,
        channel: Channel,
    ) -> Result<Self, ConfigError> {
        ConfigError::check_prefix(path_prefix)?;

        let origin = join_origin(&base_address, path_prefix)?;
        let client = ServiceClient::new(service, channel, origin.clone());

        tracing::debug!(
            service = %service,
            origin = %origin,
            "Client handle created"
        );

        Ok(Self {
            service,
            base_address,
            path_prefix: path_prefix.to_string(),
            origin,
            client,
        })
    }

    /// Service this handle targets
    pub fn service(&self) -> Service {
        self.service
    }

    /// Base address (scheme and authority) of the target server
    pub fn base_address(&self) -> &Uri {
        &self.base_address
    }

    /// Path prefix prepended to every RPC path
    pub fn path_prefix(&self) -> &str {
        &self.path_prefix
    }

    /// Base address joined with the path prefix
    pub fn origin(&self) -> &Uri {
        &self.origin
    }

    /// Typed client, borrowed
    pub fn client(&self) -> &ServiceClient {
        &self.client
    }

    /// Ping client sharing this handle's channel.
    ///
    /// Returns `None` if the handle targets another service.
    pub fn ping(&self) -> Option<PingClient> {
        match &self.client {
            ServiceClient::Ping(client) => Some(client.clone()),
        }
    }
}

/// Parse and check a base address such as `http://localhost:8090`
pub(crate) fn parse_base_address(value: &str) -> Result<Uri, ConfigError> {
    let uri: Uri = value
        .parse()
        .map_err(|e: http::uri::InvalidUri| ConfigError::invalid_address(value, e.to_string()))?;

    match uri.scheme_str() {
        Some("http") => {}
        Some(other) => {
            return Err(ConfigError::invalid_address(
                value,
                format!("unsupported scheme '{}', TLS is terminated upstream", other),
            ))
        }
        None => return Err(ConfigError::invalid_address(value, "missing scheme")),
    }

    let Some(authority) = uri.authority() else {
        return Err(ConfigError::invalid_address(value, "missing host"));
    };
    if authority.port_u16().is_none() {
        return Err(ConfigError::invalid_address(value, "missing port"));
    }

    let path = uri.path();
    if !(path.is_empty() || path == "/") || uri.query().is_some() {
        return Err(ConfigError::invalid_address(
            value,
            "must not carry a path; use the path prefix instead",
        ));
    }

    Ok(uri)
}

/// Channel that dials `base_address` on first use.
///
/// The channel's background worker is spawned onto the current runtime, so
/// one must be running.
pub(crate) fn lazy_channel(base_address: &Uri) -> Result<Channel, ConfigError> {
    tokio::runtime::Handle::try_current().map_err(|e| ConfigError::NoRuntime(e.to_string()))?;
    Ok(Channel::builder(base_address.clone()).connect_lazy())
}

fn join_origin(base_address: &Uri, path_prefix: &str) -> Result<Uri, ConfigError> {
    let scheme = base_address.scheme_str().unwrap_or("http");
    let authority = base_address
        .authority()
        .map(|a| a.as_str())
        .unwrap_or_default();

    format!("{}://{}{}", scheme, authority, path_prefix)
        .parse()
        .map_err(|e: http::uri::InvalidUri| ConfigError::invalid_prefix(path_prefix, e.to_string()))
}
