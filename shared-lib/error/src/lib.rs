//! Common error types for the gateway and the service registry.
//!
//! Construction-time and listener errors are fatal; registry lookups and
//! handler failures are local to their caller.

use std::io;

use thiserror::Error;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Listen error: {0}")]
    Listen(#[from] ListenError),
}

/// Malformed configuration detected before anything is served.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid address '{value}': {reason}")]
    InvalidAddress { value: String, reason: String },

    #[error("Invalid path prefix '{value}': {reason}")]
    InvalidPrefix { value: String, reason: String },

    #[error("Route conflict on '{path}': already bound to {existing}, cannot bind {incoming}")]
    RouteConflict {
        path: String,
        existing: String,
        incoming: String,
    },

    #[error("Invalid service descriptor: {0}")]
    Descriptor(String),

    #[error("No Tokio runtime available to drive client channels: {0}")]
    NoRuntime(String),
}

impl ConfigError {
    pub fn invalid_address(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAddress {
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_prefix(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPrefix {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Check an API path prefix such as `/api/infrastructure/v1`.
    ///
    /// The empty string means "no prefix" and is accepted.
    pub fn check_prefix(prefix: &str) -> std::result::Result<(), Self> {
        if prefix.is_empty() {
            return Ok(());
        }
        if !prefix.starts_with('/') {
            return Err(Self::invalid_prefix(prefix, "must start with '/'"));
        }
        if prefix == "/" || prefix.ends_with('/') {
            return Err(Self::invalid_prefix(prefix, "must not end with '/'"));
        }
        if prefix.contains("//") {
            return Err(Self::invalid_prefix(prefix, "must not contain empty segments"));
        }
        if let Some(c) = prefix
            .chars()
            .find(|c| c.is_whitespace() || matches!(c, '*' | ':' | '{' | '}' | '?' | '#'))
        {
            return Err(Self::invalid_prefix(
                prefix,
                format!("must not contain '{}'", c.escape_default()),
            ));
        }
        Ok(())
    }
}

/// Service registry lookup errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Unknown service: {0}")]
    UnknownService(String),
}

/// Listener errors. Always fatal to the process.
#[derive(Debug, Error)]
pub enum ListenError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("Server I/O error: {0}")]
    Serve(#[from] io::Error),
}

/// Failure of a single RPC handler, reported to that request's caller only.
///
/// Handlers return `tonic::Status` directly; this covers failures caught at
/// the dispatch boundary.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("Handler panicked: {0}")]
    Panicked(String),
}

impl From<HandlerError> for tonic::Status {
    fn from(err: HandlerError) -> Self {
        match err {
            // Panic payloads stay in the server log
            HandlerError::Panicked(_) => tonic::Status::internal("handler panicked"),
        }
    }
}

/// Result type alias using AppError.
pub type Result<T> = std::result::Result<T, AppError>;
