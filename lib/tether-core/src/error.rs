//! Error types for tether.
//!
//! Two layers of failure are kept apart:
//! - [`TransportError`]: the request never produced a usable HTTP exchange.
//! - [`ApiError`]: the classified result of an exchange (or of its absence).

use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};

// ============================================================================
// Transport Error
// ============================================================================

/// Failure raised before or while exchanging bytes with the server.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum TransportError {
    /// Network/connection errors.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// Request timeout.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,

    /// The request could not be assembled.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),

    /// Parameters of a task could not be encoded.
    #[display("parameter encoding error: {_0}")]
    #[from(skip)]
    Encoding(#[error(not(source))] String),
}

impl TransportError {
    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a parameter encoding error.
    #[must_use]
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding(message.into())
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Encoding(err.to_string())
    }
}

impl From<serde_html_form::ser::Error> for TransportError {
    fn from(err: serde_html_form::ser::Error) -> Self {
        Self::Encoding(err.to_string())
    }
}

// ============================================================================
// Decode Error
// ============================================================================

/// A payload did not deserialize into the requested type.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("JSON deserialization error at '{path}': {message}")]
pub struct DecodeError {
    /// JSON path to the error (e.g., "user.address.city"), empty for syntax errors.
    #[error(not(source))]
    pub path: String,
    /// Error message.
    pub message: String,
}

impl DecodeError {
    /// Create a decode error with path context.
    #[must_use]
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// Structured Server Error
// ============================================================================

/// Error body the server sends alongside a 404.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerErrorBody {
    /// Human readable explanation.
    pub detail: String,
    /// Machine readable error code.
    pub code: String,
}

// ============================================================================
// API Error
// ============================================================================

/// Classified failure of an API call.
///
/// Every non-success path of [`crate::classify`] yields exactly one of these.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum ApiError {
    /// A response arrived without a usable status code.
    #[display("no response")]
    #[from(skip)]
    NoResponse,

    /// A value was required but the payload was empty.
    #[display("empty value")]
    #[from(skip)]
    EmptyValue,

    /// A recognized error status with no body contract.
    #[display("HTTP status error {_0}")]
    #[from(skip)]
    StatusCode(#[error(not(source))] u16),

    /// The server described the error with a `{detail, code}` body.
    #[display("server error {code}: {detail}")]
    #[from(skip)]
    CustomServer {
        /// Human readable explanation.
        #[error(not(source))]
        detail: String,
        /// Machine readable error code.
        code: String,
    },

    /// A status code this layer does not interpret.
    #[display("unhandled HTTP status code {_0}")]
    #[from(skip)]
    UnhandledStatusCode(#[error(not(source))] u16),

    /// The payload did not decode into the requested type.
    #[display("{_0}")]
    #[from]
    Decoding(DecodeError),

    /// The transport failed before a response was received.
    #[display("transport error: {_0}")]
    #[from]
    Transport(TransportError),

    /// Residual case.
    #[display("unknown error")]
    #[from(skip)]
    Unknown,
}

/// Result type alias using [`ApiError`].
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Returns the HTTP status code carried by this error, if any.
    ///
    /// [`ApiError::CustomServer`] is only ever produced for a 404.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::StatusCode(status) | Self::UnhandledStatusCode(status) => Some(*status),
            Self::CustomServer { .. } => Some(404),
            _ => None,
        }
    }

    /// Returns `true` for the 400 signal, which usually means credentials
    /// should be refreshed before retrying.
    #[must_use]
    pub const fn is_bad_request(&self) -> bool {
        matches!(self, Self::StatusCode(400))
    }

    /// Returns `true` if this is a server error (5xx).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|s| (500..600).contains(&s))
    }

    /// Returns `true` if no HTTP exchange took place.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns the structured server error, if the server sent one.
    #[must_use]
    pub fn server_error(&self) -> Option<ServerErrorBody> {
        match self {
            Self::CustomServer { detail, code } => Some(ServerErrorBody {
                detail: detail.clone(),
                code: code.clone(),
            }),
            _ => None,
        }
    }
}

impl From<ServerErrorBody> for ApiError {
    fn from(body: ServerErrorBody) -> Self {
        Self::CustomServer {
            detail: body.detail,
            code: body.code,
        }
    }
}
