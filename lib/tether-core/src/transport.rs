//! The request-dispatch primitive.

use std::future::Future;

use crate::{Request, Response, TransportError};

/// Executes one HTTP request.
///
/// Everything above this trait (classification, adapters, gating) is
/// independent of the HTTP stack; implement it to plug in another client or
/// a test double.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use std::future::Future;
///
/// use bytes::Bytes;
/// use tether_core::{Request, Response, Transport, TransportError};
///
/// #[derive(Clone)]
/// struct AlwaysNoContent;
///
/// impl Transport for AlwaysNoContent {
///     fn execute(
///         &self,
///         _request: Request,
///     ) -> impl Future<Output = Result<Response, TransportError>> + Send {
///         async { Ok(Response::new(204, HashMap::new(), Bytes::new())) }
///     }
/// }
/// ```
pub trait Transport: Send + Sync {
    /// Execute an HTTP request and return the response, whatever its status.
    ///
    /// # Errors
    ///
    /// Returns an error only when no response was received:
    /// - Network errors
    /// - TLS errors
    /// - Timeouts
    /// - Invalid request
    fn execute(
        &self,
        request: Request,
    ) -> impl Future<Output = Result<Response, TransportError>> + Send;
}
