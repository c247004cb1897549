//! Access-token plugin.
//!
//! Adds an `Authorization: <scheme> <token>` header to outgoing requests.
//! The token is read from a closure on every request, so a caller that gets
//! [`tether_core::ApiError::StatusCode`] 400 back can refresh it and retry.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tower::{Layer, Service};

use crate::{Request, Response, TransportError};

type TokenFn = Arc<dyn Fn() -> String + Send + Sync>;

/// Scheme placed before the token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationType {
    /// `Bearer <token>`
    Bearer,
    /// `Basic <token>`, the token being the already encoded credentials.
    Basic,
    /// `<scheme> <token>`
    Custom(String),
}

impl AuthorizationType {
    /// The scheme name.
    #[must_use]
    pub fn scheme(&self) -> &str {
        match self {
            Self::Bearer => "Bearer",
            Self::Basic => "Basic",
            Self::Custom(scheme) => scheme,
        }
    }
}

/// Layer that authorizes requests with an access token.
///
/// Requests that already carry an `Authorization` header are left alone.
///
/// # Example
///
/// ```ignore
/// use std::sync::{Arc, RwLock};
/// use tether::middleware::AccessTokenLayer;
///
/// let token = Arc::new(RwLock::new(String::from("initial")));
/// let reader = Arc::clone(&token);
/// let layer = AccessTokenLayer::bearer(move || reader.read().map(|t| t.clone()).unwrap_or_default());
/// ```
#[derive(Clone)]
pub struct AccessTokenLayer {
    kind: AuthorizationType,
    token: TokenFn,
}

impl std::fmt::Debug for AccessTokenLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessTokenLayer")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl AccessTokenLayer {
    /// Authorize with the given scheme and token source.
    pub fn new<F>(kind: AuthorizationType, token: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        Self {
            kind,
            token: Arc::new(token),
        }
    }

    /// `Bearer` authorization.
    pub fn bearer<F>(token: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        Self::new(AuthorizationType::Bearer, token)
    }

    /// `Bearer` authorization with a fixed token.
    pub fn bearer_static(token: impl Into<String>) -> Self {
        let token: Arc<str> = Arc::from(token.into());
        Self::bearer(move || token.to_string())
    }
}

impl<S> Layer<S> for AccessTokenLayer {
    type Service = AccessToken<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AccessToken {
            inner,
            kind: self.kind.clone(),
            token: Arc::clone(&self.token),
        }
    }
}

/// Service that authorizes requests with an access token.
#[derive(Clone)]
pub struct AccessToken<S> {
    inner: S,
    kind: AuthorizationType,
    token: TokenFn,
}

impl<S: std::fmt::Debug> std::fmt::Debug for AccessToken<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("inner", &self.inner)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl<S> Service<Request> for AccessToken<S>
where
    S: Service<Request, Response = Response, Error = TransportError> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = TransportError;
    type Future = Pin<Box<dyn Future<Output = Result<Response, TransportError>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), TransportError>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request) -> Self::Future {
        if request.header("Authorization").is_none() {
            request.headers_mut().insert(
                "Authorization".to_string(),
                format!("{} {}", self.kind.scheme(), (self.token)()),
            );
        }

        // The clone is not ready; keep it and call the instance polled by `poll_ready`.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        Box::pin(async move { inner.call(request).await })
    }
}
