//! Network logger plugin.
//!
//! Logs every request and its outcome through `tracing`. What ends up
//! rendered is decided by the subscriber the application installs: the
//! summary is emitted at `info`, details at `debug`.

use std::fmt::Write as _;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use tower::{Layer, Service};
use tracing::{Instrument, Level, debug, info, span, warn};

use crate::{Request, Response, TransportError};

/// What the logger includes beyond the one-line summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogOptions {
    /// Request and response headers.
    pub headers: bool,
    /// Request and response bodies, cut at `body_limit` bytes.
    pub bodies: bool,
    /// The request rendered as a `curl` command.
    pub curl: bool,
    /// Maximum number of body bytes logged.
    pub body_limit: usize,
}

impl LogOptions {
    /// One line per request and per response.
    #[must_use]
    pub const fn summary() -> Self {
        Self {
            headers: false,
            bodies: false,
            curl: false,
            body_limit: 1024,
        }
    }

    /// Everything: headers, bodies, cURL.
    #[must_use]
    pub const fn verbose() -> Self {
        Self {
            headers: true,
            bodies: true,
            curl: true,
            body_limit: 4096,
        }
    }

    /// Set the body size limit.
    #[must_use]
    pub const fn with_body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }
}

impl Default for LogOptions {
    fn default() -> Self {
        Self::summary()
    }
}

/// Layer that adds request/response logging.
///
/// # Example
///
/// ```ignore
/// use tether::middleware::{LogOptions, LoggingLayer};
///
/// let transport = HyperTransport::builder()
///     .layer(LoggingLayer::with_options(LogOptions::verbose().with_body_limit(512)))
///     .build();
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingLayer {
    options: LogOptions,
}

impl LoggingLayer {
    /// Summary logging.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Logging with headers, bodies and cURL rendering.
    #[must_use]
    pub fn debug() -> Self {
        Self::with_options(LogOptions::verbose())
    }

    /// Logging with explicit options.
    #[must_use]
    pub const fn with_options(options: LogOptions) -> Self {
        Self { options }
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = Logging<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Logging {
            inner,
            options: self.options,
        }
    }
}

/// Service that logs requests and responses.
#[derive(Debug, Clone)]
pub struct Logging<S> {
    inner: S,
    options: LogOptions,
}

impl<S> Service<Request> for Logging<S>
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

    fn call(&mut self, request: Request) -> Self::Future {
        let method = request.method().clone();
        let url = request.url().to_string();
        let options = self.options;

        let span = span!(Level::INFO, "http_request", %method, %url);

        // The clone is not ready; keep it and call the instance polled by `poll_ready`.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        Box::pin(
            async move {
                let start = Instant::now();

                info!("sending request");
                if options.headers {
                    debug!(headers = ?request.headers(), "request headers");
                }
                if options.bodies {
                    if let Some(body) = request.body() {
                        debug!(body = %preview(body, options.body_limit), "request body");
                    }
                }
                if options.curl {
                    debug!(curl = %render_curl(&request), "request as cURL");
                }

                let result = inner.call(request).await;

                // Saturating conversion to u64 (truncates after ~584 million years)
                let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

                match &result {
                    Ok(response) => {
                        let status = response.status();
                        if response.is_success() {
                            info!(status, elapsed_ms, "response received");
                        } else {
                            warn!(status, elapsed_ms, "response with error status");
                        }
                        if options.headers {
                            debug!(headers = ?response.headers(), "response headers");
                        }
                        if options.bodies && !response.body().is_empty() {
                            debug!(
                                body = %preview(response.body(), options.body_limit),
                                "response body"
                            );
                        }
                    }
                    Err(err) => {
                        warn!(error = %err, elapsed_ms, "request failed");
                    }
                }

                result
            }
            .instrument(span),
        )
    }
}

/// Body as text, cut at `limit` bytes.
fn preview(body: &[u8], limit: usize) -> String {
    let shown = body.get(..limit).unwrap_or(body);
    let mut text = String::from_utf8_lossy(shown).into_owned();
    if shown.len() < body.len() {
        let _ = write!(text, "... ({} bytes total)", body.len());
    }
    text
}

/// The request as a single-line `curl` invocation, headers sorted by name.
fn render_curl(request: &Request) -> String {
    let mut command = format!("curl -X {}", request.method());

    let mut headers: Vec<_> = request.headers().iter().collect();
    headers.sort();
    for (name, value) in headers {
        let _ = write!(command, " -H \"{name}: {}\"", value.replace('"', "\\\""));
    }

    if let Some(body) = request.body() {
        let body = String::from_utf8_lossy(body).replace('\'', "'\\''");
        let _ = write!(command, " -d '{body}'");
    }

    let _ = write!(command, " \"{}\"", request.url());
    command
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use bytes::Bytes;
    use tower::ServiceExt;

    use super::*;

    #[derive(Clone)]
    struct Echo;

    impl Service<Request> for Echo {
        type Response = Response;
        type Error = TransportError;
        type Future = Pin<Box<dyn Future<Output = Result<Response, TransportError>> + Send>>;

        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), TransportError>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, request: Request) -> Self::Future {
            let body = request.body().cloned().unwrap_or_default();
            Box::pin(async move { Ok(Response::new(200, HashMap::new(), body)) })
        }
    }

    fn post_request() -> Request {
        let url = url::Url::parse("https://example.com/items?draft=true").expect("valid url");
        Request::builder(http::Method::POST, url)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .body(r#"{"name":"it's"}"#)
            .build()
    }

    #[test]
    fn logging_layer_presets() {
        assert_eq!(LoggingLayer::new().options, LogOptions::summary());
        assert_eq!(LoggingLayer::debug().options, LogOptions::verbose());
        assert_eq!(
            LogOptions::verbose().with_body_limit(10).body_limit,
            10
        );
    }

    #[test]
    fn curl_rendering() {
        insta::assert_snapshot!(
            render_curl(&post_request()),
            @r#"curl -X POST -H "Accept: application/json" -H "Content-Type: application/json" -d '{"name":"it'\''s"}' "https://example.com/items?draft=true""#
        );
    }

    #[test]
    fn preview_truncates() {
        assert_eq!(preview(b"hello", 10), "hello");
        assert_eq!(preview(b"hello world", 5), "hello... (11 bytes total)");
    }

    #[tokio::test]
    async fn logging_passes_response_through() {
        let service = LoggingLayer::debug().layer(Echo);
        let response = service.oneshot(post_request()).await.expect("response");

        assert_eq!(response.status(), 200);
        assert_eq!(response.body(), &Bytes::from(r#"{"name":"it's"}"#));
    }
}
