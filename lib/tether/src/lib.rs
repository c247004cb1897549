//! Status-aware HTTP provider.
//!
//! Describe endpoints as [`Target`]s, hand them to a [`Provider`] and get back
//! a typed value or an [`ApiError`] that says which of the HTTP failure modes
//! happened: transport, missing response, error status, server error body,
//! decoding.
//!
//! # Example
//!
//! ```ignore
//! use tether::prelude::*;
//!
//! #[derive(Debug, Deserialize)]
//! pub struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! pub enum GitHub {
//!     User(String),
//! }
//!
//! impl Target for GitHub {
//!     fn base_url(&self) -> Url {
//!         Url::parse("https://api.github.com").expect("valid URL")
//!     }
//!
//!     fn path(&self) -> String {
//!         match self {
//!             Self::User(login) => format!("/users/{login}"),
//!         }
//!     }
//!
//!     fn method(&self) -> Method {
//!         Method::GET
//!     }
//! }
//!
//! let provider = Provider::<GitHub>::new();
//! let user: User = provider.request(&GitHub::User("octocat".into())).await?;
//! ```
//!
//! # Delivery
//!
//! The classified result is available as a future ([`Provider::request`]),
//! through a completion callback ([`Provider::request_callback`]), as a
//! stream ([`Provider::request_stream`], [`Provider::results`],
//! [`Provider::values`]) or pushed to an [`Observer`]
//! ([`Provider::subscribe`]).
//!
//! # Logging
//!
//! Everything is reported through `tracing`. Install a subscriber to see it,
//! and add [`middleware::LoggingLayer`] to the transport for per-request
//! network logs.

pub mod adapters;
mod config;
mod gate;
pub mod middleware;
pub mod prelude;
mod provider;
mod stub;
#[cfg(test)]
mod testing;
mod transport;

pub use adapters::{Cancellable, Observer, Subscription, observe};
pub use config::{ClientConfig, ClientConfigBuilder, ProviderConfig, ProviderConfigBuilder};
pub use gate::ThrottleGate;
pub use provider::Provider;
pub use stub::StubBehavior;
pub use transport::{BoxedService, HyperTransport, HyperTransportBuilder, ServiceFuture};

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use tether_core::{
    ApiError, ClassifyPolicy, ContentType, DecodeError, Decodable, DefaultHeaders, NoContent,
    RawOutcome, Request, RequestBuilder, Response, Result, ServerErrorBody, Target, Task,
    Transport, TransportError, classify,
};

// Re-export http types for methods, status codes and headers
pub use tether_core::{Method, StatusCode, header};

// Re-export crates used in target definitions
pub use bytes;
pub use url;
