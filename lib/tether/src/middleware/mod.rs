//! Tower middleware layers (plugins) for the tether transport.
//!
//! Layers wrap [`crate::HyperTransport`] through
//! [`crate::HyperTransportBuilder::layer`] and see every [`crate::Request`]
//! before it reaches the network. They never classify responses: a 404 is
//! still a successful exchange at this level.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `middleware-logging` | `.with_logging()` / `.with_debug_logging()` helpers |
//! | `middleware-access-token` | `.with_access_token()` helper |
//!
//! The layers themselves are always available.
//!
//! # Available Layers
//!
//! - [`LoggingLayer`] - Logs requests/responses using `tracing`
//! - [`AccessTokenLayer`] - Adds `Authorization: <scheme> <token>`
//! - [`ConcurrencyLimitLayer`] - Limits concurrent requests (tower)

mod access_token;
mod logging;

pub use access_token::{AccessToken, AccessTokenLayer, AuthorizationType};
pub use logging::{LogOptions, Logging, LoggingLayer};

// Re-export tower types for convenience
pub use tower::limit::ConcurrencyLimitLayer;
pub use tower::{Layer, ServiceBuilder};
