//! Core types and response classification for tether.
//!
//! This crate has no I/O. It provides:
//! - [`Target`] and [`Task`] - API endpoint descriptors
//! - [`Request`], [`RequestBuilder`] and [`DefaultHeaders`] - request building
//! - [`Response`] and [`RawOutcome`] - what a dispatch produced
//! - [`classify`] and [`ClassifyPolicy`] - turning an outcome into a typed result
//! - [`ApiError`], [`TransportError`] and [`DecodeError`] - the error taxonomy
//! - [`Transport`] - the dispatch primitive implemented by HTTP stacks

mod body;
mod classify;
mod error;
mod headers;
mod outcome;
pub mod prelude;
mod request;
mod response;
mod target;
mod transport;

pub use body::{ContentType, from_json, to_form, to_json, to_query_pairs};
pub use classify::{ClassifyPolicy, Decodable, NoContent, classify};
pub use error::{ApiError, DecodeError, Result, ServerErrorBody, TransportError};
pub use headers::DefaultHeaders;
pub use outcome::RawOutcome;
pub use request::{Request, RequestBuilder};
pub use response::Response;
pub use target::{Target, Task};
pub use transport::Transport;

// Re-export http crate types for methods, status codes and headers
pub use http::{Method, StatusCode, header};
