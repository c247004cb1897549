//! API endpoint descriptors.
//!
//! A [`Target`] describes one endpoint: where it lives, which method it uses
//! and how its parameters travel ([`Task`]).
//!
//! # Example
//!
//! ```
//! use tether_core::{Target, Task, TransportError};
//! use http::Method;
//! use url::Url;
//!
//! enum GitHub {
//!     User { login: String },
//!     Search { q: String },
//! }
//!
//! impl Target for GitHub {
//!     fn base_url(&self) -> Url {
//!         Url::parse("https://api.github.com").expect("static URL")
//!     }
//!
//!     fn path(&self) -> String {
//!         match self {
//!             Self::User { login } => format!("/users/{login}"),
//!             Self::Search { .. } => "/search/repositories".to_string(),
//!         }
//!     }
//!
//!     fn method(&self) -> Method {
//!         Method::GET
//!     }
//!
//!     fn task(&self) -> Result<Task, TransportError> {
//!         match self {
//!             Self::User { .. } => Ok(Task::Plain),
//!             Self::Search { q } => Task::query(&[("q", q)]),
//!         }
//!     }
//! }
//! ```

use bytes::Bytes;
use http::Method;
use url::Url;

use crate::{ContentType, TransportError};

/// How a request carries its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Task {
    /// No body, no query.
    #[default]
    Plain,
    /// Raw body.
    Data {
        /// Body bytes.
        body: Bytes,
        /// Sent as `Content-Type`.
        content_type: ContentType,
    },
    /// JSON body.
    Json(Bytes),
    /// Form URL-encoded body.
    Form(Bytes),
    /// Query parameters.
    Query(Vec<(String, String)>),
    /// JSON body and query parameters.
    JsonWithQuery {
        /// JSON body.
        body: Bytes,
        /// Query parameters.
        query: Vec<(String, String)>,
    },
}

impl Task {
    /// JSON-encode `value` as the body.
    pub fn json<T: serde::Serialize>(value: &T) -> Result<Self, TransportError> {
        Ok(Self::Json(crate::to_json(value)?))
    }

    /// Form-encode `value` as the body.
    pub fn form<T: serde::Serialize>(value: &T) -> Result<Self, TransportError> {
        Ok(Self::Form(crate::to_form(value)?))
    }

    /// Encode `value` as query parameters.
    pub fn query<T: serde::Serialize>(value: &T) -> Result<Self, TransportError> {
        Ok(Self::Query(crate::to_query_pairs(value)?))
    }

    /// JSON-encode `body` and encode `query` as query parameters.
    pub fn json_with_query<B, Q>(body: &B, query: &Q) -> Result<Self, TransportError>
    where
        B: serde::Serialize,
        Q: serde::Serialize,
    {
        Ok(Self::JsonWithQuery {
            body: crate::to_json(body)?,
            query: crate::to_query_pairs(query)?,
        })
    }

    /// Body and its content type, if the task has one.
    #[must_use]
    pub fn body(&self) -> Option<(&Bytes, ContentType)> {
        match self {
            Self::Plain | Self::Query(_) => None,
            Self::Data { body, content_type } => Some((body, *content_type)),
            Self::Json(body) | Self::JsonWithQuery { body, .. } => Some((body, ContentType::Json)),
            Self::Form(body) => Some((body, ContentType::FormUrlEncoded)),
        }
    }

    /// Query parameters of the task.
    #[must_use]
    pub fn query_pairs(&self) -> &[(String, String)] {
        match self {
            Self::Query(query) | Self::JsonWithQuery { query, .. } => query,
            _ => &[],
        }
    }
}

/// Descriptor of one API endpoint.
pub trait Target: Send + Sync {
    /// Base URL of the API.
    fn base_url(&self) -> Url;

    /// Path appended to [`Target::base_url`]. Empty means the base URL itself.
    fn path(&self) -> String;

    /// HTTP method.
    fn method(&self) -> Method;

    /// Parameters of the request.
    fn task(&self) -> Result<Task, TransportError> {
        Ok(Task::Plain)
    }

    /// Headers of this endpoint, overriding the provider defaults.
    fn headers(&self) -> Vec<(String, String)> {
        Vec::new()
    }

    /// Canned payload used when the provider is stubbed.
    fn sample_data(&self) -> Bytes {
        Bytes::new()
    }

    /// Identity of the logical endpoint, used to space out successive calls.
    fn endpoint_key(&self) -> String {
        format!("{} {}", self.method(), self.path())
    }
}
