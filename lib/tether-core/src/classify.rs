//! Response classification.
//!
//! [`classify`] turns a [`RawOutcome`] into either a decoded value or exactly
//! one [`ApiError`]. It is a pure function of the outcome, the requested type
//! and the [`ClassifyPolicy`]: no I/O, no state, safe to call from anywhere.
//!
//! | Status | Result |
//! |--------|--------|
//! | accepted by the policy, empty body | `NoContent`, otherwise [`ApiError::EmptyValue`] |
//! | accepted by the policy | decoded value, or [`ApiError::Decoding`] |
//! | 400 | [`ApiError::StatusCode`] |
//! | 404 | [`ApiError::CustomServer`] when the body is `{detail, code}`, else [`ApiError::StatusCode`] |
//! | 5xx | [`ApiError::StatusCode`] |
//! | anything else | [`ApiError::UnhandledStatusCode`] |

use std::any::type_name;

use tracing::{debug, warn};

use crate::{ApiError, DecodeError, RawOutcome, Result, ServerErrorBody};

// ============================================================================
// Decodable
// ============================================================================

/// Types a response payload can be classified into.
///
/// Implemented for every [`serde::de::DeserializeOwned`] type (JSON) and for
/// the [`NoContent`] marker.
pub trait Decodable: Sized {
    /// Value to produce for an empty payload, `None` if a payload is required.
    fn when_empty() -> Option<Self> {
        None
    }

    /// Decode a non-empty payload.
    fn decode(body: &[u8]) -> std::result::Result<Self, DecodeError>;
}

impl<T: serde::de::DeserializeOwned> Decodable for T {
    fn decode(body: &[u8]) -> std::result::Result<Self, DecodeError> {
        crate::from_json(body)
    }
}

/// Marker for calls where no value is expected.
///
/// Classifying into `NoContent` succeeds on an accepted status whether or not
/// the server sent a body; the body is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NoContent;

impl Decodable for NoContent {
    fn when_empty() -> Option<Self> {
        Some(Self)
    }

    fn decode(_body: &[u8]) -> std::result::Result<Self, DecodeError> {
        Ok(Self)
    }
}

// ============================================================================
// Policy
// ============================================================================

/// Which status codes count as success.
///
/// 200, 201 and 204 are always accepted. On top of that:
/// - 401 is accepted by [`ClassifyPolicy::standard`] (the default), for APIs
///   that send a regular body with soft authentication failures.
/// - 500 is accepted by [`ClassifyPolicy::allow_500`], for APIs that send a
///   decodable soft-error payload with it.
///
/// # Example
///
/// ```
/// use tether_core::ClassifyPolicy;
///
/// let policy = ClassifyPolicy::strict().with_server_error(true);
/// assert!(policy.accepts(500));
/// assert!(!policy.accepts(401));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassifyPolicy {
    accept_unauthorized: bool,
    accept_server_error: bool,
}

impl ClassifyPolicy {
    /// Accepts 200, 201, 204.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            accept_unauthorized: false,
            accept_server_error: false,
        }
    }

    /// Accepts 200, 201, 204, 401.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            accept_unauthorized: true,
            accept_server_error: false,
        }
    }

    /// Accepts 200, 201, 204, 401, 500.
    #[must_use]
    pub const fn allow_500() -> Self {
        Self {
            accept_unauthorized: true,
            accept_server_error: true,
        }
    }

    /// Set whether 401 is accepted.
    #[must_use]
    pub const fn with_unauthorized(mut self, accept: bool) -> Self {
        self.accept_unauthorized = accept;
        self
    }

    /// Set whether 500 is accepted.
    #[must_use]
    pub const fn with_server_error(mut self, accept: bool) -> Self {
        self.accept_server_error = accept;
        self
    }

    /// Returns `true` if `status` is decoded as a success.
    #[must_use]
    pub const fn accepts(&self, status: u16) -> bool {
        match status {
            200 | 201 | 204 => true,
            401 => self.accept_unauthorized,
            500 => self.accept_server_error,
            _ => false,
        }
    }

    /// Classify `outcome` under this policy.
    pub fn classify<T: Decodable>(&self, outcome: &RawOutcome) -> Result<T> {
        classify(outcome, *self)
    }
}

impl Default for ClassifyPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

// ============================================================================
// Classifier
// ============================================================================

/// Classify a raw outcome into a value of type `T` or an [`ApiError`].
///
/// # Example
///
/// ```
/// use serde::Deserialize;
/// use tether_core::{ApiError, ClassifyPolicy, NoContent, RawOutcome, classify};
///
/// #[derive(Debug, PartialEq, Deserialize)]
/// struct User { id: u32, name: String }
///
/// let outcome = RawOutcome::delivered(200, r#"{"id":1,"name":"A"}"#);
/// let user: User = classify(&outcome, ClassifyPolicy::default()).expect("user");
/// assert_eq!(user, User { id: 1, name: "A".to_string() });
///
/// let outcome = RawOutcome::delivered(204, "");
/// assert_eq!(classify::<NoContent>(&outcome, ClassifyPolicy::default()), Ok(NoContent));
///
/// let outcome = RawOutcome::delivered(404, r#"{"detail":"not found","code":"E404"}"#);
/// assert_eq!(
///     classify::<User>(&outcome, ClassifyPolicy::default()),
///     Err(ApiError::CustomServer { detail: "not found".to_string(), code: "E404".to_string() })
/// );
/// ```
pub fn classify<T: Decodable>(outcome: &RawOutcome, policy: ClassifyPolicy) -> Result<T> {
    let (status, body) = match outcome {
        RawOutcome::Failure(cause) => {
            warn!(error = %cause, "transport failure");
            return Err(ApiError::Transport(cause.clone()));
        }
        RawOutcome::Delivered { status: None, .. } => return Err(ApiError::NoResponse),
        RawOutcome::Delivered {
            status: Some(status),
            body,
        } => (*status, body),
    };

    match status {
        _ if policy.accepts(status) => decode_accepted(body),
        400 => Err(ApiError::StatusCode(400)),
        404 => Err(decode_server_error(body)),
        500..=599 => Err(ApiError::StatusCode(status)),
        _ => Err(ApiError::UnhandledStatusCode(status)),
    }
}

fn decode_accepted<T: Decodable>(body: &[u8]) -> Result<T> {
    if body.is_empty() {
        return T::when_empty().ok_or(ApiError::EmptyValue);
    }

    match T::decode(body) {
        Ok(value) => {
            debug!(
                target_type = type_name::<T>(),
                bytes = body.len(),
                "decode succeeded"
            );
            Ok(value)
        }
        Err(err) => {
            warn!(
                target_type = type_name::<T>(),
                path = %err.path,
                error = %err.message,
                "decode failed"
            );
            Err(ApiError::Decoding(err))
        }
    }
}

/// A 404 body that is not `{detail, code}` degrades to a plain status error.
fn decode_server_error(body: &[u8]) -> ApiError {
    crate::from_json::<ServerErrorBody>(body).map_or(ApiError::StatusCode(404), ApiError::from)
}
