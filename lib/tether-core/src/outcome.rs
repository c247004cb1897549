//! What a single network attempt produced, before classification.

use bytes::Bytes;

use crate::{Response, TransportError};

/// Raw result of one dispatch.
///
/// Produced once per call by the provider and consumed by [`crate::classify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawOutcome {
    /// No response was received.
    Failure(TransportError),
    /// A response was received.
    Delivered {
        /// Status code, `None` when the response carried no valid status.
        status: Option<u16>,
        /// Payload, possibly empty.
        body: Bytes,
    },
}

impl RawOutcome {
    /// A delivered response.
    ///
    /// Codes outside `100..=999` are not valid HTTP status codes and are
    /// recorded as missing.
    #[must_use]
    pub fn delivered(status: u16, body: impl Into<Bytes>) -> Self {
        Self::Delivered {
            status: http::StatusCode::from_u16(status)
                .ok()
                .map(|s| s.as_u16()),
            body: body.into(),
        }
    }

    /// A delivered response without status code.
    #[must_use]
    pub fn without_status(body: impl Into<Bytes>) -> Self {
        Self::Delivered {
            status: None,
            body: body.into(),
        }
    }

    /// A transport-level failure.
    #[must_use]
    pub const fn failure(cause: TransportError) -> Self {
        Self::Failure(cause)
    }

    /// Status code, if a response with a valid status was delivered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Delivered { status, .. } => *status,
            Self::Failure(_) => None,
        }
    }

    /// Payload, if a response was delivered.
    #[must_use]
    pub const fn body(&self) -> Option<&Bytes> {
        match self {
            Self::Delivered { body, .. } => Some(body),
            Self::Failure(_) => None,
        }
    }
}

impl From<Response> for RawOutcome {
    fn from(response: Response) -> Self {
        let (status, _, body) = response.into_parts();
        Self::delivered(status, body)
    }
}

impl From<TransportError> for RawOutcome {
    fn from(cause: TransportError) -> Self {
        Self::Failure(cause)
    }
}

impl From<Result<Response, TransportError>> for RawOutcome {
    fn from(result: Result<Response, TransportError>) -> Self {
        match result {
            Ok(response) => Self::from(response),
            Err(cause) => Self::Failure(cause),
        }
    }
}
