//! Body encoding for tasks and path-aware JSON decoding for responses.

use bytes::Bytes;

use crate::{DecodeError, TransportError};

/// Content type of an outgoing body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// `application/json`
    Json,
    /// `application/x-www-form-urlencoded`
    FormUrlEncoded,
    /// `text/plain`
    PlainText,
    /// `application/octet-stream`
    OctetStream,
}

impl ContentType {
    /// MIME type string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::FormUrlEncoded => "application/x-www-form-urlencoded",
            Self::PlainText => "text/plain",
            Self::OctetStream => "application/octet-stream",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encode a value as a JSON body.
///
/// # Errors
///
/// Returns [`TransportError::Encoding`] if serialization fails.
pub fn to_json<T: serde::Serialize>(value: &T) -> Result<Bytes, TransportError> {
    Ok(Bytes::from(serde_json::to_vec(value)?))
}

/// Encode a value as a form URL-encoded body.
///
/// Sequences become repeated keys (`tags=a&tags=b`).
///
/// # Errors
///
/// Returns [`TransportError::Encoding`] if serialization fails.
///
/// # Example
///
/// ```
/// use tether_core::to_form;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Login { username: String, password: String }
///
/// let login = Login { username: "alice".to_string(), password: "secret".to_string() };
/// let bytes = to_form(&login).expect("serialize");
/// assert_eq!(bytes.as_ref(), b"username=alice&password=secret");
/// ```
pub fn to_form<T: serde::Serialize>(value: &T) -> Result<Bytes, TransportError> {
    Ok(Bytes::from(serde_html_form::to_string(value)?.into_bytes()))
}

/// Encode a value as ordered query pairs.
///
/// # Errors
///
/// Returns [`TransportError::Encoding`] if serialization fails.
pub fn to_query_pairs<T: serde::Serialize>(
    value: &T,
) -> Result<Vec<(String, String)>, TransportError> {
    let encoded = serde_html_form::to_string(value)?;
    Ok(url::form_urlencoded::parse(encoded.as_bytes())
        .into_owned()
        .collect())
}

/// Decode JSON bytes, reporting the path of the first failing field.
///
/// # Errors
///
/// Returns a [`DecodeError`] whose `path` points at the offending field
/// (e.g. `user.address.city`); the path is `.` for syntax errors.
///
/// # Example
///
/// ```
/// use tether_core::from_json;
/// use serde::Deserialize;
///
/// #[derive(Debug, PartialEq, Deserialize)]
/// struct User { name: String }
///
/// let user: User = from_json(br#"{"name":"Alice"}"#).expect("deserialize");
/// assert_eq!(user, User { name: "Alice".to_string() });
/// ```
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T, DecodeError> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    let value: T = serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|e| DecodeError::new(e.path().to_string(), e.inner().to_string()))?;
    // Reject trailing garbage such as `{"id":1} junk`.
    deserializer
        .end()
        .map_err(|e| DecodeError::new(".", e.to_string()))?;
    Ok(value)
}
