//! Prelude module for convenient imports.
//!
//! ```ignore
//! use tether::prelude::*;
//! ```

pub use crate::{
    ApiError, Cancellable, ClassifyPolicy, HyperTransport, Method, NoContent, Observer, Provider,
    Result, StatusCode, StubBehavior, Subscription, Target, Task,
};
pub use bytes::Bytes;
pub use futures_util::StreamExt;
pub use serde::{Deserialize, Serialize};
pub use url::Url;
