//! Prelude module for convenient imports.
//!
//! ```ignore
//! use tether_core::prelude::*;
//! ```

pub use crate::{
    ApiError, ClassifyPolicy, ContentType, Decodable, DefaultHeaders, Method, NoContent,
    RawOutcome, Request, Response, Result, Target, Task, Transport, TransportError, classify,
};
