//! Delivery adapters.
//!
//! The same classified result can be delivered four ways:
//!
//! | Style | Entry point | Handle |
//! |-------|-------------|--------|
//! | future | [`Provider::request`](crate::Provider::request) | the future itself |
//! | callback | [`Provider::request_callback`](crate::Provider::request_callback) | [`Cancellable`] |
//! | stream | [`Provider::request_stream`](crate::Provider::request_stream), [`Provider::results`](crate::Provider::results), [`Provider::values`](crate::Provider::values) | the stream |
//! | observer | [`Provider::subscribe`](crate::Provider::subscribe), [`observe`] | [`Subscription`] |
//!
//! Adapters never classify on their own: every one of them goes through
//! [`tether_core::classify`], so a given outcome yields the same result in
//! every style.

mod callback;
mod observer;
mod stream;

pub use callback::Cancellable;
pub use observer::{Observer, Subscription, observe};
pub use stream::{classify_results, classify_values, until_error};
