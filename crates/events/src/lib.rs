//! Progress notification infrastructure.
//!
//! - [`ProgressChannel`] -- in-process publish/subscribe register for
//!   [`ProgressEvent`](subline_core::progress::ProgressEvent)s, constructed
//!   once at startup and shared via `Arc<ProgressChannel>`.
//! - [`Subscription`] -- one listener, scoped to a single client connection.

pub mod channel;

pub use channel::{ProgressChannel, Subscription, SubscriptionId};
