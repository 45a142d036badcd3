//! Media-query breakpoints for the relocation engine.
//!
//! A [`MediaQuery`] is parsed once from its textual form and evaluated
//! against a [`Viewport`]. The [`MediaHub`] owns live watch
//! subscriptions: each watch carries the last match state it delivered,
//! and a viewport change reports exactly the watches whose state
//! flipped. Cancellation is explicit via [`MediaHub::unwatch`]; a
//! cancelled watch never reports again.

pub mod hub;
pub mod query;
pub mod viewport;

pub use hub::{MediaChange, MediaHub, WatchId};
pub use query::{MediaParseError, MediaQuery};
pub use viewport::Viewport;
