//! Responsive relocation of elements within a document tree.
//!
//! A movable subject declares, through attributes, a target element and
//! a placement specifier. While the configured media breakpoint
//! matches, the subject sits at its target-relative position; when it
//! stops matching, the subject returns to the exact spot it came from.
//! A placeholder comment marks that spot, so restoration survives
//! intervening tree changes.
//!
//! The crate splits into three pieces that compose linearly: the
//! placement resolver ([`placement`]), the topology executor
//! ([`topology`], crate-private), and the breakpoint controller
//! ([`registry`]).

pub mod config;
pub mod error;
pub mod events;
pub mod placement;
pub mod registry;
mod topology;

pub use config::{DEFAULT_MEDIA, InitAttributes, MOVABLE_TAG};
pub use error::ConfigError;
pub use placement::{Action, Position, Specifier};
pub use registry::MovableRegistry;
