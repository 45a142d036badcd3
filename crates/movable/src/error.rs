//! Configuration error taxonomy.
//!
//! Every failure mode is caller misconfiguration detected eagerly at
//! preparation time; relocation itself trusts a prepared configuration
//! and has no recoverable error class of its own.

use media::MediaParseError;

/// A subject could not be prepared. The subject is left uninitialized
/// and inert at its original position.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// `target` is required unless the subject is manual.
    #[error("target attribute is required")]
    MissingTarget,

    /// The `target` attribute named an id no element carries.
    #[error("no element with id `{0}` in the document")]
    TargetNotFound(String),

    /// The `to` attribute is neither a keyword nor an integer.
    #[error(
        "attribute `to` must be an integer or one of start, end, before, after, replace, swap (got `{0}`)"
    )]
    InvalidSpecifier(String),

    /// The `media` attribute failed to parse.
    #[error("attribute `media` is invalid: {0}")]
    InvalidMedia(#[from] MediaParseError),

    /// The resolved destination is the subject's own resting position.
    #[error("the element cannot be moved to the same position")]
    SelfPlacement,
}
