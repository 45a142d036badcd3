//! Declarative configuration surface: attributes read off the subject.

use crate::error::ConfigError;
use crate::placement::Specifier;
use dom::{Document, NodeId};
use media::MediaQuery;

/// Tag name the document registry treats as a movable subject.
pub const MOVABLE_TAG: &str = "movable-element";

/// Breakpoint used when no `media` attribute is supplied.
pub const DEFAULT_MEDIA: &str = "(max-width: 768px)";

pub const ATTR_TARGET: &str = "target";
pub const ATTR_MEDIA: &str = "media";
pub const ATTR_TO: &str = "to";
pub const ATTR_MANUAL: &str = "manual";

/// Programmatic initialization values. Attributes already present on
/// the subject persist; `init` only has an effect on an uninitialized
/// subject, where these values are written through to the attributes.
#[derive(Debug, Clone)]
pub struct InitAttributes {
    pub target_id: Option<String>,
    pub media: Option<String>,
    pub to: Option<String>,
    pub manual: bool,
}

impl Default for InitAttributes {
    fn default() -> Self {
        Self {
            target_id: None,
            media: None,
            to: None,
            manual: true,
        }
    }
}

/// Validated configuration of a ready subject.
#[derive(Debug, Clone)]
pub(crate) struct SubjectConfig {
    pub target: NodeId,
    pub query: MediaQuery,
    pub to: Specifier,
}

/// Outcome of reading the attribute surface.
pub(crate) enum Prepared {
    /// Manual subject without a target: inert until `init` supplies one.
    Inert,
    Ready {
        manual: bool,
        config: SubjectConfig,
    },
}

/// Read and validate the subject's attributes.
///
/// # Errors
/// Any [`ConfigError`] is fatal to preparation; the subject stays
/// uninitialized.
pub(crate) fn read_config(doc: &Document, subject: NodeId) -> Result<Prepared, ConfigError> {
    let manual = doc.has_attribute(subject, ATTR_MANUAL);
    let target_id = doc
        .attribute(subject, ATTR_TARGET)
        .map(str::trim)
        .filter(|id| !id.is_empty());

    let Some(target_id) = target_id else {
        return if manual {
            Ok(Prepared::Inert)
        } else {
            Err(ConfigError::MissingTarget)
        };
    };

    let target = doc
        .element_by_id(target_id)
        .ok_or_else(|| ConfigError::TargetNotFound(target_id.to_owned()))?;

    let media_text = doc
        .attribute(subject, ATTR_MEDIA)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .unwrap_or(DEFAULT_MEDIA);
    let query = MediaQuery::parse(media_text)?;

    let to = doc
        .attribute(subject, ATTR_TO)
        .map_or("end", str::trim)
        .parse()?;

    Ok(Prepared::Ready {
        manual,
        config: SubjectConfig { target, query, to },
    })
}
