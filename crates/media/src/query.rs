//! Media query text parsing and evaluation.
//!
//! Supports the feature-query subset the relocation engine needs:
//! an optional media type (`all`, `screen`, ...) and `and`-joined
//! width/height range features, e.g. `(max-width: 768px)` or
//! `screen and (min-width: 480px) and (max-width: 1024px)`.

use crate::viewport::Viewport;
use cssparser::{Parser, ParserInput, Token};
use std::fmt;

type CssError<'i> = cssparser::ParseError<'i, ()>;

/// The query text could not be parsed.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("invalid media query `{query}`: {detail}")]
pub struct MediaParseError {
    pub query: String,
    pub detail: String,
}

/// A single range feature inside a query.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Feature {
    MinWidth(f32),
    MaxWidth(f32),
    Width(f32),
    MinHeight(f32),
    MaxHeight(f32),
    Height(f32),
}

impl Feature {
    fn holds(self, viewport: Viewport) -> bool {
        let width = viewport.width as f32;
        let height = viewport.height as f32;
        match self {
            Self::MinWidth(px) => width >= px,
            Self::MaxWidth(px) => width <= px,
            Self::Width(px) => (width - px).abs() < f32::EPSILON,
            Self::MinHeight(px) => height >= px,
            Self::MaxHeight(px) => height <= px,
            Self::Height(px) => (height - px).abs() < f32::EPSILON,
        }
    }
}

/// A parsed media query.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaQuery {
    raw: String,
    media_type: Option<String>,
    features: Vec<Feature>,
}

impl MediaQuery {
    /// Parse a query from its textual form.
    ///
    /// # Errors
    /// Returns [`MediaParseError`] when the text is not a media type
    /// followed by `and`-joined parenthesized width/height features.
    pub fn parse(text: &str) -> Result<Self, MediaParseError> {
        let trimmed = text.trim();
        let mut input = ParserInput::new(trimmed);
        let mut parser = Parser::new(&mut input);
        match parse_query(&mut parser) {
            Ok((media_type, features)) => Ok(Self {
                raw: trimmed.to_owned(),
                media_type,
                features,
            }),
            Err(err) => Err(MediaParseError {
                query: trimmed.to_owned(),
                detail: format!("{err:?}"),
            }),
        }
    }

    /// Whether the query matches the given viewport.
    pub fn matches(&self, viewport: Viewport) -> bool {
        if let Some(media_type) = &self.media_type
            && media_type != "all"
            && media_type != "screen"
        {
            return false;
        }
        self.features.iter().all(|feature| feature.holds(viewport))
    }

    /// The original query text.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for MediaQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn parse_query<'i>(
    parser: &mut Parser<'i, '_>,
) -> Result<(Option<String>, Vec<Feature>), CssError<'i>> {
    let mut features = Vec::new();
    let media_type = parser
        .try_parse(Parser::expect_ident_cloned)
        .ok()
        .map(|ident| ident.to_ascii_lowercase());
    if media_type.is_some() {
        if parser.is_exhausted() {
            return Ok((media_type, features));
        }
        parser.expect_ident_matching("and")?;
    }
    loop {
        features.push(parse_feature(parser)?);
        if parser.is_exhausted() {
            break;
        }
        parser.expect_ident_matching("and")?;
    }
    Ok((media_type, features))
}

fn parse_feature<'i>(parser: &mut Parser<'i, '_>) -> Result<Feature, CssError<'i>> {
    parser.expect_parenthesis_block()?;
    parser.parse_nested_block(|block| {
        let name = block.expect_ident_cloned()?.to_ascii_lowercase();
        block.expect_colon()?;
        let px = parse_px(block)?;
        match name.as_str() {
            "min-width" => Ok(Feature::MinWidth(px)),
            "max-width" => Ok(Feature::MaxWidth(px)),
            "width" => Ok(Feature::Width(px)),
            "min-height" => Ok(Feature::MinHeight(px)),
            "max-height" => Ok(Feature::MaxHeight(px)),
            "height" => Ok(Feature::Height(px)),
            _ => Err(block.new_custom_error(())),
        }
    })
}

fn parse_px<'i>(block: &mut Parser<'i, '_>) -> Result<f32, CssError<'i>> {
    let token = block.next()?.clone();
    match token {
        Token::Dimension {
            value, ref unit, ..
        } if unit.eq_ignore_ascii_case("px") => Ok(value),
        Token::Number { value, .. } => Ok(value),
        _ => Err(block.new_unexpected_token_error(token)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_width_matches_at_and_below() {
        let query = MediaQuery::parse("(max-width: 768px)").expect("parse");
        assert!(query.matches(Viewport::new(768, 1000)));
        assert!(query.matches(Viewport::new(320, 1000)));
        assert!(!query.matches(Viewport::new(769, 1000)));
    }

    #[test]
    fn chained_features_all_apply() {
        let query =
            MediaQuery::parse("screen and (min-width: 480px) and (max-width: 1024px)")
                .expect("parse");
        assert!(query.matches(Viewport::new(480, 600)));
        assert!(query.matches(Viewport::new(1024, 600)));
        assert!(!query.matches(Viewport::new(479, 600)));
        assert!(!query.matches(Viewport::new(1025, 600)));
    }

    #[test]
    fn bare_media_type_always_matches() {
        let query = MediaQuery::parse("all").expect("parse");
        assert!(query.matches(Viewport::new(1, 1)));
        let print = MediaQuery::parse("print").expect("parse");
        assert!(!print.matches(Viewport::new(1024, 768)));
    }

    #[test]
    fn height_features_evaluate() {
        let query = MediaQuery::parse("(max-height: 400px)").expect("parse");
        assert!(query.matches(Viewport::new(800, 400)));
        assert!(!query.matches(Viewport::new(800, 401)));
    }

    #[test]
    fn unknown_feature_is_an_error() {
        assert!(MediaQuery::parse("(orientation: landscape)").is_err());
        assert!(MediaQuery::parse("(max-width 768px)").is_err());
        assert!(MediaQuery::parse("").is_err());
    }
}
