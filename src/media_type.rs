//! Media-range and `Accept` media-type grammars.
//!
//! A [`MediaRange`] is the `type "/" subtype *( ";" parameter )` pattern used
//! both for offered representations and inside `Accept` header entries. An
//! [`AcceptItem`] additionally carries the q-factor and any accept-extension
//! parameters that follow it.

use std::{fmt, str};

use crate::{error::ParseError, quality::Quality};

/// RFC 2616 token: any ASCII character except CTLs and separators.
fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.bytes().all(|c| {
            matches!(c, 33..=126) && !b"()<>@,;:\\\"/[]?={}".contains(&c)
        })
}

fn split_param(segment: &str) -> Result<(String, String), ParseError> {
    let (key, value) = segment.split_once('=').ok_or(ParseError::MediaType)?;
    let key = key.trim().to_ascii_lowercase();

    if !is_token(&key) {
        return Err(ParseError::MediaType);
    }

    Ok((key, value.trim().to_owned()))
}

/// An HTTP media-range: `type/subtype` plus ordered parameters.
///
/// Type, subtype, and parameter keys are case-folded to lowercase on parse;
/// parameter values are kept as written. A wildcard type forces a wildcard
/// subtype (`*/html` is malformed).
///
/// # Examples
/// ```
/// use conneg::MediaRange;
///
/// let range: MediaRange = "text/HTML; Level=1".parse().unwrap();
/// assert_eq!(range.type_(), "text");
/// assert_eq!(range.subtype(), "html");
/// assert_eq!(range.param("level"), Some("1"));
/// assert_eq!(range.to_string(), "text/html; level=1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRange {
    type_: String,
    subtype: String,
    parameters: Vec<(String, String)>,
}

impl MediaRange {
    /// Constructs a parameter-less range, validating both tokens.
    pub fn new(type_: &str, subtype: &str) -> Result<MediaRange, ParseError> {
        if !is_token(type_) || !is_token(subtype) {
            return Err(ParseError::MediaType);
        }

        let type_ = type_.to_ascii_lowercase();
        let subtype = subtype.to_ascii_lowercase();

        if type_ == "*" && subtype != "*" {
            return Err(ParseError::MediaType);
        }

        Ok(MediaRange {
            type_,
            subtype,
            parameters: Vec::new(),
        })
    }

    /// The (lowercased) top-level type, possibly `*`.
    pub fn type_(&self) -> &str {
        &self.type_
    }

    /// The (lowercased) subtype, possibly `*`.
    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    /// Parameters in their original order.
    pub fn parameters(&self) -> &[(String, String)] {
        &self.parameters
    }

    /// Returns the value of the first parameter with this (lowercase) key.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn parse_range_segment(segment: &str) -> Result<MediaRange, ParseError> {
        let (type_, subtype) = segment
            .trim()
            .split_once('/')
            .ok_or(ParseError::MediaType)?;

        MediaRange::new(type_, subtype)
    }
}

impl str::FromStr for MediaRange {
    type Err = ParseError;

    fn from_str(snippet: &str) -> Result<Self, Self::Err> {
        let mut segments = snippet.split(';');

        // split always yields at least one segment
        let mut range = MediaRange::parse_range_segment(segments.next().unwrap_or(""))?;

        for segment in segments {
            range.parameters.push(split_param(segment)?);
        }

        Ok(range)
    }
}

impl fmt::Display for MediaRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.type_, self.subtype)?;

        for (key, value) in &self.parameters {
            write!(f, "; {}={}", key, value)?;
        }

        Ok(())
    }
}

/// A single parsed `Accept` header entry: a media-range, its q-factor, and
/// the accept-extension parameters that followed the q-factor.
///
/// The first `q` parameter terminates the media-range parameters; every later
/// parameter — including a repeated `q` — is an accept-extension entry, never
/// a quality override. Extensions without a value carry `None`.
///
/// # Examples
/// ```
/// use conneg::{q, AcceptItem};
///
/// let item: AcceptItem = "text/html; level=1; q=0.5; extended; q=0.8".parse().unwrap();
/// assert_eq!(item.range().param("level"), Some("1"));
/// assert_eq!(item.quality(), q(0.5));
/// assert_eq!(
///     item.extensions(),
///     &[("extended".to_owned(), None), ("q".to_owned(), Some("0.8".to_owned()))],
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptItem {
    range: MediaRange,
    quality: Quality,
    extensions: Vec<(String, Option<String>)>,
}

impl AcceptItem {
    /// Wraps a media-range with maximum quality and no extensions.
    pub fn max(range: MediaRange) -> AcceptItem {
        AcceptItem {
            range,
            quality: Quality::MAX,
            extensions: Vec::new(),
        }
    }

    /// The media-range part of the entry.
    pub fn range(&self) -> &MediaRange {
        &self.range
    }

    /// The q-factor; defaults to 1 when the entry had none.
    pub fn quality(&self) -> Quality {
        self.quality
    }

    /// Accept-extension parameters, in order; a bare token carries `None`.
    pub fn extensions(&self) -> &[(String, Option<String>)] {
        &self.extensions
    }
}

impl str::FromStr for AcceptItem {
    type Err = ParseError;

    fn from_str(snippet: &str) -> Result<Self, Self::Err> {
        let mut segments = snippet.split(';');

        let mut range = MediaRange::parse_range_segment(segments.next().unwrap_or(""))?;
        let mut quality = None;
        let mut extensions = Vec::new();

        for segment in segments {
            if quality.is_some() {
                // past the q parameter everything is an accept-extension and
                // a value is optional
                let (key, value) = match segment.split_once('=') {
                    Some((key, value)) => {
                        (key.trim().to_ascii_lowercase(), Some(value.trim().to_owned()))
                    }
                    None => (segment.trim().to_ascii_lowercase(), None),
                };

                if !is_token(&key) {
                    return Err(ParseError::MediaType);
                }

                extensions.push((key, value));
            } else {
                let (key, value) = split_param(segment)?;

                if key == "q" {
                    quality = Some(value.parse::<Quality>()?);
                } else {
                    range.parameters.push((key, value));
                }
            }
        }

        Ok(AcceptItem {
            range,
            quality: quality.unwrap_or(Quality::MAX),
            extensions,
        })
    }
}

impl fmt::Display for AcceptItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.range, f)?;

        if self.quality != Quality::MAX || !self.extensions.is_empty() {
            write!(f, "; q={}", self.quality)?;
        }

        for (key, value) in &self.extensions {
            match value {
                Some(value) => write!(f, "; {}={}", key, value)?,
                None => write!(f, "; {}", key)?,
            }
        }

        Ok(())
    }
}

/// Parses a raw `Accept` header into its entries, in header order.
///
/// Framing rules match [`parse_quality_list`](crate::parse_quality_list):
/// empty string → empty list, blank or empty entries → [`ParseError::Header`];
/// each entry must then satisfy the media-type grammar.
pub fn parse_accept(raw: &str) -> Result<Vec<AcceptItem>, ParseError> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }

    if raw.trim().is_empty() {
        return Err(ParseError::Header);
    }

    let mut items = Vec::new();

    for entry in raw.split(',') {
        let entry = entry.trim();

        if entry.is_empty() {
            return Err(ParseError::Header);
        }

        items.push(entry.parse()?);
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::q;

    #[test]
    fn range_basics() {
        let range: MediaRange = "application/json".parse().unwrap();
        assert_eq!(range.type_(), "application");
        assert_eq!(range.subtype(), "json");
        assert!(range.parameters().is_empty());

        let range: MediaRange = "*/*".parse().unwrap();
        assert_eq!(range.type_(), "*");
        assert_eq!(range.subtype(), "*");

        let range: MediaRange = "text/*".parse().unwrap();
        assert_eq!(range.subtype(), "*");
    }

    #[test]
    fn range_case_folding() {
        let range: MediaRange = "Text/HTML; Charset=UTF-8".parse().unwrap();
        assert_eq!(range.type_(), "text");
        assert_eq!(range.subtype(), "html");
        // keys fold, values do not
        assert_eq!(range.param("charset"), Some("UTF-8"));
    }

    #[test]
    fn range_rejects_malformed() {
        assert!("text".parse::<MediaRange>().is_err());
        assert!("/html".parse::<MediaRange>().is_err());
        assert!("text/".parse::<MediaRange>().is_err());
        assert!("te xt/html".parse::<MediaRange>().is_err());
        assert!("text/html; level".parse::<MediaRange>().is_err());
        assert!("".parse::<MediaRange>().is_err());

        // wildcard type requires wildcard subtype
        assert!("*/html".parse::<MediaRange>().is_err());
    }

    #[test]
    fn q_switches_to_extensions() {
        let item: AcceptItem = "text/html;level=1;q=0.5;a=1;b;q=0.9".parse().unwrap();

        assert_eq!(item.range().parameters(), &[("level".to_owned(), "1".to_owned())]);
        assert_eq!(item.quality(), q(0.5));
        assert_eq!(
            item.extensions(),
            &[
                ("a".to_owned(), Some("1".to_owned())),
                ("b".to_owned(), None),
                // a repeated q is an extension, not an override
                ("q".to_owned(), Some("0.9".to_owned())),
            ],
        );
    }

    #[test]
    fn item_without_q() {
        let item: AcceptItem = "text/html; level=2".parse().unwrap();
        assert_eq!(item.quality(), Quality::MAX);
        assert!(item.extensions().is_empty());
        assert_eq!(item.range().param("level"), Some("2"));
    }

    #[test]
    fn bad_quality_is_its_own_error() {
        assert_eq!(
            "text/html;q=boo".parse::<AcceptItem>().unwrap_err(),
            ParseError::Quality,
        );
        assert_eq!(
            "text/html;q=1.5".parse::<AcceptItem>().unwrap_err(),
            ParseError::Quality,
        );
    }

    #[test]
    fn valueless_parameter_before_q_is_malformed() {
        assert_eq!(
            "text/html;level;q=1".parse::<AcceptItem>().unwrap_err(),
            ParseError::MediaType,
        );
    }

    #[test]
    fn display_round_trip() {
        for raw in [
            "text/html",
            "text/html; level=1",
            "text/html; level=1; q=0.5",
            "text/html; q=0.5; ext=1; bare",
            "*/*; q=0.8",
        ] {
            let item: AcceptItem = raw.parse().unwrap();
            assert_eq!(item.to_string(), raw);
        }
    }

    #[test]
    fn accept_header_framing() {
        assert_eq!(parse_accept("").unwrap(), vec![]);
        assert!(parse_accept("  ").is_err());
        assert!(parse_accept("text/html,,text/plain").is_err());

        let items = parse_accept("audio/*; q=0.2, audio/basic").unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].range().subtype(), "*");
        assert_eq!(items[0].quality(), q(0.2));
        assert_eq!(items[1].range().subtype(), "basic");
        assert_eq!(items[1].quality(), Quality::MAX);
    }
}
