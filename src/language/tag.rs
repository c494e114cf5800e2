//! Structural Language-Tag grammar per [RFC 5646 §2.1].
//!
//! Validation is structural only: subtags are checked against the ABNF
//! shapes and uniqueness rules, not against the IANA subtag registry.
//!
//! [RFC 5646 §2.1]: https://datatracker.ietf.org/doc/html/rfc5646#section-2.1

use std::{fmt, str};

use crate::error::TagError;

/// The fixed table of legacy registrations. These are complete tags, not
/// instances of the regular grammar, and are rejected by the parser.
const GRANDFATHERED: &[&str] = &[
    "art-lojban",
    "cel-gaulish",
    "en-gb-oed",
    "i-ami",
    "i-bnn",
    "i-default",
    "i-enochian",
    "i-hak",
    "i-klingon",
    "i-lux",
    "i-mingo",
    "i-navajo",
    "i-pwn",
    "i-tao",
    "i-tay",
    "i-tsu",
    "no-bok",
    "no-nyn",
    "sgn-be-fr",
    "sgn-be-nl",
    "sgn-ch-de",
    "zh-guoyu",
    "zh-hakka",
    "zh-min",
    "zh-min-nan",
    "zh-xiang",
];

fn is_alpha(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|c| c.is_ascii_alphabetic())
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|c| c.is_ascii_digit())
}

fn is_alnum(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|c| c.is_ascii_alphanumeric())
}

/// `5*8alphanum`, or `DIGIT 3alphanum`.
fn is_variant(s: &str) -> bool {
    (s.len() >= 5 && s.len() <= 8 && is_alnum(s))
        || (s.len() == 4 && s.as_bytes()[0].is_ascii_digit() && is_alnum(s))
}

fn titlecase(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut bytes = s.bytes();

    if let Some(first) = bytes.next() {
        out.push(first.to_ascii_uppercase() as char);
    }

    out.extend(bytes.map(|c| c.to_ascii_lowercase() as char));
    out
}

/// A validated, immutable RFC 5646 Language-Tag.
///
/// Subtag casing is normalized on parse: lowercase throughout except the
/// script (`Latn`) and region (`DE`) conventions. The canonical string is
/// built once and kept with the tag; [`Display`](fmt::Display) and the
/// matching operations work from it.
///
/// # Examples
/// ```
/// use conneg::LanguageTag;
///
/// let tag: LanguageTag = "SL-LATN-ROZAJ".parse().unwrap();
/// assert_eq!(tag.primary(), "sl");
/// assert_eq!(tag.script(), Some("Latn"));
/// assert_eq!(tag.variants(), ["rozaj"]);
/// assert_eq!(tag.to_string(), "sl-Latn-rozaj");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageTag {
    primary: String,
    extlang: Vec<String>,
    script: Option<String>,
    region: Option<String>,
    variants: Vec<String>,
    extensions: Vec<(char, Vec<String>)>,
    private_use: Vec<String>,
    canonical: String,
}

impl LanguageTag {
    /// Parses and validates a Language-Tag.
    ///
    /// Grandfathered tags and private-use-only (`x-...`) tags are not regular
    /// Language-Tags and fail with their own [`TagError`] variants; use
    /// [`extract`](Self::extract) when probing candidate strings cheaply.
    pub fn parse(tag: &str) -> Result<LanguageTag, TagError> {
        if GRANDFATHERED.contains(&tag.to_ascii_lowercase().as_str()) {
            return Err(TagError::Grandfathered);
        }

        let subtags: Vec<&str> = tag.split('-').collect();
        let mut cursor = 0;

        let first = subtags[0];

        if first.eq_ignore_ascii_case("x") {
            return Err(TagError::PrivateUse);
        }

        if first.len() < 2 || first.len() > 8 || !is_alpha(first) {
            return Err(TagError::Malformed);
        }

        let primary = first.to_ascii_lowercase();
        cursor += 1;

        // extlang is only reachable behind a 2-3 letter primary
        let mut extlang = Vec::new();

        if primary.len() <= 3 {
            while cursor < subtags.len()
                && extlang.len() < 3
                && subtags[cursor].len() == 3
                && is_alpha(subtags[cursor])
            {
                extlang.push(subtags[cursor].to_ascii_lowercase());
                cursor += 1;
            }
        }

        let mut script = None;

        if cursor < subtags.len() && subtags[cursor].len() == 4 && is_alpha(subtags[cursor]) {
            script = Some(titlecase(subtags[cursor]));
            cursor += 1;
        }

        let mut region = None;

        if cursor < subtags.len() {
            let subtag = subtags[cursor];

            if (subtag.len() == 2 && is_alpha(subtag)) || (subtag.len() == 3 && is_digits(subtag)) {
                region = Some(subtag.to_ascii_uppercase());
                cursor += 1;
            }
        }

        let mut variants: Vec<String> = Vec::new();

        while cursor < subtags.len() && is_variant(subtags[cursor]) {
            let variant = subtags[cursor].to_ascii_lowercase();

            if variants.contains(&variant) {
                return Err(TagError::DuplicateVariant(variant));
            }

            variants.push(variant);
            cursor += 1;
        }

        // everything left is singleton-extension groups and the x tail
        let mut extensions: Vec<(char, Vec<String>)> = Vec::new();
        let mut private_use: Vec<String> = Vec::new();

        while cursor < subtags.len() {
            let subtag = subtags[cursor];

            if subtag.len() != 1 || !subtag.as_bytes()[0].is_ascii_alphanumeric() {
                return Err(TagError::Malformed);
            }

            let singleton = subtag.as_bytes()[0].to_ascii_lowercase() as char;
            cursor += 1;

            if singleton == 'x' {
                // private-use tail; grouping stops here
                while cursor < subtags.len() {
                    let subtag = subtags[cursor];

                    if subtag.len() > 8 || !is_alnum(subtag) {
                        return Err(TagError::Malformed);
                    }

                    private_use.push(subtag.to_ascii_lowercase());
                    cursor += 1;
                }

                if private_use.is_empty() {
                    return Err(TagError::Malformed);
                }

                break;
            }

            if extensions.iter().any(|(existing, _)| *existing == singleton) {
                return Err(TagError::DuplicateSingleton(singleton));
            }

            let mut group = Vec::new();

            while cursor < subtags.len()
                && subtags[cursor].len() >= 2
                && subtags[cursor].len() <= 8
                && is_alnum(subtags[cursor])
            {
                group.push(subtags[cursor].to_ascii_lowercase());
                cursor += 1;
            }

            if group.is_empty() {
                return Err(TagError::Malformed);
            }

            extensions.push((singleton, group));
        }

        let canonical = compose(
            Some(&primary),
            &extlang,
            script.as_deref(),
            region.as_deref(),
            &variants,
            &extensions,
            &private_use,
        );

        Ok(LanguageTag {
            primary,
            extlang,
            script,
            region,
            variants,
            extensions,
            private_use,
            canonical,
        })
    }

    /// Probes a candidate string, yielding `None` for anything that is not a
    /// regular Language-Tag (malformed, grandfathered, or private-use-only).
    pub fn extract(tag: &str) -> Option<LanguageTag> {
        LanguageTag::parse(tag).ok()
    }

    /// Re-derives the tag from `tag` unless it already equals the canonical
    /// string, in which case this is a no-op clone.
    pub fn recompose(&self, tag: &str) -> Result<LanguageTag, TagError> {
        if tag == self.canonical {
            Ok(self.clone())
        } else {
            LanguageTag::parse(tag)
        }
    }

    /// The canonical, case-normalized string form.
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// The primary language subtag, lowercased.
    pub fn primary(&self) -> &str {
        &self.primary
    }

    /// Extended language subtags, lowercased (at most three).
    pub fn extlang(&self) -> &[String] {
        &self.extlang
    }

    /// The script subtag, title-cased (e.g. `Latn`).
    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }

    /// The region subtag, uppercased (e.g. `DE` or `419`).
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// Variant subtags in order, lowercased, unique.
    pub fn variants(&self) -> &[String] {
        &self.variants
    }

    /// Extension groups in order: singleton plus its subtags, lowercased.
    pub fn extensions(&self) -> &[(char, Vec<String>)] {
        &self.extensions
    }

    /// Private-use subtags (after `x-`), lowercased.
    pub fn private_use(&self) -> &[String] {
        &self.private_use
    }
}

impl str::FromStr for LanguageTag {
    type Err = TagError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        LanguageTag::parse(tag)
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

fn compose(
    primary: Option<&str>,
    extlang: &[String],
    script: Option<&str>,
    region: Option<&str>,
    variants: &[String],
    extensions: &[(char, Vec<String>)],
    private_use: &[String],
) -> String {
    fn push(out: &mut String, subtag: &str) {
        if !out.is_empty() {
            out.push('-');
        }
        out.push_str(subtag);
    }

    let mut out = String::new();

    if let Some(primary) = primary {
        push(&mut out, primary);
    }

    for subtag in extlang {
        push(&mut out, subtag);
    }

    if let Some(script) = script {
        push(&mut out, script);
    }

    if let Some(region) = region {
        push(&mut out, region);
    }

    for variant in variants {
        push(&mut out, variant);
    }

    for (singleton, group) in extensions {
        if !out.is_empty() {
            out.push('-');
        }
        out.push(*singleton);

        for subtag in group {
            push(&mut out, subtag);
        }
    }

    if !private_use.is_empty() {
        push(&mut out, "x");

        for subtag in private_use {
            push(&mut out, subtag);
        }
    }

    out
}

/// The raw, freely mutable component form of a Language-Tag.
///
/// Construction and mutation never validate; malformed component values only
/// surface when [`validate`](Self::validate) composes the candidate string
/// and runs the full grammar over it. A hyphenated primary (`zh-yue`) is
/// split into primary + extlang at that point.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagParts {
    /// Primary language; may itself carry extlang subtags (`zh-yue`).
    pub primary: Option<String>,
    /// Extended language subtags.
    pub extlang: Vec<String>,
    /// Script subtag, any casing.
    pub script: Option<String>,
    /// Region subtag, any casing.
    pub region: Option<String>,
    /// Variant subtags.
    pub variants: Vec<String>,
    /// Extension groups keyed by singleton.
    pub extensions: Vec<(char, Vec<String>)>,
    /// Private-use subtags (without the leading `x`).
    pub private_use: Vec<String>,
}

impl TagParts {
    /// Joins the components into a candidate tag string, as-is.
    pub fn compose(&self) -> String {
        compose(
            self.primary.as_deref(),
            &self.extlang,
            self.script.as_deref(),
            self.region.as_deref(),
            &self.variants,
            &self.extensions,
            &self.private_use,
        )
    }

    /// Composes and validates, yielding the immutable tag or the specific
    /// violated invariant.
    pub fn validate(&self) -> Result<LanguageTag, TagError> {
        LanguageTag::parse(&self.compose())
    }
}

impl From<&LanguageTag> for TagParts {
    fn from(tag: &LanguageTag) -> TagParts {
        TagParts {
            primary: Some(tag.primary.clone()),
            extlang: tag.extlang.clone(),
            script: tag.script.clone(),
            region: tag.region.clone(),
            variants: tag.variants.clone(),
            extensions: tag.extensions.clone(),
            private_use: tag.private_use.clone(),
        }
    }
}
