//! Error types for header parsing and language-tag validation.

use derive_more::{Display, Error};

/// A hard parse failure in an `Accept*` header or one of its components.
///
/// Parsers that return this error produce no partial results; the whole header
/// value must be treated as invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The header value does not match the comma-separated list grammar.
    #[display(fmt = "malformed header")]
    Header,

    /// A media-range or media-type snippet is not `token "/" token` with
    /// well-formed parameters.
    #[display(fmt = "malformed media type")]
    MediaType,

    /// A q-factor is present but does not match the qvalue grammar.
    #[display(fmt = "malformed quality factor")]
    Quality,
}

/// A violated invariant discovered while validating a Language-Tag.
///
/// `TagParts` construction never raises this; only parsing, validation, and
/// recomposition do, and always with the specific invariant that failed.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[non_exhaustive]
pub enum TagError {
    /// The tag does not match the RFC 5646 structural grammar.
    #[display(fmt = "malformed language tag")]
    Malformed,

    /// The tag is one of the fixed legacy registrations (e.g. `i-enochian`)
    /// and is not a regular Language-Tag.
    #[display(fmt = "grandfathered tag is not a regular language tag")]
    Grandfathered,

    /// The tag consists only of a private-use sequence (`x-...`).
    #[display(fmt = "private-use-only tag is not a regular language tag")]
    PrivateUse,

    /// The same variant subtag appears twice (case-insensitively).
    #[display(fmt = "duplicate variant subtag: {}", _0)]
    DuplicateVariant(#[error(not(source))] String),

    /// The same extension singleton appears twice (case-insensitively).
    #[display(fmt = "duplicate singleton: {}", _0)]
    DuplicateSingleton(#[error(not(source))] char),
}
