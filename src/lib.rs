//! HTTP content negotiation per RFC 2616, RFC 4647, and RFC 5646.
//!
//! This crate parses `Accept*` request headers and selects the best
//! representation a server can return:
//!
//! - [`parse_quality_list`] — the `(token, quality)` list grammar shared by
//!   every `Accept*` header;
//! - [`best_charset`] / [`best_encoding`] — `Accept-Charset` and
//!   `Accept-Encoding` selection, including the implicit `iso-8859-1` and
//!   `identity` defaults;
//! - [`MediaRange`], [`AcceptItem`], [`weigh`], [`detect_best`] — the
//!   `Accept` media-type grammar and the specificity-aware best-match
//!   selection;
//! - [`language`] — structural Language-Tag parsing and RFC 4647 basic and
//!   extended range filtering;
//! - [`MimeRegistry`] — an extension ↔ media-type lookup table for serving
//!   layers.
//!
//! All operations are pure, synchronous transformations; nothing here caches
//! across calls or touches global state.
//!
//! # Examples
//! ```
//! use conneg::{negotiate_media_type, parse_quality_list, best_encoding, LanguageTag};
//!
//! let offered = ["application/json", "text/html"];
//! let winner = negotiate_media_type(&offered, "text/html, */*;q=0.2", false).unwrap();
//! assert_eq!(winner, Some("text/html"));
//!
//! let accepted = parse_quality_list("gzip, br;q=0.9").unwrap();
//! assert_eq!(best_encoding(&["br", "gzip"], &accepted), Some("gzip"));
//!
//! let tag: LanguageTag = "de-Latn-DE".parse().unwrap();
//! assert!(tag.matches_extended("de-*-DE"));
//! ```

#![deny(rust_2018_idioms, nonstandard_style)]
#![warn(future_incompatible)]

mod charset;
mod encoding;
mod error;
pub mod language;
mod media_type;
mod negotiate;
mod quality;
mod registry;

pub use self::{
    charset::best_charset,
    encoding::best_encoding,
    error::{ParseError, TagError},
    language::{LanguageTag, TagParts},
    media_type::{parse_accept, AcceptItem, MediaRange},
    negotiate::{detect_best, negotiate_media_type, weigh, MimeWeight},
    quality::{parse_quality_list, q, Quality, QualityItem, QualityOutOfBounds},
    registry::MimeRegistry,
};
