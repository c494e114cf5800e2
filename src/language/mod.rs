//! Language-Tag structure (RFC 5646) and Language-Range matching (RFC 4647).

mod range;
mod tag;

pub use self::{
    range::{basic_filter, extended_filter},
    tag::{LanguageTag, TagParts},
};
