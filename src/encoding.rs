//! `Accept-Encoding` selection per [RFC 2616 §14.3].
//!
//! [RFC 2616 §14.3]: https://datatracker.ietf.org/doc/html/rfc2616#section-14.3

use crate::quality::{ranked_candidates, Quality, QualityItem};

const IDENTITY: &str = "identity";

/// Selects the best content-coding the server can apply.
///
/// `accepted` is the parsed `Accept-Encoding` list in header order. Unlike
/// charsets, an absent or empty header only makes `identity` acceptable: with
/// no list, the result is `identity` when offered and `None` otherwise. An
/// explicit `identity;q=0` or `*;q=0` prohibits the identity fallback that
/// would otherwise apply when no listed coding intersects the offer.
///
/// Returns the winning value in the server's own spelling, or `None`.
///
/// # Examples
/// ```
/// use conneg::{best_encoding, parse_quality_list};
///
/// let accepted = parse_quality_list("gzip;q=1.0, identity;q=0.5, *;q=0").unwrap();
/// assert_eq!(best_encoding(&["identity", "gzip"], &accepted), Some("gzip"));
/// assert_eq!(best_encoding(&["br"], &accepted), None);
/// ```
pub fn best_encoding<'a>(offered: &[&'a str], accepted: &[QualityItem<String>]) -> Option<&'a str> {
    if offered.is_empty() {
        return None;
    }

    let identity = offered
        .iter()
        .find(|o| o.eq_ignore_ascii_case(IDENTITY))
        .copied();

    if accepted.is_empty() {
        return identity;
    }

    let mentioned: Vec<String> = accepted
        .iter()
        .map(|entry| entry.item.to_ascii_lowercase())
        .collect();

    let mut identity_prohibited = false;
    let mut entries = Vec::with_capacity(accepted.len());

    for (entry, token) in accepted.iter().zip(&mentioned) {
        if entry.quality == Quality::ZERO {
            if token == IDENTITY || token == "*" {
                identity_prohibited = true;
            }
        } else {
            entries.push(entry.clone());
        }
    }

    for candidate in ranked_candidates(offered, entries, &mentioned) {
        if let Some(found) = offered.iter().copied().find(|o| o.eq_ignore_ascii_case(&candidate)) {
            return Some(found);
        }
    }

    if identity_prohibited {
        None
    } else {
        identity
    }
}
