//! `Accept-Charset` selection per [RFC 2616 §14.2].
//!
//! [RFC 2616 §14.2]: https://datatracker.ietf.org/doc/html/rfc2616#section-14.2

use crate::quality::{ranked_candidates, Quality, QualityItem};

/// Selects the best charset the server can return.
///
/// `accepted` is the parsed `Accept-Charset` list in header order (see
/// [`parse_quality_list`](crate::parse_quality_list)); an empty list means
/// the header was absent or empty and anything is acceptable, so the first
/// offered charset wins. Per RFC 2616 §14.2, `iso-8859-1` is implicitly
/// acceptable at `q=1` unless the header mentions it (or `*`) explicitly.
///
/// Returns the winning value in the server's own spelling, or `None` when
/// nothing offered is acceptable.
///
/// # Examples
/// ```
/// use conneg::{best_charset, parse_quality_list};
///
/// let accepted = parse_quality_list("unicode-1-1;q=0.8, iso-8859-5").unwrap();
/// let offered = ["iso-8859-5", "unicode-1-1"];
/// assert_eq!(best_charset(&offered, &accepted), Some("iso-8859-5"));
/// ```
pub fn best_charset<'a>(offered: &[&'a str], accepted: &[QualityItem<String>]) -> Option<&'a str> {
    if offered.is_empty() {
        return None;
    }

    if accepted.is_empty() {
        return offered.first().copied();
    }

    // every token named by the header, acceptable or not; used both for the
    // implicit iso-8859-1 rule and for wildcard exclusion
    let mentioned: Vec<String> = accepted
        .iter()
        .map(|entry| entry.item.to_ascii_lowercase())
        .collect();

    let mut entries: Vec<QualityItem<String>> = accepted
        .iter()
        .filter(|entry| entry.quality > Quality::ZERO)
        .cloned()
        .collect();

    if !mentioned.iter().any(|t| t == "iso-8859-1" || t == "*") {
        entries.push(QualityItem::max("iso-8859-1".to_owned()));
    }

    for candidate in ranked_candidates(offered, entries, &mentioned) {
        if let Some(found) = offered.iter().copied().find(|o| o.eq_ignore_ascii_case(&candidate)) {
            return Some(found);
        }
    }

    None
}
