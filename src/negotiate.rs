//! Best-match selection over offered media types.

use crate::{
    error::ParseError,
    media_type::{parse_accept, AcceptItem, MediaRange},
    quality::Quality,
};

/// The relevance of one offered media type against an `Accept` header.
///
/// Produced by [`weigh`]; fields are ordered by comparison precedence under
/// the pinned policy: rate, then parameter specificity, then quality, with
/// `index` recording which accepted entry won (for header-order tie-breaks).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MimeWeight {
    /// `10 × exact-type + 1 × exact-subtype`; wildcard matches score zero, so
    /// `text/html` (11) outranks `text/*` (10) outranks `*/*` (0).
    pub rate: u8,

    /// Count of the accepted range's parameters matched exactly by the
    /// candidate.
    pub specificity: usize,

    /// The q-factor of the winning accepted entry.
    pub quality: Quality,

    /// Position of the winning entry in the accepted list.
    pub index: usize,
}

/// Weighs a candidate media type against a parsed `Accept` header.
///
/// A header entry qualifies only when type and subtype both match, where a
/// wildcard on either side or an exact (already case-folded) match counts. An
/// entry whose parameters the candidate does not reproduce exactly is
/// disqualified outright, not merely ranked lower. Among qualifying entries
/// the best rate wins, then the highest specificity, then the highest
/// quality; remaining ties keep the earliest entry.
///
/// Returns `None` when no entry qualifies.
pub fn weigh(candidate: &MediaRange, accepted: &[AcceptItem]) -> Option<MimeWeight> {
    let mut best: Option<MimeWeight> = None;

    for (index, item) in accepted.iter().enumerate() {
        let range = item.range();

        let type_matches = range.type_() == "*"
            || candidate.type_() == "*"
            || range.type_() == candidate.type_();
        let subtype_matches = range.subtype() == "*"
            || candidate.subtype() == "*"
            || range.subtype() == candidate.subtype();

        if !type_matches || !subtype_matches {
            continue;
        }

        let rate = 10 * u8::from(range.type_() != "*" && range.type_() == candidate.type_())
            + u8::from(range.subtype() != "*" && range.subtype() == candidate.subtype());

        if let Some(best) = best {
            if rate < best.rate {
                continue;
            }
        }

        // every parameter the range requires must be present in the
        // candidate with an identical value; a divergence disqualifies
        let mut specificity = 0;
        let mut diverged = false;

        for (key, value) in range.parameters() {
            match candidate.param(key) {
                Some(candidate_value) if candidate_value == value => specificity += 1,
                _ => {
                    diverged = true;
                    break;
                }
            }
        }

        if diverged {
            continue;
        }

        let weight = MimeWeight {
            rate,
            specificity,
            quality: item.quality(),
            index,
        };

        let better = match best {
            None => true,
            Some(best) => {
                (weight.rate, weight.specificity, weight.quality)
                    > (best.rate, best.specificity, best.quality)
            }
        };

        if better {
            best = Some(weight);
        }
    }

    best
}

/// Picks the best of the offered media types for a parsed `Accept` header.
///
/// Returns the index of the winner in `offered`, `None` when nothing is
/// acceptable, and `Some(0)` for an empty accepted list (header absent means
/// anything goes, so the first offer wins). Candidates whose winning entry
/// has quality 0 are not acceptable.
///
/// Weights compare as `(rate, specificity, quality)`, or by quality alone
/// when `quality_only` is set; ties keep the earliest offer.
pub fn detect_best(
    offered: &[MediaRange],
    accepted: &[AcceptItem],
    quality_only: bool,
) -> Option<usize> {
    if offered.is_empty() {
        return None;
    }

    if accepted.is_empty() {
        return Some(0);
    }

    let mut best: Option<(usize, MimeWeight)> = None;

    for (index, candidate) in offered.iter().enumerate() {
        let weight = match weigh(candidate, accepted) {
            Some(weight) => weight,
            None => continue,
        };

        if weight.quality == Quality::ZERO {
            continue;
        }

        let better = match &best {
            None => true,
            Some((_, incumbent)) => {
                if quality_only {
                    weight.quality > incumbent.quality
                } else {
                    (weight.rate, weight.specificity, weight.quality)
                        > (incumbent.rate, incumbent.specificity, incumbent.quality)
                }
            }
        };

        if better {
            best = Some((index, weight));
        }
    }

    best.map(|(index, _)| index)
}

/// Parses a raw `Accept` header and picks the best offered media type in one
/// call, returning it in the server's own spelling.
///
/// # Examples
/// ```
/// use conneg::negotiate_media_type;
///
/// let offered = ["application/json", "text/html"];
/// let winner = negotiate_media_type(&offered, "text/*;q=0.8, */*;q=0.1", false).unwrap();
/// assert_eq!(winner, Some("text/html"));
/// ```
pub fn negotiate_media_type<'a>(
    offered: &[&'a str],
    header: &str,
    quality_only: bool,
) -> Result<Option<&'a str>, ParseError> {
    let ranges = offered
        .iter()
        .map(|offer| offer.parse())
        .collect::<Result<Vec<MediaRange>, _>>()?;

    let accepted = parse_accept(header)?;

    Ok(detect_best(&ranges, &accepted, quality_only).map(|index| offered[index]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::q;

    fn ranges(offers: &[&str]) -> Vec<MediaRange> {
        offers.iter().map(|o| o.parse().unwrap()).collect()
    }

    fn accept(raw: &str) -> Vec<AcceptItem> {
        parse_accept(raw).unwrap()
    }

    #[test]
    fn weigh_rates() {
        let accepted = accept("text/html, text/*;q=0.5, */*;q=0.1");

        let candidate: MediaRange = "text/html".parse().unwrap();
        let weight = weigh(&candidate, &accepted).unwrap();
        assert_eq!((weight.rate, weight.index), (11, 0));
        assert_eq!(weight.quality, q(1.0));

        let candidate: MediaRange = "text/plain".parse().unwrap();
        let weight = weigh(&candidate, &accepted).unwrap();
        assert_eq!((weight.rate, weight.index), (10, 1));
        assert_eq!(weight.quality, q(0.5));

        let candidate: MediaRange = "image/png".parse().unwrap();
        let weight = weigh(&candidate, &accepted).unwrap();
        assert_eq!((weight.rate, weight.index), (0, 2));
        assert_eq!(weight.quality, q(0.1));
    }

    #[test]
    fn weigh_no_match() {
        let accepted = accept("text/html");
        let candidate: MediaRange = "image/png".parse().unwrap();
        assert_eq!(weigh(&candidate, &accepted), None);
    }

    #[test]
    fn parameter_divergence_disqualifies() {
        let accepted = accept("text/html;level=1");

        let exact: MediaRange = "text/html;level=1".parse().unwrap();
        assert_eq!(weigh(&exact, &accepted).unwrap().specificity, 1);

        // absent parameter: the range is disqualified, not just less specific
        let plain: MediaRange = "text/html".parse().unwrap();
        assert_eq!(weigh(&plain, &accepted), None);

        // mismatched value too
        let other: MediaRange = "text/html;level=2".parse().unwrap();
        assert_eq!(weigh(&other, &accepted), None);
    }

    #[test]
    fn explicit_zero_shadows_wildcard() {
        // the exact entry outranks the wildcard, so its q=0 makes the
        // candidate unacceptable rather than falling back to */*
        let accepted = accept("text/html;q=0, */*");
        let offered = ranges(&["text/html", "text/plain"]);
        assert_eq!(detect_best(&offered, &accepted, false), Some(1));
    }

    #[test]
    fn specificity_beats_quality() {
        // the worked table: the level=1 offer wins at equal rate despite its
        // lower q-factor, in both offer orders and both header permutations
        for header in [
            "text/html;level=1;q=0.5,text/html",
            "text/html,text/html;level=1;q=0.5",
        ] {
            let accepted = accept(header);

            let offered = ranges(&["text/html;level=1", "text/html"]);
            assert_eq!(detect_best(&offered, &accepted, false), Some(0));

            let offered = ranges(&["text/html", "text/html;level=1"]);
            assert_eq!(detect_best(&offered, &accepted, false), Some(1));
        }
    }

    #[test]
    fn quality_only_mode() {
        let accepted = accept("text/html;level=1;q=0.5,text/html");
        let offered = ranges(&["text/html;level=1", "text/html"]);

        // under quality-only comparison the plain offer's q=1 entry wins
        assert_eq!(detect_best(&offered, &accepted, true), Some(1));
    }

    #[test]
    fn empty_lists() {
        let offered = ranges(&["text/html"]);
        assert_eq!(detect_best(&offered, &[], false), Some(0));
        assert_eq!(detect_best(&[], &accept("*/*"), false), None);
    }

    #[test]
    fn all_refused() {
        let offered = ranges(&["text/html"]);
        assert_eq!(detect_best(&offered, &accept("text/html;q=0"), false), None);
        assert_eq!(detect_best(&offered, &accept("image/*"), false), None);
    }

    #[test]
    fn offered_order_breaks_exact_ties() {
        let accepted = accept("text/*");
        let offered = ranges(&["text/plain", "text/html"]);
        assert_eq!(detect_best(&offered, &accepted, false), Some(0));
    }

    #[test]
    fn negotiate_helper() {
        let offered = ["text/html", "application/json"];

        assert_eq!(
            negotiate_media_type(&offered, "application/*", false).unwrap(),
            Some("application/json"),
        );
        assert_eq!(negotiate_media_type(&offered, "", false).unwrap(), Some("text/html"));
        assert_eq!(negotiate_media_type(&offered, "image/png", false).unwrap(), None);
        assert!(negotiate_media_type(&offered, "bogus", false).is_err());
    }
}
