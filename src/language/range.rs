//! Language-Range matching per [RFC 4647 §3.3].
//!
//! Both filters operate on canonical tag strings; ranges may be supplied in
//! any casing.
//!
//! [RFC 4647 §3.3]: https://datatracker.ietf.org/doc/html/rfc4647#section-3.3

use super::tag::LanguageTag;

/// Basic filtering: `*` matches everything; otherwise the range must equal
/// the tag or be a prefix of it ending at a subtag boundary.
///
/// # Examples
/// ```
/// use conneg::language::basic_filter;
///
/// assert!(basic_filter("de-de", "de-DE-1996"));
/// assert!(!basic_filter("de-de", "de-Latn-DE"));
/// assert!(basic_filter("*", "sl-Latn"));
/// ```
pub fn basic_filter(range: &str, tag: &str) -> bool {
    if range == "*" {
        return true;
    }

    if range.eq_ignore_ascii_case(tag) {
        return true;
    }

    // byte-wise so an arbitrary (non-ASCII) tag cannot split a char boundary
    let tag = tag.as_bytes();

    tag.get(range.len()) == Some(&b'-') && tag[..range.len()].eq_ignore_ascii_case(range.as_bytes())
}

/// Extended filtering: subtags are matched in lock-step, `*` in the range
/// skips ahead over any number of tag subtags, and singletons in the tag are
/// hard boundaries a wildcard may not cross.
///
/// # Examples
/// ```
/// use conneg::language::extended_filter;
///
/// assert!(extended_filter("de-*-DE", "de-Latn-DE"));
/// assert!(!extended_filter("de-DE", "de-x-DE"));
/// ```
pub fn extended_filter(range: &str, tag: &str) -> bool {
    let tag_subtags: Vec<&str> = tag.split('-').collect();
    let range_subtags: Vec<&str> = range.split('-').collect();

    let mut ti = 0;
    let mut ri = 0;

    while ri < range_subtags.len() {
        let range_subtag = range_subtags[ri];

        if range_subtag == "*" {
            // wildcard consumes zero or more tag subtags implicitly
            ri += 1;
            continue;
        }

        if ti >= tag_subtags.len() {
            return false;
        }

        let tag_subtag = tag_subtags[ti];

        if range_subtag.eq_ignore_ascii_case(tag_subtag) {
            ri += 1;
            ti += 1;
            continue;
        }

        if tag_subtag.len() == 1 {
            // singletons delimit extension data; skipping one would let the
            // range match inside another extension's subtags
            return false;
        }

        ti += 1;
    }

    true
}

impl LanguageTag {
    /// [`basic_filter`] over this tag's canonical string.
    pub fn matches_basic(&self, range: &str) -> bool {
        basic_filter(range, self.canonical())
    }

    /// [`extended_filter`] over this tag's canonical string.
    pub fn matches_extended(&self, range: &str) -> bool {
        extended_filter(range, self.canonical())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_exact_and_prefix() {
        assert!(basic_filter("de-DE", "de-DE"));
        assert!(basic_filter("DE-de", "de-DE"));
        assert!(basic_filter("de", "de-DE-1996"));
        assert!(basic_filter("de-DE", "de-DE-1996"));

        // prefix must end on a subtag boundary
        assert!(!basic_filter("de-D", "de-DE"));
        assert!(!basic_filter("de-DE-19", "de-DE-1996"));

        // longer range than tag never matches
        assert!(!basic_filter("de-DE-1996", "de-DE"));
    }

    #[test]
    fn basic_tolerates_non_ascii_tags() {
        // arbitrary strings must not split a char boundary at the range length
        assert!(!basic_filter("de-DE", "dé-DE-1996"));
        assert!(!basic_filter("de", "dé›"));
        assert!(basic_filter("dé", "dé-DE"));
    }

    #[test]
    fn basic_wildcard() {
        assert!(basic_filter("*", "de"));
        assert!(basic_filter("*", "zh-Hans-CN"));
    }

    #[test]
    fn extended_wildcard_skips_subtags() {
        assert!(extended_filter("de-*-DE", "de-Latn-DE"));
        assert!(extended_filter("de-*-DE", "de-DE"));
        assert!(extended_filter("de-*-DE", "de-Latn-DE-1996"));
        assert!(extended_filter("*", "sl-Latn-rozaj"));
        assert!(extended_filter("*-DE", "de-DE"));
    }

    #[test]
    fn extended_skips_unconstrained_subtags() {
        // RFC 4647: "de-DE" matches "de-Latn-DE" under extended filtering
        assert!(extended_filter("de-DE", "de-Latn-DE"));
        assert!(extended_filter("zh-CN", "zh-Hans-CN"));
    }

    #[test]
    fn extended_singleton_boundary() {
        assert!(!extended_filter("de-DE", "de-x-DE"));
        assert!(!extended_filter("en-ccc", "en-a-bbb-ccc"));
    }

    #[test]
    fn extended_tag_exhaustion() {
        assert!(!extended_filter("de-Latn-DE", "de-Latn"));

        // trailing wildcards need no tag subtags
        assert!(extended_filter("de-*", "de"));
    }

    #[test]
    fn tag_methods_use_canonical_form() {
        let tag: LanguageTag = "DE-LATN-DE".parse().unwrap();
        assert!(tag.matches_basic("de-latn"));
        assert!(tag.matches_extended("de-*-de"));
        assert!(!tag.matches_basic("de-de"));
    }
}
