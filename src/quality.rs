//! Quality values (q-factors) and the shared `Accept*` list grammar.

use std::{cmp, fmt, str};

use derive_more::{Display, Error};

use crate::error::ParseError;

const MAX_QUALITY_INT: u16 = 1000;
const MAX_QUALITY_FLOAT: f32 = 1.0;

/// Represents a quality used in q-factor values.
///
/// The default value is equivalent to `q=1.0` (the [max](Self::MAX) value).
///
/// # Implementation notes
/// The quality value is defined as a number between 0.0 and 1.0 with three decimal places.
/// This means there are 1001 possible values. Since floating point numbers are not exact and the
/// smallest floating point data type (`f32`) consumes four bytes, we use an `u16` value to store
/// the quality internally.
///
/// [RFC 2616 §3.9] gives more information on quality values in HTTP header fields.
///
/// # Examples
/// ```
/// use conneg::{q, Quality};
/// assert_eq!(q(1.0), Quality::MAX);
///
/// assert_eq!(q(0.42).to_string(), "0.42");
/// assert_eq!(q(1.0).to_string(), "1");
/// assert_eq!(Quality::MIN.to_string(), "0.001");
/// assert_eq!(Quality::ZERO.to_string(), "0");
/// ```
///
/// [RFC 2616 §3.9]: https://datatracker.ietf.org/doc/html/rfc2616#section-3.9
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Quality(u16);

impl Quality {
    /// The maximum quality value, equivalent to `q=1.0`.
    pub const MAX: Quality = Quality(MAX_QUALITY_INT);

    /// The minimum, non-zero quality value, equivalent to `q=0.001`.
    pub const MIN: Quality = Quality(1);

    /// The zero quality value, equivalent to `q=0.0`.
    pub const ZERO: Quality = Quality(0);

    /// Converts a float in the range 0.0–1.0 to a `Quality`.
    ///
    /// Intentionally private. External uses should rely on the `TryFrom` impl.
    ///
    /// # Panics
    /// Panics in debug mode when value is not in the range 0.0 <= n <= 1.0.
    fn from_f32(value: f32) -> Self {
        // Check that `value` is within range should be done before calling this method.
        // Just in case, this debug_assert should catch if we were forgetful.
        debug_assert!(
            (0.0..=MAX_QUALITY_FLOAT).contains(&value),
            "q value must be between 0.0 and 1.0"
        );

        Quality((value * MAX_QUALITY_INT as f32) as u16)
    }
}

/// The default value is [`Quality::MAX`].
impl Default for Quality {
    fn default() -> Quality {
        Quality::MAX
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            0 => f.write_str("0"),
            MAX_QUALITY_INT => f.write_str("1"),

            // some number in the range 1–999
            millis => {
                f.write_str("0.")?;

                // strip trailing zeroes without allocating, then left-pad the
                // remaining digits back to their decimal position
                let mut value = millis;
                let mut places = 3;

                while value % 10 == 0 {
                    value /= 10;
                    places -= 1;
                }

                let mut buf = itoa::Buffer::new();
                let formatted = buf.format(value);

                for _ in formatted.len()..places {
                    f.write_str("0")?;
                }

                f.write_str(formatted)
            }
        }
    }
}

/// Strict qvalue grammar: integer part `0` or `1`, optionally followed by a
/// `.` and at most 3 digits, with a total value of at most 1.000.
impl str::FromStr for Quality {
    type Err = ParseError;

    fn from_str(qvalue: &str) -> Result<Self, Self::Err> {
        let int_part = match qvalue.as_bytes().first() {
            Some(b'0') => 0,
            Some(b'1') => MAX_QUALITY_INT,
            _ => return Err(ParseError::Quality),
        };

        let rest = &qvalue[1..];

        if rest.is_empty() {
            return Ok(Quality(int_part));
        }

        let digits = rest.strip_prefix('.').ok_or(ParseError::Quality)?;

        if digits.len() > 3 || !digits.bytes().all(|c| c.is_ascii_digit()) {
            return Err(ParseError::Quality);
        }

        let mut millis = 0;
        let mut scale = 100;

        for digit in digits.bytes() {
            millis += u16::from(digit - b'0') * scale;
            scale /= 10;
        }

        if int_part + millis > MAX_QUALITY_INT {
            return Err(ParseError::Quality);
        }

        Ok(Quality(int_part + millis))
    }
}

/// Error returned when a float is outside the 0.0–1.0 quality range.
#[derive(Debug, Clone, Display, Error)]
#[display(fmt = "quality out of bounds")]
#[non_exhaustive]
pub struct QualityOutOfBounds;

impl TryFrom<f32> for Quality {
    type Error = QualityOutOfBounds;

    #[inline]
    fn try_from(value: f32) -> Result<Self, Self::Error> {
        if (0.0..=MAX_QUALITY_FLOAT).contains(&value) {
            Ok(Quality::from_f32(value))
        } else {
            Err(QualityOutOfBounds)
        }
    }
}

/// Convenience function to create a [`Quality`] from an `f32` (0.0–1.0).
///
/// Not recommended for use with user input. Rely on the `TryFrom` impls where possible.
///
/// # Panics
/// Panics if value is out of range.
///
/// # Examples
/// ```
/// # use conneg::{q, Quality};
/// let q1 = q(1.0);
/// assert_eq!(q1, Quality::MAX);
///
/// let q2 = q(0.001);
/// assert_eq!(q2, Quality::MIN);
///
/// let q3 = q(0.0);
/// assert_eq!(q3, Quality::ZERO);
/// ```
#[inline]
pub fn q<T>(quality: T) -> Quality
where
    T: TryInto<Quality>,
    T::Error: fmt::Debug,
{
    quality.try_into().expect("quality value was out of bounds")
}

/// Represents an item with a quality value as defined
/// in [RFC 2616 §14.1](https://datatracker.ietf.org/doc/html/rfc2616#section-14.1).
///
/// # Ordering
/// Since the context of use for this type is header value items, ordering is defined for
/// `QualityItem`s but _only_ considers the item's quality. Order of appearance should be used as
/// the secondary sorting parameter; i.e., a stable sort over the quality values will produce a
/// correctly sorted sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityItem<T> {
    /// The wrapped contents of the field.
    pub item: T,

    /// The quality (client or server preference) for the value.
    pub quality: Quality,
}

impl<T> QualityItem<T> {
    /// Constructs a new `QualityItem` from an item and a quality value.
    ///
    /// The item can be of any type. The quality should be a value in the range [0, 1].
    pub fn new(item: T, quality: Quality) -> Self {
        QualityItem { item, quality }
    }

    /// Constructs a new `QualityItem` from an item, using the maximum q-value.
    pub fn max(item: T) -> Self {
        Self::new(item, Quality::MAX)
    }

    /// Constructs a new `QualityItem` from an item, using the minimum, non-zero q-value.
    pub fn min(item: T) -> Self {
        Self::new(item, Quality::MIN)
    }

    /// Constructs a new `QualityItem` from an item, using a q-value of zero.
    pub fn zero(item: T) -> Self {
        Self::new(item, Quality::ZERO)
    }
}

impl<T: PartialEq> PartialOrd for QualityItem<T> {
    fn partial_cmp(&self, other: &QualityItem<T>) -> Option<cmp::Ordering> {
        self.quality.partial_cmp(&other.quality)
    }
}

impl<T: fmt::Display> fmt::Display for QualityItem<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.item, f)?;

        match self.quality {
            // q-factor value is implied for max value
            Quality::MAX => Ok(()),

            q => write!(f, "; q={}", q),
        }
    }
}

/// Strict entry grammar: `token [ ";" OWS ("q" | "Q") "=" qvalue ]`.
///
/// Unlike lenient header parsers, an attribute that is not a q-factor fails
/// the whole entry; the `Accept-Charset`/`Accept-Encoding` grammar has no
/// other parameters.
impl<T: str::FromStr> str::FromStr for QualityItem<T> {
    type Err = ParseError;

    fn from_str(entry: &str) -> Result<Self, Self::Err> {
        if !entry.is_ascii() {
            return Err(ParseError::Header);
        }

        let (raw_item, quality) = match entry.split_once(';') {
            Some((item, attr)) => {
                let attr = attr.trim();

                let qvalue = attr
                    .strip_prefix("q=")
                    .or_else(|| attr.strip_prefix("Q="))
                    .ok_or(ParseError::Header)?;

                let quality = qvalue
                    .trim()
                    .parse::<Quality>()
                    .map_err(|_| ParseError::Header)?;

                (item.trim(), quality)
            }

            None => (entry.trim(), Quality::MAX),
        };

        if raw_item.is_empty() || raw_item.contains([' ', '\t', ';', ',']) {
            return Err(ParseError::Header);
        }

        let item = raw_item.parse::<T>().map_err(|_| ParseError::Header)?;

        Ok(QualityItem::new(item, quality))
    }
}

/// Parses a comma-separated `Accept-Charset`/`Accept-Encoding` style header
/// into `(token, quality)` pairs in their original order.
///
/// An empty string yields an empty list; this is distinct from an absent
/// header, which is the caller's concern. A non-empty but blank header, an
/// empty list entry (as produced by `",,"`), or an out-of-grammar q-factor
/// fails with [`ParseError::Header`].
///
/// # Examples
/// ```
/// use conneg::{parse_quality_list, q};
///
/// let list = parse_quality_list("gzip;q=0.8, identity").unwrap();
/// assert_eq!(list[0].item, "gzip");
/// assert_eq!(list[0].quality, q(0.8));
/// assert_eq!(list[1].item, "identity");
/// assert_eq!(list[1].quality, q(1.0));
/// ```
pub fn parse_quality_list(raw: &str) -> Result<Vec<QualityItem<String>>, ParseError> {
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

/// Stable-sorts `entries` by descending quality and flattens them into
/// lowercased candidate tokens, expanding the first `*` (at its sorted
/// position) into the offered values not mentioned anywhere in the header.
///
/// The exclusion set is computed once; any later wildcard expands to nothing.
pub(crate) fn ranked_candidates(
    offered: &[&str],
    mut entries: Vec<QualityItem<String>>,
    mentioned: &[String],
) -> Vec<String> {
    entries.sort_by(|a, b| b.quality.cmp(&a.quality));

    let mut candidates = Vec::with_capacity(entries.len());
    let mut expanded = false;

    for entry in entries {
        if entry.item == "*" {
            if !expanded {
                expanded = true;
                candidates.extend(
                    offered
                        .iter()
                        .map(|offer| offer.to_ascii_lowercase())
                        .filter(|offer| !mentioned.contains(offer)),
                );
            }
        } else {
            candidates.push(entry.item.to_ascii_lowercase());
        }
    }

    candidates
}
