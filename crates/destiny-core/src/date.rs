//! Birth date parsing.
//!
//! [`BirthDate::parse`] is the calculator's own parser: it splits on `.` and
//! reads three unsigned integers, nothing more. Range checks live in
//! [`BirthDate::validate`] and are the caller's job; [`BirthDate::parse_checked`]
//! bundles the strict `DD.MM.YYYY` shape check, parsing and validation for
//! callers that accept user input.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Result};

pub const DAY_RANGE: (u32, u32) = (1, 31);
pub const MONTH_RANGE: (u32, u32) = (1, 12);
pub const YEAR_RANGE: (u32, u32) = (1900, 2100);

/// Raw calendar components. Calendar correctness (31 February) is not checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BirthDate {
  pub day:   u32,
  pub month: u32,
  pub year:  u32,
}

impl BirthDate {
  pub fn new(day: u32, month: u32, year: u32) -> Self { Self { day, month, year } }

  /// Split `s` on `.` into day, month and year.
  ///
  /// Fails with [`Error::MalformedDateFormat`] unless there are exactly three
  /// segments, and with [`Error::NonNumericSegment`] if a segment is not an
  /// unsigned decimal integer. Out-of-range values pass through.
  pub fn parse(s: &str) -> Result<Self> {
    let segments: Vec<&str> = s.split('.').collect();
    let [day, month, year] = segments.as_slice() else {
      return Err(Error::MalformedDateFormat(s.to_owned()));
    };
    Ok(Self {
      day:   parse_segment(day)?,
      month: parse_segment(month)?,
      year:  parse_segment(year)?,
    })
  }

  /// Check day, month and year against their accepted ranges.
  pub fn validate(&self) -> Result<()> {
    check_range("day", self.day, DAY_RANGE)?;
    check_range("month", self.month, MONTH_RANGE)?;
    check_range("year", self.year, YEAR_RANGE)?;
    Ok(())
  }

  /// Strict parse for user input: exactly `DD.MM.YYYY`, then [`parse`] and
  /// [`validate`].
  ///
  /// [`parse`]: BirthDate::parse
  /// [`validate`]: BirthDate::validate
  pub fn parse_checked(s: &str) -> Result<Self> {
    if !has_strict_shape(s) {
      return Err(Error::MalformedDateFormat(s.to_owned()));
    }
    let date = Self::parse(s)?;
    date.validate()?;
    Ok(date)
  }
}

fn parse_segment(segment: &str) -> Result<u32> {
  // `u32::from_str` accepts a leading `+`; a date segment never has one.
  if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
    return Err(Error::NonNumericSegment { segment: segment.to_owned() });
  }
  segment
    .parse()
    .map_err(|_| Error::NonNumericSegment { segment: segment.to_owned() })
}

fn check_range(field: &'static str, value: u32, (min, max): (u32, u32)) -> Result<()> {
  if (min..=max).contains(&value) {
    Ok(())
  } else {
    Err(Error::DateOutOfRange { field, value, min, max })
  }
}

/// `^\d{2}\.\d{2}\.\d{4}$`
fn has_strict_shape(s: &str) -> bool {
  let b = s.as_bytes();
  b.len() == 10
    && b[2] == b'.'
    && b[5] == b'.'
    && b
      .iter()
      .enumerate()
      .filter(|(i, _)| *i != 2 && *i != 5)
      .all(|(_, c)| c.is_ascii_digit())
}

impl fmt::Display for BirthDate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:02}.{:02}.{:04}", self.day, self.month, self.year)
  }
}

impl FromStr for BirthDate {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> { Self::parse(s) }
}

// Serialised in its `DD.MM.YYYY` string form, the shape stored in the database
// and accepted over the API.
impl Serialize for BirthDate {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

impl<'de> Deserialize<'de> for BirthDate {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let s = String::deserialize(deserializer)?;
    BirthDate::parse(&s).map_err(serde::de::Error::custom)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_three_segments() {
    let d = BirthDate::parse("15.03.1990").unwrap();
    assert_eq!(d, BirthDate::new(15, 3, 1990));
  }

  #[test]
  fn wrong_separator_is_malformed() {
    assert!(matches!(
      BirthDate::parse("15/03/1990"),
      Err(Error::MalformedDateFormat(_))
    ));
  }

  #[test]
  fn wrong_segment_count_is_malformed() {
    assert!(matches!(BirthDate::parse("15.03"), Err(Error::MalformedDateFormat(_))));
    assert!(matches!(
      BirthDate::parse("15.03.1990.1"),
      Err(Error::MalformedDateFormat(_))
    ));
  }

  #[test]
  fn non_numeric_segment_fails_fast() {
    let err = BirthDate::parse("aa.03.1990").unwrap_err();
    assert!(matches!(err, Error::NonNumericSegment { ref segment } if segment == "aa"));
    assert!(matches!(
      BirthDate::parse("15.+3.1990"),
      Err(Error::NonNumericSegment { .. })
    ));
    assert!(matches!(
      BirthDate::parse("15..1990"),
      Err(Error::NonNumericSegment { .. })
    ));
  }

  #[test]
  fn parse_does_not_range_check() {
    let d = BirthDate::parse("31.13.1800").unwrap();
    assert_eq!(d.month, 13);
    assert!(matches!(
      d.validate(),
      Err(Error::DateOutOfRange { field: "month", value: 13, .. })
    ));
  }

  #[test]
  fn validate_accepts_bounds() {
    assert!(BirthDate::new(1, 1, 1900).validate().is_ok());
    assert!(BirthDate::new(31, 12, 2100).validate().is_ok());
    assert!(BirthDate::new(0, 1, 1900).validate().is_err());
    assert!(BirthDate::new(1, 1, 2101).validate().is_err());
  }

  #[test]
  fn parse_checked_requires_strict_shape() {
    assert!(BirthDate::parse_checked("15.03.1990").is_ok());
    assert!(matches!(
      BirthDate::parse_checked("5.3.1990"),
      Err(Error::MalformedDateFormat(_))
    ));
    assert!(matches!(
      BirthDate::parse_checked("15.03.90"),
      Err(Error::MalformedDateFormat(_))
    ));
    assert!(matches!(
      BirthDate::parse_checked("32.01.1990"),
      Err(Error::DateOutOfRange { field: "day", .. })
    ));
  }

  #[test]
  fn display_is_zero_padded() {
    assert_eq!(BirthDate::new(5, 3, 1990).to_string(), "05.03.1990");
  }

  #[test]
  fn serde_uses_string_form() {
    let json = serde_json::to_string(&BirthDate::new(1, 2, 2003)).unwrap();
    assert_eq!(json, "\"01.02.2003\"");
    let back: BirthDate = serde_json::from_str(&json).unwrap();
    assert_eq!(back, BirthDate::new(1, 2, 2003));
  }
}
