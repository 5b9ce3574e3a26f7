//! Error types for `destiny-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The input could not be split into day, month and year segments.
  #[error("malformed birth date {0:?}: expected DD.MM.YYYY")]
  MalformedDateFormat(String),

  #[error("birth date segment {segment:?} is not a number")]
  NonNumericSegment { segment: String },

  #[error("{field} {value} is outside {min}..={max}")]
  DateOutOfRange {
    field: &'static str,
    value: u32,
    min:   u32,
    max:   u32,
  },

  #[error("unknown {kind} value: {value:?}")]
  UnknownVariant { kind: &'static str, value: String },

  #[error("stored calculation is inconsistent")]
  InconsistentCalculation,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
