//! [`Arcana`]: an integer in `1..=22`, and the digit-sum reduction onto it.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// One of the 22 arcana, identified by its number.
///
/// The only ways to obtain a value are [`Arcana::new`], which rejects anything
/// outside `1..=22`, and [`Arcana::reduce`], which maps every integer onto the
/// range. Deserialisation goes through [`Arcana::new`] as well.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
)]
#[serde(transparent)]
pub struct Arcana(u8);

impl Arcana {
  pub const MIN: Arcana = Arcana(1);
  pub const MAX: Arcana = Arcana(22);

  /// Wrap `n` if it lies in `1..=22`.
  pub fn new(n: u32) -> Option<Self> {
    match n {
      1..=22 => Some(Self(n as u8)),
      _ => None,
    }
  }

  /// Reduce `n` onto `1..=22`.
  ///
  /// While the value exceeds 22 it is replaced by the sum of its decimal
  /// digits; the test is repeated after every pass (1999 → 28 → 10). A final
  /// value of 0 wraps around to 22. Values already in `1..=22` are returned
  /// untouched. Takes `u64` so sums of full-width `u32` date segments fit.
  pub fn reduce(mut n: u64) -> Self {
    while n > 22 {
      n = digit_sum(n);
    }
    if n == 0 { Self::MAX } else { Self(n as u8) }
  }

  pub fn get(self) -> u8 { self.0 }

  /// `self + other`, reduced. Used for every composite position.
  pub fn combine(self, other: Arcana) -> Arcana {
    Arcana::reduce(u64::from(self.0) + u64::from(other.0))
  }
}

/// Shorthand for [`Arcana::reduce`].
pub fn reduce_to_arcana(n: u64) -> Arcana { Arcana::reduce(n) }

fn digit_sum(mut n: u64) -> u64 {
  let mut sum = 0;
  while n > 0 {
    sum += n % 10;
    n /= 10;
  }
  sum
}

impl fmt::Display for Arcana {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Display::fmt(&self.0, f)
  }
}

impl From<Arcana> for u32 {
  fn from(a: Arcana) -> u32 { u32::from(a.0) }
}

impl From<Arcana> for u64 {
  fn from(a: Arcana) -> u64 { u64::from(a.0) }
}

impl<'de> Deserialize<'de> for Arcana {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let n = u32::deserialize(deserializer)?;
    Arcana::new(n).ok_or_else(|| {
      serde::de::Error::custom(format!("arcana {n} is outside 1..=22"))
    })
  }
}
