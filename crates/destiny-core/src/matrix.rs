//! The Destiny Matrix calculator.
//!
//! Two inputs feed different parts of the matrix:
//!
//! - the seven key positions (`destiny` through `spiritual`) reduce sums of the
//!   **raw** day, month and year;
//! - the fifteen composite positions reduce sums of values that are already
//!   arcana (the reduced day/month/year and the key positions).
//!
//! Swapping one for the other changes the result, so each position spells out
//! which it uses.

use serde::{Deserialize, Serialize};

use crate::{Arcana, BirthDate, Result};

/// Number of entries in [`MatrixCalculation::all_arcana`].
pub const MATRIX_LEN: usize = 22;

/// Number of composite positions (layers A through E).
pub const COMPOSITE_LEN: usize = 15;

/// A complete matrix. Built once from a birth date and never modified.
///
/// `day`, `month` and `year` hold the *reduced* calendar components, not the
/// calendar numbers themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixCalculation {
  pub day:           Arcana,
  pub month:         Arcana,
  pub year:          Arcana,
  pub destiny:       Arcana,
  pub purpose:       Arcana,
  pub money:         Arcana,
  pub health:        Arcana,
  pub talents:       Arcana,
  pub relationships: Arcana,
  pub spiritual:     Arcana,
  /// Layers A–E in order: base pairs, key-position triads, then the triads of
  /// layers B and C combined once more.
  pub composites:    [Arcana; COMPOSITE_LEN],
  /// The ten named positions followed by layers A–D.
  pub all_arcana:    [Arcana; MATRIX_LEN],
}

/// Parse `birth_date` (`DD.MM.YYYY`) and build its matrix.
///
/// Only the segment structure is checked here; see [`BirthDate::parse`].
/// Callers accepting user input validate ranges first
/// ([`BirthDate::parse_checked`]).
pub fn calculate_matrix(birth_date: &str) -> Result<MatrixCalculation> {
  let date = BirthDate::parse(birth_date)?;
  Ok(MatrixCalculation::from_date(date))
}

impl MatrixCalculation {
  /// Build the matrix for `date`. Pure and infallible.
  pub fn from_date(date: BirthDate) -> Self {
    let BirthDate { day, month, year } = date;
    let (day, month, year) = (u64::from(day), u64::from(month), u64::from(year));

    let day_arcana = Arcana::reduce(day);
    let month_arcana = Arcana::reduce(month);
    let year_arcana = Arcana::reduce(year);

    // Raw sums.
    let destiny = Arcana::reduce(day + month + year);
    let purpose = Arcana::reduce(day + month);
    let money = Arcana::reduce(month + year);
    let health = Arcana::reduce(day + year);
    let talents = Arcana::reduce(day + u64::from(destiny));
    let relationships = Arcana::reduce(month + u64::from(destiny));
    let spiritual = Arcana::reduce(year + u64::from(destiny));

    // Arcana sums.
    let layer_a = cycle([day_arcana, month_arcana, year_arcana]);
    let layer_b = cycle([purpose, money, health]);
    let layer_c = cycle([talents, relationships, spiritual]);
    let layer_d = cycle(layer_b);
    let layer_e = cycle(layer_c);

    let mut composites = [Arcana::MIN; COMPOSITE_LEN];
    for (slot, value) in composites
      .iter_mut()
      .zip([layer_a, layer_b, layer_c, layer_d, layer_e].into_iter().flatten())
    {
      *slot = value;
    }

    Self::assemble(
      [
        day_arcana,
        month_arcana,
        year_arcana,
        destiny,
        purpose,
        money,
        health,
        talents,
        relationships,
        spiritual,
      ],
      composites,
    )
  }

  fn assemble(named: [Arcana; 10], composites: [Arcana; COMPOSITE_LEN]) -> Self {
    let [
      day,
      month,
      year,
      destiny,
      purpose,
      money,
      health,
      talents,
      relationships,
      spiritual,
    ] = named;

    let mut all_arcana = [Arcana::MIN; MATRIX_LEN];
    for (slot, value) in all_arcana
      .iter_mut()
      .zip(named.into_iter().chain(composites))
    {
      *slot = value;
    }

    Self {
      day,
      month,
      year,
      destiny,
      purpose,
      money,
      health,
      talents,
      relationships,
      spiritual,
      composites,
      all_arcana,
    }
  }

  /// The ten named positions in matrix order.
  pub fn named(&self) -> [Arcana; 10] {
    [
      self.day,
      self.month,
      self.year,
      self.destiny,
      self.purpose,
      self.money,
      self.health,
      self.talents,
      self.relationships,
      self.spiritual,
    ]
  }

  /// True if `all_arcana` and the composite layers agree with the named
  /// positions. A freshly built matrix always is; a decoded one might not be.
  pub fn is_consistent(&self) -> bool {
    let rebuilt = Self::assemble(self.named(), self.composites);
    let layer_b = cycle([self.purpose, self.money, self.health]);
    let layer_c = cycle([self.talents, self.relationships, self.spiritual]);
    rebuilt.all_arcana == self.all_arcana
      && self.composites[0..3] == cycle([self.day, self.month, self.year])
      && self.composites[3..6] == layer_b
      && self.composites[6..9] == layer_c
      && self.composites[9..12] == cycle(layer_b)
      && self.composites[12..15] == cycle(layer_c)
  }
}

/// `[a+b, b+c, c+a]`, each reduced.
fn cycle([a, b, c]: [Arcana; 3]) -> [Arcana; 3] {
  [a.combine(b), b.combine(c), c.combine(a)]
}

#[cfg(test)]
mod tests {
  use super::*;

  fn values<const N: usize>(arr: [Arcana; N]) -> Vec<u8> {
    arr.iter().map(|a| a.get()).collect()
  }

  #[test]
  fn reference_date_key_positions() {
    let m = calculate_matrix("15.03.1990").unwrap();
    assert_eq!(m.day.get(), 15);
    assert_eq!(m.month.get(), 3);
    assert_eq!(m.year.get(), 19);
    assert_eq!(m.destiny.get(), 10);
    assert_eq!(m.purpose.get(), 18);
    assert_eq!(m.money.get(), 22);
    assert_eq!(m.health.get(), 7);
    assert_eq!(m.talents.get(), 7);
    assert_eq!(m.relationships.get(), 13);
    assert_eq!(m.spiritual.get(), 2);
  }

  #[test]
  fn reference_date_full_sequence() {
    let m = calculate_matrix("15.03.1990").unwrap();
    assert_eq!(
      values(m.all_arcana),
      vec![
        15, 3, 19, 10, 18, 22, 7, 7, 13, 2, // named
        18, 22, 7, // layer A
        4, 11, 7, // layer B
        20, 15, 9, // layer C
        15, 18, 11, // layer D
      ]
    );
    assert_eq!(
      values(m.composites),
      vec![18, 22, 7, 4, 11, 7, 20, 15, 9, 15, 18, 11, 8, 6, 11]
    );
  }

  #[test]
  fn key_positions_use_raw_components() {
    // 29 reduces to 11, so a reduced-day implementation would give
    // purpose = reduce(11 + 1) = 12 instead of reduce(29 + 1) = 3.
    let m = calculate_matrix("29.01.2000").unwrap();
    assert_eq!(m.day.get(), 11);
    assert_eq!(m.purpose.get(), 3);
    // Layer A uses the reduced day: 11 + 1.
    assert_eq!(m.composites[0].get(), 12);
  }

  #[test]
  fn every_valid_date_stays_in_range() {
    for year in 1900..=2100 {
      for month in 1..=12 {
        for day in 1..=31 {
          let m = MatrixCalculation::from_date(BirthDate::new(day, month, year));
          assert_eq!(m.all_arcana.len(), MATRIX_LEN);
          assert!(
            m.all_arcana
              .iter()
              .chain(m.composites.iter())
              .all(|a| (1..=22).contains(&a.get())),
            "{day:02}.{month:02}.{year}"
          );
          assert!(m.is_consistent());
        }
      }
    }
  }

  #[test]
  fn calculation_is_deterministic() {
    let a = calculate_matrix("07.11.1984").unwrap();
    let b = calculate_matrix("07.11.1984").unwrap();
    assert_eq!(a, b);
    assert_eq!(
      serde_json::to_string(&a).unwrap(),
      serde_json::to_string(&b).unwrap()
    );
  }

  #[test]
  fn out_of_range_components_are_not_rejected() {
    let m = calculate_matrix("45.13.2500").unwrap();
    assert!(m.all_arcana.iter().all(|a| (1..=22).contains(&a.get())));
  }

  #[test]
  fn full_width_segments_do_not_overflow() {
    let max = u32::MAX;
    for input in [
      format!("{max}.01.1990"),
      format!("01.{max}.1990"),
      format!("01.01.{max}"),
      format!("{max}.{max}.{max}"),
    ] {
      let m = calculate_matrix(&input).unwrap();
      assert!(
        m.all_arcana.iter().chain(m.composites.iter()).all(|a| (1..=22).contains(&a.get())),
        "{input}"
      );
      assert!(m.is_consistent(), "{input}");
    }
    // 4294967295 + 1 + 1990 = 4294969286 → 59 → 14.
    assert_eq!(calculate_matrix(&format!("{max}.01.1990")).unwrap().destiny.get(), 14);
  }

  #[test]
  fn malformed_input_is_rejected() {
    assert!(matches!(
      calculate_matrix("1990-03-15"),
      Err(crate::Error::MalformedDateFormat(_))
    ));
    assert!(matches!(
      calculate_matrix("xx.03.1990"),
      Err(crate::Error::NonNumericSegment { .. })
    ));
  }

  #[test]
  fn tampered_sequence_is_inconsistent() {
    let mut m = calculate_matrix("15.03.1990").unwrap();
    m.all_arcana[21] = Arcana::MAX;
    assert!(!m.is_consistent());
  }
}
