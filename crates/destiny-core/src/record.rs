//! Stored matrices: a calculation plus the submission it came from.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{BirthDate, Error, MatrixCalculation, Result};

/// Carried through for storage only; the calculator never reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
  Male,
  Female,
}

impl Gender {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Male => "male",
      Self::Female => "female",
    }
  }

  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "male" => Ok(Self::Male),
      "female" => Ok(Self::Female),
      other => Err(Error::UnknownVariant { kind: "gender", value: other.to_owned() }),
    }
  }
}

impl fmt::Display for Gender {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Input to [`crate::store::MatrixStore::save_matrix`].
#[derive(Debug, Clone)]
pub struct NewMatrix {
  /// The submitting user, if the request carried one.
  pub user_id:    Option<Uuid>,
  pub name:       String,
  pub birth_date: BirthDate,
  pub gender:     Gender,
}

impl NewMatrix {
  /// Run the calculator for this submission.
  pub fn calculate(&self) -> MatrixCalculation {
    MatrixCalculation::from_date(self.birth_date)
  }
}

/// A persisted matrix. Immutable once written; interpretations and questions
/// refer to it by `matrix_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredMatrix {
  pub matrix_id:   Uuid,
  pub user_id:     Option<Uuid>,
  pub name:        String,
  pub birth_date:  BirthDate,
  pub gender:      Gender,
  pub calculation: MatrixCalculation,
  pub created_at:  DateTime<Utc>,
}
