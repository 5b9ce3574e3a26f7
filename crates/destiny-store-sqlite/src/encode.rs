//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, UUIDs hyphenated lowercase strings, enums
//! their lowercase text form, and calculations compact JSON.

use chrono::{DateTime, Utc};
use destiny_core::{
  BirthDate, Error as CoreError, MatrixCalculation,
  entitlement::{Payment, PaymentKind, PaymentStatus, Subscription, SubscriptionStatus},
  interpretation::{Interpretation, Question},
  record::{Gender, StoredMatrix},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

fn decode_opt_uuid(s: Option<String>) -> Result<Option<Uuid>> {
  s.as_deref().map(decode_uuid).transpose()
}

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Calculation ─────────────────────────────────────────────────────────────

/// `(arcana_numbers, matrix_data)` column values.
pub fn encode_calculation(c: &MatrixCalculation) -> Result<(String, String)> {
  Ok((serde_json::to_string(&c.all_arcana)?, serde_json::to_string(c)?))
}

pub fn decode_calculation(matrix_data: &str) -> Result<MatrixCalculation> {
  let c: MatrixCalculation = serde_json::from_str(matrix_data)?;
  if !c.is_consistent() {
    tracing::debug!(matrix_data, "stored calculation failed consistency check");
    return Err(CoreError::InconsistentCalculation.into());
  }
  Ok(c)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `matrices` row.
pub struct RawMatrix {
  pub matrix_id:   String,
  pub user_id:     Option<String>,
  pub name:        String,
  pub birth_date:  String,
  pub gender:      String,
  pub matrix_data: String,
  pub created_at:  String,
}

pub const MATRIX_COLUMNS: &str =
  "matrix_id, user_id, name, birth_date, gender, matrix_data, created_at";

impl RawMatrix {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      matrix_id:   row.get(0)?,
      user_id:     row.get(1)?,
      name:        row.get(2)?,
      birth_date:  row.get(3)?,
      gender:      row.get(4)?,
      matrix_data: row.get(5)?,
      created_at:  row.get(6)?,
    })
  }

  pub fn into_matrix(self) -> Result<StoredMatrix> {
    Ok(StoredMatrix {
      matrix_id:   decode_uuid(&self.matrix_id)?,
      user_id:     decode_opt_uuid(self.user_id)?,
      name:        self.name,
      birth_date:  BirthDate::parse(&self.birth_date)?,
      gender:      Gender::parse(&self.gender)?,
      calculation: decode_calculation(&self.matrix_data)?,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `payments` row.
pub struct RawPayment {
  pub payment_id:         String,
  pub user_id:            Option<String>,
  pub matrix_id:          Option<String>,
  pub kind:               String,
  pub amount_cents:       u32,
  pub currency:           String,
  pub provider_reference: Option<String>,
  pub status:             String,
  pub created_at:         String,
}

pub const PAYMENT_COLUMNS: &str = "payment_id, user_id, matrix_id, kind, amount_cents, \
                                   currency, provider_reference, status, created_at";

impl RawPayment {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      payment_id:         row.get(0)?,
      user_id:            row.get(1)?,
      matrix_id:          row.get(2)?,
      kind:               row.get(3)?,
      amount_cents:       row.get(4)?,
      currency:           row.get(5)?,
      provider_reference: row.get(6)?,
      status:             row.get(7)?,
      created_at:         row.get(8)?,
    })
  }

  pub fn into_payment(self) -> Result<Payment> {
    Ok(Payment {
      payment_id:         decode_uuid(&self.payment_id)?,
      user_id:            decode_opt_uuid(self.user_id)?,
      matrix_id:          decode_opt_uuid(self.matrix_id)?,
      kind:               PaymentKind::parse(&self.kind)?,
      amount_cents:       self.amount_cents,
      currency:           self.currency,
      provider_reference: self.provider_reference,
      status:             PaymentStatus::parse(&self.status)?,
      created_at:         decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `subscriptions` row.
pub struct RawSubscription {
  pub subscription_id:          String,
  pub user_id:                  String,
  pub provider_subscription_id: Option<String>,
  pub provider_customer_id:     Option<String>,
  pub status:                   String,
  pub current_period_end:       Option<String>,
  pub created_at:               String,
  pub updated_at:               String,
}

pub const SUBSCRIPTION_COLUMNS: &str = "subscription_id, user_id, provider_subscription_id, \
                                        provider_customer_id, status, current_period_end, \
                                        created_at, updated_at";

impl RawSubscription {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      subscription_id:          row.get(0)?,
      user_id:                  row.get(1)?,
      provider_subscription_id: row.get(2)?,
      provider_customer_id:     row.get(3)?,
      status:                   row.get(4)?,
      current_period_end:       row.get(5)?,
      created_at:               row.get(6)?,
      updated_at:               row.get(7)?,
    })
  }

  pub fn into_subscription(self) -> Result<Subscription> {
    Ok(Subscription {
      subscription_id:          decode_uuid(&self.subscription_id)?,
      user_id:                  decode_uuid(&self.user_id)?,
      provider_subscription_id: self.provider_subscription_id,
      provider_customer_id:     self.provider_customer_id,
      status:                   SubscriptionStatus::parse(&self.status)?,
      current_period_end:       self.current_period_end.as_deref().map(decode_dt).transpose()?,
      created_at:               decode_dt(&self.created_at)?,
      updated_at:               decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw strings read directly from an `interpretations` row.
pub struct RawInterpretation {
  pub matrix_id:  String,
  pub text:       String,
  pub created_at: String,
}

impl RawInterpretation {
  pub fn into_interpretation(self) -> Result<Interpretation> {
    Ok(Interpretation {
      matrix_id:  decode_uuid(&self.matrix_id)?,
      text:       self.text,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `questions` row.
pub struct RawQuestion {
  pub question_id: String,
  pub matrix_id:   String,
  pub user_id:     String,
  pub question:    String,
  pub answer:      Option<String>,
  pub payment_id:  Option<String>,
  pub created_at:  String,
}

pub const QUESTION_COLUMNS: &str =
  "question_id, matrix_id, user_id, question, answer, payment_id, created_at";

impl RawQuestion {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      question_id: row.get(0)?,
      matrix_id:   row.get(1)?,
      user_id:     row.get(2)?,
      question:    row.get(3)?,
      answer:      row.get(4)?,
      payment_id:  row.get(5)?,
      created_at:  row.get(6)?,
    })
  }

  pub fn into_question(self) -> Result<Question> {
    Ok(Question {
      question_id: decode_uuid(&self.question_id)?,
      matrix_id:   decode_uuid(&self.matrix_id)?,
      user_id:     decode_uuid(&self.user_id)?,
      question:    self.question,
      answer:      self.answer,
      payment_id:  decode_opt_uuid(self.payment_id)?,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}
