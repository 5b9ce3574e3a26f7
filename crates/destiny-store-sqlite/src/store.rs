//! [`SqliteStore`], the SQLite implementation of [`MatrixStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use destiny_core::{
  entitlement::{
    NewPayment, NewSubscription, Payment, PaymentStatus, Subscription, SubscriptionStatus,
    grants_full_unlock,
  },
  interpretation::{Interpretation, NewQuestion, Question, QuestionDenial},
  record::{NewMatrix, StoredMatrix},
  store::MatrixStore,
};

use crate::{
  Error, Result,
  encode::{
    MATRIX_COLUMNS, PAYMENT_COLUMNS, QUESTION_COLUMNS, RawInterpretation, RawMatrix, RawPayment,
    RawQuestion, RawSubscription, SUBSCRIPTION_COLUMNS, encode_calculation, encode_dt,
    encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Destiny Matrix store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

/// Outcome of a write that may hit a missing parent row.
enum Outcome<T> {
  Done(T),
  Missing,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn payments_for_matrix(&self, matrix_id: Uuid) -> Result<Vec<Payment>> {
    let id_str = encode_uuid(matrix_id);

    let raws: Vec<RawPayment> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PAYMENT_COLUMNS} FROM payments WHERE matrix_id = ?1"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], RawPayment::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPayment::into_payment).collect()
  }
}

fn matrix_exists(conn: &rusqlite::Connection, id: &str) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row(
        "SELECT 1 FROM matrices WHERE matrix_id = ?1",
        rusqlite::params![id],
        |_| Ok(true),
      )
      .optional()?
      .unwrap_or(false),
  )
}

// ─── MatrixStore impl ────────────────────────────────────────────────────────

impl MatrixStore for SqliteStore {
  type Error = Error;

  // ── Matrices ──────────────────────────────────────────────────────────────

  async fn save_matrix(&self, input: NewMatrix) -> Result<StoredMatrix> {
    let matrix = StoredMatrix {
      matrix_id:   Uuid::new_v4(),
      calculation: input.calculate(),
      user_id:     input.user_id,
      name:        input.name,
      birth_date:  input.birth_date,
      gender:      input.gender,
      created_at:  Utc::now(),
    };

    let id_str          = encode_uuid(matrix.matrix_id);
    let user_str        = matrix.user_id.map(encode_uuid);
    let name            = matrix.name.clone();
    let birth_str       = matrix.birth_date.to_string();
    let gender_str      = matrix.gender.as_str();
    let (numbers, data) = encode_calculation(&matrix.calculation)?;
    let at_str          = encode_dt(matrix.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO matrices (
             matrix_id, user_id, name, birth_date, gender,
             arcana_numbers, matrix_data, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            id_str, user_str, name, birth_str, gender_str, numbers, data, at_str
          ],
        )?;
        Ok(())
      })
      .await?;

    tracing::debug!(matrix_id = %matrix.matrix_id, "matrix stored");
    Ok(matrix)
  }

  async fn get_matrix(&self, id: Uuid) -> Result<Option<StoredMatrix>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawMatrix> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {MATRIX_COLUMNS} FROM matrices WHERE matrix_id = ?1"),
              rusqlite::params![id_str],
              RawMatrix::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawMatrix::into_matrix).transpose()
  }

  async fn list_user_matrices(&self, user_id: Uuid) -> Result<Vec<StoredMatrix>> {
    let user_str = encode_uuid(user_id);

    let raws: Vec<RawMatrix> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {MATRIX_COLUMNS} FROM matrices WHERE user_id = ?1
           ORDER BY created_at, rowid"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![user_str], RawMatrix::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMatrix::into_matrix).collect()
  }

  // ── Payments ──────────────────────────────────────────────────────────────

  async fn record_payment(&self, input: NewPayment) -> Result<Payment> {
    let payment = Payment {
      payment_id:         Uuid::new_v4(),
      user_id:            input.user_id,
      matrix_id:          input.matrix_id,
      kind:               input.kind,
      amount_cents:       input.amount_cents,
      currency:           input.currency.to_ascii_uppercase(),
      provider_reference: input.provider_reference,
      status:             input.status,
      created_at:         Utc::now(),
    };

    let id_str     = encode_uuid(payment.payment_id);
    let user_str   = payment.user_id.map(encode_uuid);
    let matrix_str = payment.matrix_id.map(encode_uuid);
    let kind_str   = payment.kind.as_str();
    let amount     = payment.amount_cents;
    let currency   = payment.currency.clone();
    let reference  = payment.provider_reference.clone();
    let status_str = payment.status.as_str();
    let at_str     = encode_dt(payment.created_at);

    let outcome = self
      .conn
      .call(move |conn| {
        if let Some(m) = &matrix_str
          && !matrix_exists(conn, m)?
        {
          return Ok(Outcome::Missing);
        }
        conn.execute(
          "INSERT INTO payments (
             payment_id, user_id, matrix_id, kind, amount_cents,
             currency, provider_reference, status, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![
            id_str, user_str, matrix_str, kind_str, amount, currency, reference, status_str,
            at_str
          ],
        )?;
        Ok(Outcome::Done(()))
      })
      .await?;

    match outcome {
      Outcome::Done(()) => Ok(payment),
      Outcome::Missing => Err(Error::MatrixNotFound(payment.matrix_id.unwrap_or_default())),
    }
  }

  async fn get_payment(&self, id: Uuid) -> Result<Option<Payment>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawPayment> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {PAYMENT_COLUMNS} FROM payments WHERE payment_id = ?1"),
              rusqlite::params![id_str],
              RawPayment::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPayment::into_payment).transpose()
  }

  async fn set_payment_status(&self, id: Uuid, status: PaymentStatus) -> Result<Payment> {
    let id_str     = encode_uuid(id);
    let status_str = status.as_str();

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE payments SET status = ?2 WHERE payment_id = ?1",
          rusqlite::params![id_str, status_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::PaymentNotFound(id));
    }
    self.get_payment(id).await?.ok_or(Error::PaymentNotFound(id))
  }

  // ── Subscriptions ─────────────────────────────────────────────────────────

  async fn record_subscription(&self, input: NewSubscription) -> Result<Subscription> {
    let now = Utc::now();
    let subscription = Subscription {
      subscription_id:          Uuid::new_v4(),
      user_id:                  input.user_id,
      provider_subscription_id: input.provider_subscription_id,
      provider_customer_id:     input.provider_customer_id,
      status:                   input.status,
      current_period_end:       input.current_period_end,
      created_at:               now,
      updated_at:               now,
    };

    let id_str       = encode_uuid(subscription.subscription_id);
    let user_str     = encode_uuid(subscription.user_id);
    let provider_sub = subscription.provider_subscription_id.clone();
    let provider_cus = subscription.provider_customer_id.clone();
    let status_str   = subscription.status.as_str();
    let period_str   = subscription.current_period_end.map(encode_dt);
    let at_str       = encode_dt(now);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO subscriptions (
             subscription_id, user_id, provider_subscription_id, provider_customer_id,
             status, current_period_end, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
          rusqlite::params![
            id_str, user_str, provider_sub, provider_cus, status_str, period_str, at_str
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(subscription)
  }

  async fn get_subscription(&self, id: Uuid) -> Result<Option<Subscription>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawSubscription> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions WHERE subscription_id = ?1"),
              rusqlite::params![id_str],
              RawSubscription::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSubscription::into_subscription).transpose()
  }

  async fn set_subscription_status(
    &self,
    id:     Uuid,
    status: SubscriptionStatus,
  ) -> Result<Subscription> {
    let id_str     = encode_uuid(id);
    let status_str = status.as_str();
    let at_str     = encode_dt(Utc::now());

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE subscriptions SET status = ?2, updated_at = ?3 WHERE subscription_id = ?1",
          rusqlite::params![id_str, status_str, at_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::SubscriptionNotFound(id));
    }
    self
      .get_subscription(id)
      .await?
      .ok_or(Error::SubscriptionNotFound(id))
  }

  async fn active_subscription(&self, user_id: Uuid) -> Result<Option<Subscription>> {
    let user_str   = encode_uuid(user_id);
    let status_str = SubscriptionStatus::Active.as_str();

    let raw: Option<RawSubscription> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions
                 WHERE user_id = ?1 AND status = ?2
                 ORDER BY created_at DESC LIMIT 1"
              ),
              rusqlite::params![user_str, status_str],
              RawSubscription::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSubscription::into_subscription).transpose()
  }

  async fn has_full_unlock(&self, matrix_id: Uuid, viewer: Option<Uuid>) -> Result<bool> {
    let subscription = match viewer {
      Some(user_id) => self.active_subscription(user_id).await?,
      None => None,
    };
    let payments = self.payments_for_matrix(matrix_id).await?;
    Ok(grants_full_unlock(subscription.as_ref(), &payments))
  }

  // ── Interpretations ───────────────────────────────────────────────────────

  async fn attach_interpretation(&self, matrix_id: Uuid, text: String) -> Result<Interpretation> {
    let interpretation = Interpretation { matrix_id, text, created_at: Utc::now() };

    let id_str = encode_uuid(matrix_id);
    let body   = interpretation.text.clone();
    let at_str = encode_dt(interpretation.created_at);

    let outcome = self
      .conn
      .call(move |conn| {
        if !matrix_exists(conn, &id_str)? {
          return Ok(Outcome::Missing);
        }
        conn.execute(
          "INSERT INTO interpretations (matrix_id, text, created_at) VALUES (?1, ?2, ?3)
           ON CONFLICT (matrix_id) DO UPDATE SET text = excluded.text,
                                                 created_at = excluded.created_at",
          rusqlite::params![id_str, body, at_str],
        )?;
        Ok(Outcome::Done(()))
      })
      .await?;

    match outcome {
      Outcome::Done(()) => Ok(interpretation),
      Outcome::Missing => Err(Error::MatrixNotFound(matrix_id)),
    }
  }

  async fn get_interpretation(&self, matrix_id: Uuid) -> Result<Option<Interpretation>> {
    let id_str = encode_uuid(matrix_id);

    let raw: Option<RawInterpretation> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT matrix_id, text, created_at FROM interpretations WHERE matrix_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawInterpretation {
                  matrix_id:  row.get(0)?,
                  text:       row.get(1)?,
                  created_at: row.get(2)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawInterpretation::into_interpretation).transpose()
  }

  // ── Questions ─────────────────────────────────────────────────────────────

  async fn record_question(
    &self,
    input: NewQuestion,
  ) -> Result<Result<Question, QuestionDenial>> {
    let question = Question {
      question_id: Uuid::new_v4(),
      matrix_id:   input.matrix_id,
      user_id:     input.user_id,
      question:    input.question,
      answer:      None,
      payment_id:  input.payment_id,
      created_at:  Utc::now(),
    };

    let id_str      = encode_uuid(question.question_id);
    let matrix_str  = encode_uuid(question.matrix_id);
    let user_str    = encode_uuid(question.user_id);
    let body        = question.question.clone();
    let payment_str = question.payment_id.map(encode_uuid);
    let at_str      = encode_dt(question.created_at);

    // `Done(false)` means the payment was already taken.
    let outcome = self
      .conn
      .call(move |conn| {
        if !matrix_exists(conn, &matrix_str)? {
          return Ok(Outcome::Missing);
        }
        if let Some(p) = &payment_str {
          let taken = conn
            .query_row(
              "SELECT 1 FROM questions WHERE payment_id = ?1",
              rusqlite::params![p],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
          if taken {
            return Ok(Outcome::Done(false));
          }
        }
        conn.execute(
          "INSERT INTO questions (
             question_id, matrix_id, user_id, question, answer, payment_id, created_at
           ) VALUES (?1, ?2, ?3, ?4, NULL, ?5, ?6)",
          rusqlite::params![id_str, matrix_str, user_str, body, payment_str, at_str],
        )?;
        Ok(Outcome::Done(true))
      })
      .await?;

    match outcome {
      Outcome::Done(true) => Ok(Ok(question)),
      Outcome::Done(false) => {
        tracing::debug!(payment_id = ?question.payment_id, "payment already taken");
        Ok(Err(QuestionDenial::PaymentAlreadyUsed))
      }
      Outcome::Missing => Err(Error::MatrixNotFound(question.matrix_id)),
    }
  }

  async fn get_question(&self, id: Uuid) -> Result<Option<Question>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawQuestion> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {QUESTION_COLUMNS} FROM questions WHERE question_id = ?1"),
              rusqlite::params![id_str],
              RawQuestion::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawQuestion::into_question).transpose()
  }

  async fn payment_used(&self, payment_id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(payment_id);

    let used = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM questions WHERE payment_id = ?1",
              rusqlite::params![id_str],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;

    Ok(used)
  }

  async fn answer_question(&self, question_id: Uuid, answer: String) -> Result<Question> {
    let id_str = encode_uuid(question_id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE questions SET answer = ?2 WHERE question_id = ?1",
          rusqlite::params![id_str, answer],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::QuestionNotFound(question_id));
    }
    self
      .get_question(question_id)
      .await?
      .ok_or(Error::QuestionNotFound(question_id))
  }

  async fn list_questions(&self, matrix_id: Uuid, user_id: Option<Uuid>) -> Result<Vec<Question>> {
    let matrix_str = encode_uuid(matrix_id);
    let user_str   = user_id.map(encode_uuid);

    let raws: Vec<RawQuestion> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {QUESTION_COLUMNS} FROM questions
           WHERE matrix_id = ?1 AND (?2 IS NULL OR user_id = ?2)
           ORDER BY created_at, rowid"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![matrix_str, user_str], RawQuestion::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawQuestion::into_question).collect()
  }
}
