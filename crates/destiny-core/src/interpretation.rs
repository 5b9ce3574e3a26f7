//! Artifacts attached to a stored matrix after the fact.
//!
//! Neither is part of the matrix itself: both are keyed by `matrix_id` and
//! arrive later, written by whatever produces the text.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entitlement::{Payment, PaymentKind, PaymentStatus, Subscription, SubscriptionStatus};

/// Long-form reading of a matrix. At most one per matrix; attaching again
/// replaces it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interpretation {
  pub matrix_id:  Uuid,
  pub text:       String,
  pub created_at: DateTime<Utc>,
}

/// A user's question about a matrix, answered asynchronously.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
  pub question_id: Uuid,
  pub matrix_id:   Uuid,
  pub user_id:     Uuid,
  pub question:    String,
  pub answer:      Option<String>,
  /// The single-question payment that paid for this, if not a subscriber.
  pub payment_id:  Option<Uuid>,
  pub created_at:  DateTime<Utc>,
}

/// Input to [`crate::store::MatrixStore::record_question`].
#[derive(Debug, Clone)]
pub struct NewQuestion {
  pub matrix_id:  Uuid,
  pub user_id:    Uuid,
  pub question:   String,
  pub payment_id: Option<Uuid>,
}

/// Why a question may not be asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionDenial {
  /// No active subscription and no payment offered.
  NotEntitled,
  /// The offered payment is not a completed single-question payment of the
  /// asker, or it is for another matrix.
  PaymentNotUsable,
  /// The offered payment already paid for another question.
  PaymentAlreadyUsed,
}

/// Decide whether `user_id` may ask a question about `matrix_id`.
///
/// Subscribers always may; `payment` is then ignored and not consumed.
/// Otherwise `payment` must be a completed single-question payment made by
/// the asker, either unbound or bound to this matrix, and not yet used.
pub fn may_ask(
  user_id: Uuid,
  matrix_id: Uuid,
  subscription: Option<&Subscription>,
  payment: Option<&Payment>,
  payment_used: bool,
) -> Result<Option<Uuid>, QuestionDenial> {
  if subscription.is_some_and(|s| s.status == SubscriptionStatus::Active) {
    return Ok(None);
  }
  let payment = payment.ok_or(QuestionDenial::NotEntitled)?;
  let usable = payment.kind == PaymentKind::SingleQuestion
    && payment.status == PaymentStatus::Completed
    && payment.user_id == Some(user_id)
    && payment.matrix_id.is_none_or(|m| m == matrix_id);
  if !usable {
    return Err(QuestionDenial::PaymentNotUsable);
  }
  if payment_used {
    return Err(QuestionDenial::PaymentAlreadyUsed);
  }
  Ok(Some(payment.payment_id))
}
