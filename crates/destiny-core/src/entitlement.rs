//! Payment and subscription records, and the rule that turns them into
//! access.
//!
//! Talking to the payment provider is somebody else's problem. These records
//! are the narrow effect that reaches us: "this payment completed", "this
//! subscription is active".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Payments ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentKind {
  /// Unlocks the interpretation of one matrix for every viewer.
  FullUnlock,
  /// Pays for one question about one matrix.
  SingleQuestion,
}

impl PaymentKind {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::FullUnlock => "full_unlock",
      Self::SingleQuestion => "single_question",
    }
  }

  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "full_unlock" => Ok(Self::FullUnlock),
      "single_question" => Ok(Self::SingleQuestion),
      other => Err(unknown("payment kind", other)),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
  #[default]
  Pending,
  Completed,
  Failed,
}

impl PaymentStatus {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Pending => "pending",
      Self::Completed => "completed",
      Self::Failed => "failed",
    }
  }

  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "pending" => Ok(Self::Pending),
      "completed" => Ok(Self::Completed),
      "failed" => Ok(Self::Failed),
      other => Err(unknown("payment status", other)),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
  pub payment_id:         Uuid,
  pub user_id:            Option<Uuid>,
  pub matrix_id:          Option<Uuid>,
  pub kind:               PaymentKind,
  /// Minor currency units (799 = 7.99).
  pub amount_cents:       u32,
  /// ISO 4217 code, upper case.
  pub currency:           String,
  /// The provider's identifier for the charge, if known.
  pub provider_reference: Option<String>,
  pub status:             PaymentStatus,
  pub created_at:         DateTime<Utc>,
}

/// Input to [`crate::store::MatrixStore::record_payment`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewPayment {
  pub user_id:            Option<Uuid>,
  pub matrix_id:          Option<Uuid>,
  pub kind:               PaymentKind,
  pub amount_cents:       u32,
  #[serde(default = "default_currency")]
  pub currency:           String,
  pub provider_reference: Option<String>,
  #[serde(default)]
  pub status:             PaymentStatus,
}

pub fn default_currency() -> String { "EUR".to_owned() }

// ─── Subscriptions ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
  #[default]
  Active,
  Canceled,
  PastDue,
}

impl SubscriptionStatus {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Active => "active",
      Self::Canceled => "canceled",
      Self::PastDue => "past_due",
    }
  }

  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "active" => Ok(Self::Active),
      "canceled" => Ok(Self::Canceled),
      "past_due" => Ok(Self::PastDue),
      other => Err(unknown("subscription status", other)),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
  pub subscription_id:          Uuid,
  pub user_id:                  Uuid,
  pub provider_subscription_id: Option<String>,
  pub provider_customer_id:     Option<String>,
  pub status:                   SubscriptionStatus,
  pub current_period_end:       Option<DateTime<Utc>>,
  pub created_at:               DateTime<Utc>,
  pub updated_at:               DateTime<Utc>,
}

/// Input to [`crate::store::MatrixStore::record_subscription`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewSubscription {
  pub user_id:                  Uuid,
  pub provider_subscription_id: Option<String>,
  pub provider_customer_id:     Option<String>,
  #[serde(default)]
  pub status:                   SubscriptionStatus,
  pub current_period_end:       Option<DateTime<Utc>>,
}

// ─── Access rule ─────────────────────────────────────────────────────────────

/// Whether the interpretation of a matrix may be shown.
///
/// An active subscription unlocks every matrix for its holder. Without one,
/// a completed full-unlock payment for the matrix unlocks it for everyone.
pub fn grants_full_unlock(
  viewer_subscription: Option<&Subscription>,
  matrix_payments: &[Payment],
) -> bool {
  if viewer_subscription.is_some_and(|s| s.status == SubscriptionStatus::Active) {
    return true;
  }
  matrix_payments
    .iter()
    .any(|p| p.kind == PaymentKind::FullUnlock && p.status == PaymentStatus::Completed)
}

fn unknown(kind: &'static str, value: &str) -> Error {
  Error::UnknownVariant { kind, value: value.to_owned() }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn payment(kind: PaymentKind, status: PaymentStatus) -> Payment {
    Payment {
      payment_id: Uuid::new_v4(),
      user_id: None,
      matrix_id: Some(Uuid::nil()),
      kind,
      amount_cents: 799,
      currency: default_currency(),
      provider_reference: None,
      status,
      created_at: Utc::now(),
    }
  }

  fn subscription(status: SubscriptionStatus) -> Subscription {
    Subscription {
      subscription_id: Uuid::new_v4(),
      user_id: Uuid::new_v4(),
      provider_subscription_id: None,
      provider_customer_id: None,
      status,
      current_period_end: None,
      created_at: Utc::now(),
      updated_at: Utc::now(),
    }
  }

  #[test]
  fn nothing_grants_nothing() {
    assert!(!grants_full_unlock(None, &[]));
  }

  #[test]
  fn active_subscription_grants() {
    assert!(grants_full_unlock(Some(&subscription(SubscriptionStatus::Active)), &[]));
    assert!(!grants_full_unlock(Some(&subscription(SubscriptionStatus::PastDue)), &[]));
  }

  #[test]
  fn only_completed_full_unlock_payment_grants() {
    let pending = payment(PaymentKind::FullUnlock, PaymentStatus::Pending);
    let question = payment(PaymentKind::SingleQuestion, PaymentStatus::Completed);
    let done = payment(PaymentKind::FullUnlock, PaymentStatus::Completed);

    assert!(!grants_full_unlock(None, &[pending.clone(), question.clone()]));
    assert!(grants_full_unlock(None, &[pending, question, done]));
  }

  #[test]
  fn enum_text_forms_roundtrip() {
    for s in ["active", "canceled", "past_due"] {
      assert_eq!(SubscriptionStatus::parse(s).unwrap().as_str(), s);
    }
    for s in ["pending", "completed", "failed"] {
      assert_eq!(PaymentStatus::parse(s).unwrap().as_str(), s);
    }
    assert!(PaymentKind::parse("refund").is_err());
  }
}
