//! Error type for `destiny-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] destiny_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("matrix not found: {0}")]
  MatrixNotFound(uuid::Uuid),

  #[error("payment not found: {0}")]
  PaymentNotFound(uuid::Uuid),

  #[error("subscription not found: {0}")]
  SubscriptionNotFound(uuid::Uuid),

  #[error("question not found: {0}")]
  QuestionNotFound(uuid::Uuid),
}

impl Error {
  /// True for the "no such row" variants, which callers usually map to 404.
  pub fn is_not_found(&self) -> bool {
    matches!(
      self,
      Self::MatrixNotFound(_)
        | Self::PaymentNotFound(_)
        | Self::SubscriptionNotFound(_)
        | Self::QuestionNotFound(_)
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
