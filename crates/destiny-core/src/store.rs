//! The `MatrixStore` trait.
//!
//! Implemented by storage backends (e.g. `destiny-store-sqlite`). The HTTP
//! layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  entitlement::{NewPayment, NewSubscription, Payment, PaymentStatus, Subscription, SubscriptionStatus},
  interpretation::{Interpretation, NewQuestion, Question, QuestionDenial},
  record::{NewMatrix, StoredMatrix},
};

/// Abstraction over a Destiny Matrix store backend.
///
/// Matrices are write-once. Everything else (payments, subscriptions,
/// interpretations, questions) refers to a matrix or a user by id.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait MatrixStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Matrices ──────────────────────────────────────────────────────────

  /// Calculate and persist a matrix. The id and `created_at` are assigned by
  /// the store.
  fn save_matrix(
    &self,
    input: NewMatrix,
  ) -> impl Future<Output = Result<StoredMatrix, Self::Error>> + Send + '_;

  /// Retrieve a matrix by id. Returns `None` if not found.
  fn get_matrix(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<StoredMatrix>, Self::Error>> + Send + '_;

  /// All matrices submitted by `user_id`, oldest first.
  fn list_user_matrices(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<StoredMatrix>, Self::Error>> + Send + '_;

  // ── Payments ──────────────────────────────────────────────────────────

  /// Record a payment. Fails if it names a matrix that does not exist.
  fn record_payment(
    &self,
    input: NewPayment,
  ) -> impl Future<Output = Result<Payment, Self::Error>> + Send + '_;

  fn get_payment(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Payment>, Self::Error>> + Send + '_;

  /// Move a payment to `status`. Fails if the payment does not exist.
  fn set_payment_status(
    &self,
    id: Uuid,
    status: PaymentStatus,
  ) -> impl Future<Output = Result<Payment, Self::Error>> + Send + '_;

  // ── Subscriptions ─────────────────────────────────────────────────────

  fn record_subscription(
    &self,
    input: NewSubscription,
  ) -> impl Future<Output = Result<Subscription, Self::Error>> + Send + '_;

  fn get_subscription(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Subscription>, Self::Error>> + Send + '_;

  /// Move a subscription to `status` and bump `updated_at`.
  fn set_subscription_status(
    &self,
    id: Uuid,
    status: SubscriptionStatus,
  ) -> impl Future<Output = Result<Subscription, Self::Error>> + Send + '_;

  /// The user's active subscription, if any.
  fn active_subscription(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<Subscription>, Self::Error>> + Send + '_;

  /// Whether `viewer` may see the interpretation of `matrix_id`; see
  /// [`crate::entitlement::grants_full_unlock`].
  fn has_full_unlock(
    &self,
    matrix_id: Uuid,
    viewer: Option<Uuid>,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Interpretations ───────────────────────────────────────────────────

  /// Attach (or replace) the interpretation of a matrix. Fails if the matrix
  /// does not exist.
  fn attach_interpretation(
    &self,
    matrix_id: Uuid,
    text: String,
  ) -> impl Future<Output = Result<Interpretation, Self::Error>> + Send + '_;

  fn get_interpretation(
    &self,
    matrix_id: Uuid,
  ) -> impl Future<Output = Result<Option<Interpretation>, Self::Error>> + Send + '_;

  // ── Questions ─────────────────────────────────────────────────────────

  /// Record a question. Entitlement is checked by the caller
  /// ([`crate::interpretation::may_ask`]); the store rejects unknown matrices
  /// with an error. A payment already taken by another question yields
  /// `Ok(Err(QuestionDenial::PaymentAlreadyUsed))`, decided atomically with
  /// the insert.
  fn record_question(
    &self,
    input: NewQuestion,
  ) -> impl Future<Output = Result<Result<Question, QuestionDenial>, Self::Error>> + Send + '_;

  fn get_question(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Question>, Self::Error>> + Send + '_;

  /// Whether a question already references `payment_id`.
  fn payment_used(
    &self,
    payment_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Set the answer to a question.
  fn answer_question(
    &self,
    question_id: Uuid,
    answer: String,
  ) -> impl Future<Output = Result<Question, Self::Error>> + Send + '_;

  /// Questions about `matrix_id`, optionally only those asked by `user_id`,
  /// oldest first.
  fn list_questions(
    &self,
    matrix_id: Uuid,
    user_id: Option<Uuid>,
  ) -> impl Future<Output = Result<Vec<Question>, Self::Error>> + Send + '_;
}
