//! JSON REST API for the Destiny Matrix.
//!
//! Exposes an axum [`Router`] backed by any [`destiny_core::store::MatrixStore`].
//! TLS and user authentication are the caller's responsibility; the viewer is
//! read from the `x-user-id` header and operator routes check HTTP Basic
//! credentials.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", destiny_api::api_router(state))
//! ```

pub mod arcana;
pub mod auth;
pub mod entitlements;
pub mod error;
pub mod etag;
pub mod interpretations;
pub mod matrices;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use destiny_core::store::MatrixStore;

pub use auth::{OperatorAuth, Viewer};
pub use error::ApiError;

/// Shared state threaded through all handlers.
pub struct ApiState<S: MatrixStore> {
  pub store:    Arc<S>,
  pub operator: Arc<OperatorAuth>,
}

impl<S: MatrixStore> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), operator: Arc::clone(&self.operator) }
  }
}

impl<S: MatrixStore> ApiState<S> {
  pub fn new(store: S, operator: OperatorAuth) -> Self {
    Self { store: Arc::new(store), operator: Arc::new(operator) }
  }
}

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: MatrixStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Matrices
    .route("/matrices", post(matrices::create::<S>))
    .route("/matrices/{id}", get(matrices::get_one::<S>))
    .route("/matrices/{id}/access", get(matrices::access::<S>))
    .route("/users/{user_id}/matrices", get(matrices::list_for_user::<S>))
    // Arcana metadata
    .route("/arcana", get(arcana::list))
    .route("/arcana/{n}", get(arcana::get_one))
    // Interpretations and questions
    .route(
      "/matrices/{id}/interpretation",
      get(interpretations::get_interpretation::<S>).put(interpretations::put_interpretation::<S>),
    )
    .route("/matrices/{id}/prompt", get(interpretations::get_prompt::<S>))
    .route(
      "/matrices/{id}/questions",
      get(interpretations::list_questions::<S>).post(interpretations::ask::<S>),
    )
    .route("/questions/{id}/answer", put(interpretations::answer::<S>))
    // Payments and subscriptions
    .route("/payments", post(entitlements::create_payment::<S>))
    .route("/payments/{id}/status", post(entitlements::payment_status::<S>))
    .route("/subscriptions", post(entitlements::create_subscription::<S>))
    .route("/subscriptions/{id}/status", post(entitlements::subscription_status::<S>))
    .with_state(state)
}
