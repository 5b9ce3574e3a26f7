//! Operator handlers for payments and subscriptions.
//!
//! These are the landing points for payment-provider events once something
//! upstream has verified them.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/payments` | Body: [`NewPayment`]; 201 |
//! | `POST` | `/payments/:id/status` | Body: `{"status":"completed"}` |
//! | `POST` | `/subscriptions` | Body: [`NewSubscription`]; 201 |
//! | `POST` | `/subscriptions/:id/status` | Body: `{"status":"canceled"}` |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use destiny_core::{
  entitlement::{NewPayment, NewSubscription, Payment, PaymentStatus, Subscription, SubscriptionStatus},
  store::MatrixStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, auth::Operator, error::ApiError, matrices::require_matrix};

// ─── Payments ─────────────────────────────────────────────────────────────────

/// `POST /payments`
pub async fn create_payment<S>(
  State(state): State<ApiState<S>>,
  _operator: Operator,
  Json(body): Json<NewPayment>,
) -> Result<impl IntoResponse, ApiError>
where
  S: MatrixStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if body.currency.len() != 3 || !body.currency.chars().all(|c| c.is_ascii_alphabetic()) {
    return Err(ApiError::BadRequest(format!("invalid currency code {:?}", body.currency)));
  }
  if let Some(matrix_id) = body.matrix_id {
    require_matrix(state.store.as_ref(), matrix_id).await?;
  }

  let payment = state
    .store
    .record_payment(body)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(
    payment_id = %payment.payment_id,
    kind = payment.kind.as_str(),
    status = payment.status.as_str(),
    "payment recorded"
  );
  Ok((StatusCode::CREATED, Json(payment)))
}

#[derive(Debug, Deserialize)]
pub struct PaymentStatusBody {
  pub status: PaymentStatus,
}

/// `POST /payments/:id/status`
pub async fn payment_status<S>(
  State(state): State<ApiState<S>>,
  _operator: Operator,
  Path(id): Path<Uuid>,
  Json(body): Json<PaymentStatusBody>,
) -> Result<Json<Payment>, ApiError>
where
  S: MatrixStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  state
    .store
    .get_payment(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("payment {id} not found")))?;
  let payment = state
    .store
    .set_payment_status(id, body.status)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(payment_id = %id, status = body.status.as_str(), "payment status changed");
  Ok(Json(payment))
}

// ─── Subscriptions ────────────────────────────────────────────────────────────

/// `POST /subscriptions`
pub async fn create_subscription<S>(
  State(state): State<ApiState<S>>,
  _operator: Operator,
  Json(body): Json<NewSubscription>,
) -> Result<impl IntoResponse, ApiError>
where
  S: MatrixStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let subscription = state
    .store
    .record_subscription(body)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(
    subscription_id = %subscription.subscription_id,
    user_id = %subscription.user_id,
    "subscription recorded"
  );
  Ok((StatusCode::CREATED, Json(subscription)))
}

#[derive(Debug, Deserialize)]
pub struct SubscriptionStatusBody {
  pub status: SubscriptionStatus,
}

/// `POST /subscriptions/:id/status`
pub async fn subscription_status<S>(
  State(state): State<ApiState<S>>,
  _operator: Operator,
  Path(id): Path<Uuid>,
  Json(body): Json<SubscriptionStatusBody>,
) -> Result<Json<Subscription>, ApiError>
where
  S: MatrixStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  state
    .store
    .get_subscription(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("subscription {id} not found")))?;
  let subscription = state
    .store
    .set_subscription_status(id, body.status)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(subscription_id = %id, status = body.status.as_str(), "subscription status changed");
  Ok(Json(subscription))
}
