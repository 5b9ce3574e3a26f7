//! Handlers for interpretations and follow-up questions.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/matrices/:id/interpretation` | 402 while locked for the viewer, 404 if none yet |
//! | `PUT`  | `/matrices/:id/interpretation` | Operator. Body: `{"text":"…"}` |
//! | `GET`  | `/matrices/:id/prompt` | Operator. Optional `?question=` |
//! | `POST` | `/matrices/:id/questions` | Viewer. Body: `{"question":"…","payment_id":…}` |
//! | `GET`  | `/matrices/:id/questions` | Viewer. Only the viewer's own questions |
//! | `PUT`  | `/questions/:id/answer` | Operator. Body: `{"answer":"…"}` |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use destiny_core::{
  interpretation::{Interpretation, NewQuestion, Question, QuestionDenial, may_ask},
  prompt,
  store::MatrixStore,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  ApiState,
  auth::{Operator, Viewer},
  error::ApiError,
  matrices::require_matrix,
};

fn non_empty(field: &str, value: String) -> Result<String, ApiError> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return Err(ApiError::BadRequest(format!("{field} must not be empty")));
  }
  Ok(trimmed.to_owned())
}

// ─── Interpretation ───────────────────────────────────────────────────────────

/// `GET /matrices/:id/interpretation`
pub async fn get_interpretation<S>(
  State(state): State<ApiState<S>>,
  viewer: Viewer,
  Path(id): Path<Uuid>,
) -> Result<Json<Interpretation>, ApiError>
where
  S: MatrixStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  require_matrix(state.store.as_ref(), id).await?;

  let unlocked = state
    .store
    .has_full_unlock(id, viewer.0)
    .await
    .map_err(ApiError::store)?;
  if !unlocked {
    return Err(ApiError::PaymentRequired(format!("interpretation of matrix {id} is locked")));
  }

  let interpretation = state
    .store
    .get_interpretation(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("matrix {id} has no interpretation yet")))?;
  Ok(Json(interpretation))
}

#[derive(Debug, Deserialize)]
pub struct InterpretationBody {
  pub text: String,
}

/// `PUT /matrices/:id/interpretation`
pub async fn put_interpretation<S>(
  State(state): State<ApiState<S>>,
  _operator: Operator,
  Path(id): Path<Uuid>,
  Json(body): Json<InterpretationBody>,
) -> Result<Json<Interpretation>, ApiError>
where
  S: MatrixStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let text = non_empty("text", body.text)?;
  require_matrix(state.store.as_ref(), id).await?;
  let interpretation = state
    .store
    .attach_interpretation(id, text)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(matrix_id = %id, "interpretation attached");
  Ok(Json(interpretation))
}

// ─── Prompt ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PromptParams {
  pub question: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Prompt {
  pub system: &'static str,
  pub prompt: String,
}

/// `GET /matrices/:id/prompt[?question=…]`
///
/// Without `question`, the prompt for the full reading; with it, the prompt
/// for answering that question.
pub async fn get_prompt<S>(
  State(state): State<ApiState<S>>,
  _operator: Operator,
  Path(id): Path<Uuid>,
  Query(params): Query<PromptParams>,
) -> Result<Json<Prompt>, ApiError>
where
  S: MatrixStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let matrix = require_matrix(state.store.as_ref(), id).await?;
  let body = match params.question {
    Some(q) => Prompt {
      system: prompt::QUESTION_SYSTEM,
      prompt: prompt::question_prompt(&matrix, &non_empty("question", q)?),
    },
    None => Prompt {
      system: prompt::INTERPRETATION_SYSTEM,
      prompt: prompt::interpretation_prompt(&matrix),
    },
  };
  Ok(Json(body))
}

// ─── Questions ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AskBody {
  pub question:   String,
  /// A completed single-question payment. Not needed by subscribers.
  pub payment_id: Option<Uuid>,
}

fn denial(d: QuestionDenial) -> ApiError {
  let message = match d {
    QuestionDenial::NotEntitled => "a subscription or a single-question payment is required",
    QuestionDenial::PaymentNotUsable => "payment cannot be used for this question",
    QuestionDenial::PaymentAlreadyUsed => "payment has already been used",
  };
  ApiError::PaymentRequired(message.to_owned())
}

/// `POST /matrices/:id/questions`
pub async fn ask<S>(
  State(state): State<ApiState<S>>,
  viewer: Viewer,
  Path(id): Path<Uuid>,
  Json(body): Json<AskBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: MatrixStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let user_id = viewer.require()?;
  let question = non_empty("question", body.question)?;
  require_matrix(state.store.as_ref(), id).await?;

  let subscription = state
    .store
    .active_subscription(user_id)
    .await
    .map_err(ApiError::store)?;

  let (payment, used) = match body.payment_id {
    Some(pid) => {
      let payment = state
        .store
        .get_payment(pid)
        .await
        .map_err(ApiError::store)?
        .ok_or_else(|| ApiError::NotFound(format!("payment {pid} not found")))?;
      let used = state.store.payment_used(pid).await.map_err(ApiError::store)?;
      (Some(payment), used)
    }
    None => (None, false),
  };

  let payment_id = may_ask(user_id, id, subscription.as_ref(), payment.as_ref(), used)
    .map_err(|d| {
      tracing::warn!(matrix_id = %id, %user_id, denial = ?d, "question rejected");
      denial(d)
    })?;

  let stored = state
    .store
    .record_question(NewQuestion { matrix_id: id, user_id, question, payment_id })
    .await
    .map_err(ApiError::store)?
    .map_err(|d| {
      tracing::warn!(matrix_id = %id, %user_id, denial = ?d, "question rejected by store");
      denial(d)
    })?;
  tracing::info!(question_id = %stored.question_id, matrix_id = %id, "question recorded");
  Ok((StatusCode::CREATED, Json(stored)))
}

/// `GET /matrices/:id/questions`
pub async fn list_questions<S>(
  State(state): State<ApiState<S>>,
  viewer: Viewer,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<Question>>, ApiError>
where
  S: MatrixStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let user_id = viewer.require()?;
  require_matrix(state.store.as_ref(), id).await?;
  let questions = state
    .store
    .list_questions(id, Some(user_id))
    .await
    .map_err(ApiError::store)?;
  Ok(Json(questions))
}

#[derive(Debug, Deserialize)]
pub struct AnswerBody {
  pub answer: String,
}

/// `PUT /questions/:id/answer`
pub async fn answer<S>(
  State(state): State<ApiState<S>>,
  _operator: Operator,
  Path(id): Path<Uuid>,
  Json(body): Json<AnswerBody>,
) -> Result<Json<Question>, ApiError>
where
  S: MatrixStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let answer = non_empty("answer", body.answer)?;
  state
    .store
    .get_question(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("question {id} not found")))?;
  let question = state
    .store
    .answer_question(id, answer)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(question))
}
