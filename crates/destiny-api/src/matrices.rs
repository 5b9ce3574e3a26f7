//! Handlers for `/matrices` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/matrices` | Body: [`CreateBody`]; returns 201 `{id, calculation, has_access}` |
//! | `GET`  | `/matrices/:id` | `{matrix, calculation, has_access}`; ETag / `If-None-Match` |
//! | `GET`  | `/matrices/:id/access` | `{has_access}` for the viewer |
//! | `GET`  | `/users/:user_id/matrices` | Viewer must be `user_id` |

use axum::{
  Json,
  extract::{Path, State},
  http::{HeaderMap, StatusCode, header},
  response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use destiny_core::{
  BirthDate, MatrixCalculation,
  record::{Gender, NewMatrix, StoredMatrix},
  store::MatrixStore,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  ApiState,
  auth::Viewer,
  error::ApiError,
  etag::{compute_etag, matches_if_none_match},
};

pub const MAX_NAME_LEN: usize = 255;

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name:       String,
  /// `DD.MM.YYYY`
  pub birth_date: String,
  pub gender:     Gender,
}

#[derive(Debug, Serialize)]
pub struct Created {
  pub id:          Uuid,
  pub calculation: MatrixCalculation,
  pub has_access:  bool,
}

/// `POST /matrices`, body: `{"name":"…","birth_date":"15.03.1990","gender":"female"}`
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  viewer: Viewer,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: MatrixStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let name = body.name.trim();
  if name.is_empty() {
    return Err(ApiError::BadRequest("name must not be empty".into()));
  }
  if name.chars().count() > MAX_NAME_LEN {
    return Err(ApiError::BadRequest(format!("name is longer than {MAX_NAME_LEN} characters")));
  }
  let birth_date = BirthDate::parse_checked(&body.birth_date).inspect_err(|e| {
    tracing::warn!(birth_date = %body.birth_date, error = %e, "rejected birth date");
  })?;

  let stored = state
    .store
    .save_matrix(NewMatrix {
      user_id: viewer.0,
      name: name.to_owned(),
      birth_date,
      gender: body.gender,
    })
    .await
    .map_err(ApiError::store)?;

  let has_access = state
    .store
    .has_full_unlock(stored.matrix_id, viewer.0)
    .await
    .map_err(ApiError::store)?;

  tracing::info!(matrix_id = %stored.matrix_id, %birth_date, "matrix created");

  Ok((
    StatusCode::CREATED,
    Json(Created { id: stored.matrix_id, calculation: stored.calculation, has_access }),
  ))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// Submission fields of a stored matrix.
#[derive(Debug, Serialize)]
pub struct MatrixSummary {
  pub id:         Uuid,
  pub user_id:    Option<Uuid>,
  pub name:       String,
  pub birth_date: BirthDate,
  pub gender:     Gender,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct MatrixView {
  pub matrix:      MatrixSummary,
  pub calculation: MatrixCalculation,
  pub has_access:  bool,
}

impl MatrixView {
  fn new(stored: StoredMatrix, has_access: bool) -> Self {
    Self {
      matrix: MatrixSummary {
        id:         stored.matrix_id,
        user_id:    stored.user_id,
        name:       stored.name,
        birth_date: stored.birth_date,
        gender:     stored.gender,
        created_at: stored.created_at,
      },
      calculation: stored.calculation,
      has_access,
    }
  }
}

pub(crate) async fn require_matrix<S>(store: &S, id: Uuid) -> Result<StoredMatrix, ApiError>
where
  S: MatrixStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  store
    .get_matrix(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("matrix {id} not found")))
}

/// `GET /matrices/:id`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  viewer: Viewer,
  Path(id): Path<Uuid>,
  headers: HeaderMap,
) -> Result<Response, ApiError>
where
  S: MatrixStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let stored = require_matrix(state.store.as_ref(), id).await?;
  let has_access = state
    .store
    .has_full_unlock(id, viewer.0)
    .await
    .map_err(ApiError::store)?;

  let body = serde_json::to_vec(&MatrixView::new(stored, has_access)).map_err(ApiError::store)?;
  let etag = compute_etag(&body);

  if matches_if_none_match(&headers, &etag) {
    return Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response());
  }

  Ok(
    (
      StatusCode::OK,
      [(header::ETAG, etag), (header::CONTENT_TYPE, "application/json".to_owned())],
      body,
    )
      .into_response(),
  )
}

// ─── Access ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct Access {
  pub has_access: bool,
}

/// `GET /matrices/:id/access`
pub async fn access<S>(
  State(state): State<ApiState<S>>,
  viewer: Viewer,
  Path(id): Path<Uuid>,
) -> Result<Json<Access>, ApiError>
where
  S: MatrixStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  require_matrix(state.store.as_ref(), id).await?;
  let has_access = state
    .store
    .has_full_unlock(id, viewer.0)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(Access { has_access }))
}

// ─── List for user ────────────────────────────────────────────────────────────

/// `GET /users/:user_id/matrices`
pub async fn list_for_user<S>(
  State(state): State<ApiState<S>>,
  viewer: Viewer,
  Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<StoredMatrix>>, ApiError>
where
  S: MatrixStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if viewer.require()? != user_id {
    return Err(ApiError::Forbidden);
  }
  let matrices = state
    .store
    .list_user_matrices(user_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(matrices))
}
