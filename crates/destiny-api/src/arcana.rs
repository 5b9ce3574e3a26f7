//! Handlers for `/arcana` endpoints. Static data; no store access.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/arcana` | All 22 entries in number order |
//! | `GET`  | `/arcana/:n` | 404 outside `1..=22` |

use axum::{Json, extract::Path};
use destiny_core::catalog::{ArcanaInfo, all_arcana_info, arcana_info};

use crate::error::ApiError;

/// `GET /arcana`
pub async fn list() -> Json<&'static [ArcanaInfo]> { Json(all_arcana_info()) }

/// `GET /arcana/:n`
pub async fn get_one(Path(n): Path<u32>) -> Result<Json<&'static ArcanaInfo>, ApiError> {
  arcana_info(n)
    .map(Json)
    .ok_or_else(|| ApiError::NotFound(format!("arcana {n} not found")))
}
