//! Async HTTP client wrapping the Destiny Matrix JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use destiny_core::{BirthDate, MatrixCalculation, record::Gender};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Connection settings for the API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  /// Sent as `x-user-id` when set.
  pub user_id:  Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct SubmitBody<'a> {
  pub name:       &'a str,
  pub birth_date: &'a str,
  pub gender:     Gender,
}

/// Response to `POST /matrices`.
#[derive(Debug, Deserialize, Serialize)]
pub struct Created {
  pub id:          Uuid,
  pub calculation: MatrixCalculation,
  pub has_access:  bool,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MatrixSummary {
  pub id:         Uuid,
  pub user_id:    Option<Uuid>,
  pub name:       String,
  pub birth_date: BirthDate,
  pub gender:     Gender,
  pub created_at: DateTime<Utc>,
}

/// Response to `GET /matrices/:id`.
#[derive(Debug, Deserialize, Serialize)]
pub struct MatrixView {
  pub matrix:      MatrixSummary,
  pub calculation: MatrixCalculation,
  pub has_access:  bool,
}

#[derive(Deserialize)]
struct ErrorBody {
  error: String,
}

/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.config.base_url.trim_end_matches('/'), path)
  }

  fn viewer(&self, req: RequestBuilder) -> RequestBuilder {
    match self.config.user_id {
      Some(id) => req.header("x-user-id", id.to_string()),
      None => req,
    }
  }

  /// `POST /api/matrices`
  pub async fn submit(&self, body: &SubmitBody<'_>) -> Result<Created> {
    let resp = self
      .viewer(self.client.post(self.url("/matrices")))
      .json(body)
      .send()
      .await
      .context("POST /matrices failed")?;
    let resp = check("POST /matrices", resp).await?;
    resp.json().await.context("deserialising created matrix")
  }

  /// `GET /api/matrices/:id`
  pub async fn show(&self, id: Uuid) -> Result<MatrixView> {
    let path = format!("/matrices/{id}");
    let resp = self
      .viewer(self.client.get(self.url(&path)))
      .send()
      .await
      .with_context(|| format!("GET {path} failed"))?;
    let resp = check(&format!("GET {path}"), resp).await?;
    resp.json().await.context("deserialising matrix")
  }
}

/// Pass successful responses through; turn the rest into an error carrying
/// the server's message.
async fn check(what: &str, resp: Response) -> Result<Response> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }
  let message = resp
    .json::<ErrorBody>()
    .await
    .map(|b| b.error)
    .unwrap_or_else(|_| status.canonical_reason().unwrap_or("").to_owned());
  tracing::debug!(%status, %message, "request failed");
  Err(anyhow!("{what} → {status}: {message}"))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn url_joins_base_and_path() {
    let client = ApiClient::new(ApiConfig { base_url: "http://localhost:8080/".into(), user_id: None })
      .unwrap();
    assert_eq!(client.url("/matrices"), "http://localhost:8080/api/matrices");
  }

  #[test]
  fn matrix_view_decodes_server_shape() {
    let calc = destiny_core::calculate_matrix("15.03.1990").unwrap();
    let json = serde_json::json!({
      "matrix": {
        "id": Uuid::nil(),
        "user_id": null,
        "name": "Ada",
        "birth_date": "15.03.1990",
        "gender": "female",
        "created_at": "2024-01-01T00:00:00Z",
      },
      "calculation": calc,
      "has_access": false,
    });
    let view: MatrixView = serde_json::from_value(json).unwrap();
    assert_eq!(view.matrix.birth_date, BirthDate::new(15, 3, 1990));
    assert_eq!(view.calculation, calc);
  }
}
