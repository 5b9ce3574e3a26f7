//! HTTP server wiring for the Destiny Matrix API.
//!
//! The binary in `main.rs` loads a [`ServerConfig`], opens the SQLite store and
//! serves [`router`]. Everything here is kept out of `main` so it can be
//! exercised without binding a socket.

use std::path::{Path, PathBuf};

use axum::{Router, routing::get};
use destiny_api::{ApiState, OperatorAuth, api_router};
use destiny_core::store::MatrixStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

pub const ENV_PREFIX: &str = "DESTINY";

/// Runtime server configuration, deserialised from `config.toml` and
/// `DESTINY_*` environment variables.
#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
  pub host:                   String,
  pub port:                   u16,
  pub store_path:             PathBuf,
  pub operator_username:      String,
  pub operator_password_hash: String,
}

impl ServerConfig {
  /// Layer `file` (optional) under the environment, with defaults for
  /// everything except the operator credentials.
  pub fn load(file: &Path) -> Result<Self, config::ConfigError> {
    Self::from_builder(
      config::Config::builder()
        .add_source(config::File::from(file).required(false))
        .add_source(config::Environment::with_prefix(ENV_PREFIX)),
    )
  }

  fn from_builder(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
  ) -> Result<Self, config::ConfigError> {
    builder
      .set_default("host", "127.0.0.1")?
      .set_default("port", 8080)?
      .set_default("store_path", "~/.local/share/destiny/destiny.db")?
      .build()?
      .try_deserialize()
  }

  pub fn operator(&self) -> OperatorAuth {
    OperatorAuth {
      username:      self.operator_username.clone(),
      password_hash: self.operator_password_hash.clone(),
    }
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The API under `/api`, a liveness probe at `/health`, request tracing on
/// everything.
pub fn router<S>(state: ApiState<S>) -> Router
where
  S: MatrixStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .route("/health", get(|| async { "ok" }))
    .nest("/api", api_router(state))
    .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use destiny_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  use super::*;

  fn builder(toml: &str) -> config::ConfigBuilder<config::builder::DefaultState> {
    config::Config::builder().add_source(config::File::from_str(toml, config::FileFormat::Toml))
  }

  #[test]
  fn defaults_fill_in_missing_fields() {
    let cfg = ServerConfig::from_builder(builder(
      r#"
        operator_username = "operator"
        operator_password_hash = "$argon2id$v=19$m=19456,t=2,p=1$abc$def"
      "#,
    ))
    .unwrap();
    assert_eq!(cfg.address(), "127.0.0.1:8080");
    assert_eq!(cfg.operator().username, "operator");
  }

  #[test]
  fn file_overrides_defaults() {
    let cfg = ServerConfig::from_builder(builder(
      r#"
        host = "0.0.0.0"
        port = 9000
        store_path = "/var/lib/destiny.db"
        operator_username = "op"
        operator_password_hash = "x"
      "#,
    ))
    .unwrap();
    assert_eq!(cfg.address(), "0.0.0.0:9000");
    assert_eq!(cfg.store_path, PathBuf::from("/var/lib/destiny.db"));
  }

  #[test]
  fn operator_credentials_are_required() {
    assert!(ServerConfig::from_builder(builder("port = 9000")).is_err());
  }

  #[test]
  fn tilde_expansion() {
    let absolute = Path::new("/tmp/destiny.db");
    assert_eq!(expand_tilde(absolute), absolute.to_path_buf());
    if let Ok(home) = std::env::var("HOME") {
      assert_eq!(expand_tilde(Path::new("~/x.db")), PathBuf::from(home).join("x.db"));
    }
  }

  async fn app() -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    router(ApiState::new(
      store,
      OperatorAuth { username: "op".into(), password_hash: "unused".into() },
    ))
  }

  #[tokio::test]
  async fn api_is_nested() {
    let resp = app()
      .await
      .oneshot(Request::builder().uri("/api/arcana/22").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app()
      .await
      .oneshot(Request::builder().uri("/arcana/22").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn health() {
    let resp = app()
      .await
      .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
  }
}
