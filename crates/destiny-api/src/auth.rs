//! Request identity: the operator (HTTP Basic) and the viewer (`x-user-id`).
//!
//! Operator routes are how payment events and generated texts reach the
//! store. Viewer identity is asserted by whatever sits in front of this API;
//! here it is only read.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use destiny_core::store::MatrixStore;
use rand_core::OsRng;
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

/// Header carrying the viewer's user id.
pub const VIEWER_HEADER: &str = "x-user-id";

/// Credentials accepted for operator routes.
#[derive(Clone)]
pub struct OperatorAuth {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// Taking this extractor makes a handler operator-only.
pub struct Operator;

impl OperatorAuth {
  /// Hash `password` into the PHC string stored as `password_hash`.
  pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default().hash_password(password.as_bytes(), &salt)?.to_string())
  }

  /// An unparsable stored hash accepts nothing.
  pub fn accepts(&self, username: &str, password: &str) -> bool {
    username == self.username
      && PasswordHash::new(&self.password_hash)
        .is_ok_and(|hash| Argon2::default().verify_password(password.as_bytes(), &hash).is_ok())
  }
}

/// `(username, password)` from a `Basic` authorization header. The scheme
/// name is matched case-insensitively.
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
  let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
  let (scheme, token) = value.split_once(' ')?;
  if !scheme.eq_ignore_ascii_case("basic") {
    return None;
  }
  let decoded = String::from_utf8(B64.decode(token.trim()).ok()?).ok()?;
  let (username, password) = decoded.split_once(':')?;
  Some((username.to_owned(), password.to_owned()))
}

/// Check the request's Basic credentials against `config`.
pub fn verify_operator(headers: &HeaderMap, config: &OperatorAuth) -> Result<(), ApiError> {
  match basic_credentials(headers) {
    Some((username, password)) if config.accepts(&username, &password) => Ok(()),
    _ => Err(ApiError::Unauthorized),
  }
}

impl<S> FromRequestParts<ApiState<S>> for Operator
where
  S: MatrixStore + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &ApiState<S>,
  ) -> Result<Self, Self::Rejection> {
    verify_operator(&parts.headers, &state.operator).inspect_err(|_| {
      tracing::warn!(path = %parts.uri.path(), "operator authentication failed");
    })?;
    Ok(Operator)
  }
}

/// The viewer named by `x-user-id`, if any. A malformed id is a 400.
#[derive(Debug, Clone, Copy)]
pub struct Viewer(pub Option<Uuid>);

impl Viewer {
  /// The viewer's id, or [`ApiError::ViewerRequired`].
  pub fn require(self) -> Result<Uuid, ApiError> { self.0.ok_or(ApiError::ViewerRequired) }
}

pub fn viewer_from_headers(headers: &HeaderMap) -> Result<Viewer, ApiError> {
  let Some(value) = headers.get(VIEWER_HEADER) else {
    return Ok(Viewer(None));
  };
  let id = value
    .to_str()
    .ok()
    .and_then(|s| Uuid::parse_str(s.trim()).ok())
    .ok_or_else(|| ApiError::BadRequest(format!("{VIEWER_HEADER} is not a UUID")))?;
  Ok(Viewer(Some(id)))
}

impl<St> FromRequestParts<St> for Viewer
where
  St: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(parts: &mut Parts, _state: &St) -> Result<Self, Self::Rejection> {
    viewer_from_headers(&parts.headers)
  }
}

#[cfg(test)]
mod tests {
  use axum::http::HeaderValue;

  use super::*;

  fn config(password: &str) -> OperatorAuth {
    OperatorAuth {
      username:      "operator".into(),
      password_hash: OperatorAuth::hash_password(password).unwrap(),
    }
  }

  fn basic(user: &str, pass: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let value = format!("Basic {}", B64.encode(format!("{user}:{pass}")));
    headers.insert(header::AUTHORIZATION, HeaderValue::from_str(&value).unwrap());
    headers
  }

  #[test]
  fn correct_credentials() {
    let cfg = config("secret");
    assert!(verify_operator(&basic("operator", "secret"), &cfg).is_ok());
  }

  #[test]
  fn wrong_password() {
    let cfg = config("secret");
    assert!(matches!(
      verify_operator(&basic("operator", "wrong"), &cfg),
      Err(ApiError::Unauthorized)
    ));
  }

  #[test]
  fn wrong_username() {
    let cfg = config("secret");
    assert!(matches!(
      verify_operator(&basic("someone", "secret"), &cfg),
      Err(ApiError::Unauthorized)
    ));
  }

  #[test]
  fn missing_header() {
    let cfg = config("secret");
    assert!(matches!(
      verify_operator(&HeaderMap::new(), &cfg),
      Err(ApiError::Unauthorized)
    ));
  }

  #[test]
  fn invalid_base64() {
    let cfg = config("secret");
    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic !!!not-base64!!!"));
    assert!(matches!(verify_operator(&headers, &cfg), Err(ApiError::Unauthorized)));
  }

  #[test]
  fn scheme_is_case_insensitive() {
    let cfg = config("secret");
    let mut headers = HeaderMap::new();
    let value = format!("basic {}", B64.encode("operator:secret"));
    headers.insert(header::AUTHORIZATION, HeaderValue::from_str(&value).unwrap());
    assert!(verify_operator(&headers, &cfg).is_ok());

    let value = format!("Bearer {}", B64.encode("operator:secret"));
    headers.insert(header::AUTHORIZATION, HeaderValue::from_str(&value).unwrap());
    assert!(verify_operator(&headers, &cfg).is_err());
  }

  #[test]
  fn unparsable_stored_hash_rejects() {
    let cfg = OperatorAuth { username: "operator".into(), password_hash: "plain".into() };
    assert!(!cfg.accepts("operator", "plain"));
  }

  #[test]
  fn viewer_header_is_optional() {
    assert!(viewer_from_headers(&HeaderMap::new()).unwrap().0.is_none());

    let id = Uuid::new_v4();
    let mut headers = HeaderMap::new();
    headers.insert(VIEWER_HEADER, HeaderValue::from_str(&id.to_string()).unwrap());
    assert_eq!(viewer_from_headers(&headers).unwrap().0, Some(id));

    headers.insert(VIEWER_HEADER, HeaderValue::from_static("not-a-uuid"));
    assert!(matches!(viewer_from_headers(&headers), Err(ApiError::BadRequest(_))));
  }
}
