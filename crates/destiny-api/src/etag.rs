//! Strong ETags for JSON responses.
//!
//! The tag is the SHA-256 of the serialized body, so any field change yields
//! a new tag and identical bodies share one.

use axum::http::{HeaderMap, header};
use sha2::{Digest, Sha256};

/// Quoted hex digest of `body`.
pub fn compute_etag(body: &[u8]) -> String {
  let hash = Sha256::digest(body);
  format!("\"{}\"", hex::encode(hash))
}

/// Whether the request's `If-None-Match` names `etag` (or is `*`).
pub fn matches_if_none_match(headers: &HeaderMap, etag: &str) -> bool {
  let Some(value) = headers.get(header::IF_NONE_MATCH).and_then(|v| v.to_str().ok()) else {
    return false;
  };
  value
    .split(',')
    .map(str::trim)
    .any(|candidate| candidate == "*" || candidate == etag)
}

#[cfg(test)]
mod tests {
  use axum::http::HeaderValue;

  use super::*;

  #[test]
  fn same_body_same_etag() {
    assert_eq!(compute_etag(b"{\"a\":1}"), compute_etag(b"{\"a\":1}"));
  }

  #[test]
  fn changed_body_changes_etag() {
    assert_ne!(compute_etag(b"{\"a\":1}"), compute_etag(b"{\"a\":2}"));
  }

  #[test]
  fn etag_is_quoted_hex() {
    let tag = compute_etag(b"");
    assert!(tag.starts_with('"') && tag.ends_with('"'));
    assert_eq!(tag.len(), 64 + 2);
  }

  #[test]
  fn if_none_match_lists_and_wildcard() {
    let tag = compute_etag(b"x");
    let mut headers = HeaderMap::new();
    assert!(!matches_if_none_match(&headers, &tag));

    let list = format!("\"other\", {tag}");
    headers.insert(header::IF_NONE_MATCH, HeaderValue::from_str(&list).unwrap());
    assert!(matches_if_none_match(&headers, &tag));

    headers.insert(header::IF_NONE_MATCH, HeaderValue::from_static("*"));
    assert!(matches_if_none_match(&headers, &tag));

    headers.insert(header::IF_NONE_MATCH, HeaderValue::from_static("\"other\""));
    assert!(!matches_if_none_match(&headers, &tag));
  }
}
