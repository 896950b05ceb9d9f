//! Authentication headers for the Jira client.
//!
//! Every request carries the same credential headers, derived from the stored
//! [`JiraConfig`]. Building them has no side effects, so they are rebuilt per
//! request instead of being cached on the client.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::{self, HeaderMap, HeaderValue};

use crate::config::{AuthType, JiraConfig};
use crate::consts::ACCEPT_ENCODING;
use crate::error::{JiraError, Result};

/// `Authorization: Basic ...` value for an account/password pair
pub fn basic_auth_value(account: &str, password: &str) -> Result<HeaderValue> {
  let encoded = STANDARD.encode(format!("{account}:{password}"));
  sensitive(format!("Basic {encoded}"))
}

/// `Authorization: Bearer ...` value for a personal access token
pub fn bearer_auth_value(token: &str) -> Result<HeaderValue> {
  sensitive(format!("Bearer {token}"))
}

fn sensitive(value: String) -> Result<HeaderValue> {
  let mut value = HeaderValue::from_str(&value)
    .map_err(|e| JiraError::InvalidConfig(format!("credentials cannot be sent as an HTTP header: {e}")))?;
  value.set_sensitive(true);
  Ok(value)
}

/// Build the headers every Jira request is sent with.
///
/// Bearer auth is used iff the configured auth type is `bearer`; otherwise the
/// account and password are sent as basic auth. `Accept-Encoding` is always
/// present.
pub fn build_auth_headers(config: &JiraConfig) -> Result<HeaderMap> {
  let authorization = match config.auth_type {
    AuthType::Bearer => bearer_auth_value(&config.token)?,
    AuthType::Basic => basic_auth_value(&config.account, &config.password)?,
  };

  let mut headers = HeaderMap::new();
  headers.insert(header::AUTHORIZATION, authorization);
  headers.insert(header::ACCEPT_ENCODING, HeaderValue::from_static(ACCEPT_ENCODING));
  Ok(headers)
}
