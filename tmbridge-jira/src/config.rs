//! # Connection Configuration
//!
//! The connection settings a [`JiraClient`](crate::JiraClient) is configured
//! with. The serialized field names match the integration's inbound contract
//! (`url`, `account`, `password`, `token`, `authType`).

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::consts::DEFAULT_API_PREFIX;

/// How requests authenticate against Jira
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthType {
  /// `Authorization: Basic base64(account:password)`
  #[default]
  Basic,
  /// `Authorization: Bearer <token>`
  Bearer,
}

impl AuthType {
  /// Interpret the raw auth-type flag. Only the exact value `bearer` selects
  /// bearer auth; anything else, including an empty flag, means basic.
  pub fn from_flag(flag: &str) -> Self {
    if flag == "bearer" { Self::Bearer } else { Self::Basic }
  }
}

impl<'de> Deserialize<'de> for AuthType {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let flag = Option::<String>::deserialize(deserializer)?;
    Ok(flag.as_deref().map(AuthType::from_flag).unwrap_or_default())
  }
}

fn default_prefix() -> String {
  DEFAULT_API_PREFIX.to_string()
}

/// Jira connection settings
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraConfig {
  /// Jira base URL, possibly with a context path (`http://host:8080/jira`)
  pub url: String,
  /// Account name used for basic auth
  #[serde(default)]
  pub account: String,
  /// Password (or Cloud API token) used for basic auth
  #[serde(default)]
  pub password: String,
  /// Personal access token used for bearer auth
  #[serde(default)]
  pub token: String,
  #[serde(default)]
  pub auth_type: AuthType,
  /// REST prefix appended to `url`
  #[serde(default = "default_prefix")]
  pub prefix: String,
}

impl JiraConfig {
  /// Settings for basic auth
  pub fn basic(url: &str, account: &str, password: &str) -> Self {
    Self {
      url: url.to_string(),
      account: account.to_string(),
      password: password.to_string(),
      token: String::new(),
      auth_type: AuthType::Basic,
      prefix: default_prefix(),
    }
  }

  /// Settings for bearer auth
  pub fn bearer(url: &str, token: &str) -> Self {
    Self {
      url: url.to_string(),
      account: String::new(),
      password: String::new(),
      token: token.to_string(),
      auth_type: AuthType::Bearer,
      prefix: default_prefix(),
    }
  }

  /// Replace the REST prefix
  pub fn with_prefix(mut self, prefix: &str) -> Self {
    self.prefix = prefix.to_string();
    self
  }

  /// Endpoint without trailing slashes
  pub(crate) fn normalized(mut self) -> Self {
    let trimmed = self.url.trim_end_matches('/').len();
    self.url.truncate(trimmed);
    self
  }
}

impl fmt::Debug for JiraConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("JiraConfig")
      .field("url", &self.url)
      .field("account", &self.account)
      .field("password", &"<redacted>")
      .field("token", &"<redacted>")
      .field("auth_type", &self.auth_type)
      .field("prefix", &self.prefix)
      .finish()
  }
}
