//! # Jira Client Errors
//!
//! Error taxonomy for the Jira client and the field-name rewriting applied to
//! Jira's validation errors.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Convenience alias used throughout the client
pub type Result<T, E = JiraError> = std::result::Result<T, E>;

/// Errors raised by [`JiraClient`](crate::JiraClient) operations
#[derive(Debug, Error)]
pub enum JiraError {
  /// The client has no usable configuration
  #[error("Invalid Jira configuration: {0}")]
  InvalidConfig(String),
  /// Jira rejected the credentials
  #[error("{0}")]
  Auth(String),
  /// Jira answered, but not like a Jira instance would
  #[error("{0}")]
  Connection(String),
  /// Jira rejected a create or update, keyed by human-readable field names
  #[error("{0}")]
  Validation(FieldErrors),
  /// The integration settings do not match the Jira project
  #[error("{0}")]
  Config(String),
  /// Any other non-2xx response or transport failure
  #[error("Jira request failed: {message}")]
  Remote { status: Option<StatusCode>, message: String },
  /// The response body did not have the expected shape
  #[error("Failed to parse Jira response as {target}: {source}")]
  Deserialization {
    target: &'static str,
    #[source]
    source: serde_json::Error,
  },
  /// A proxied path points outside the allowed attachment locations
  #[error("Proxy target not allowed: {0}")]
  ForbiddenProxyTarget(String),
}

impl JiraError {
  pub(crate) fn remote(status: Option<StatusCode>, message: impl Into<String>) -> Self {
    Self::Remote {
      status,
      message: message.into(),
    }
  }

  /// Build a [`JiraError::Remote`] for a non-2xx status and its body
  pub(crate) fn from_status(status: StatusCode, body: &str) -> Self {
    let message = if body.trim().is_empty() {
      format!("HTTP {status}")
    } else {
      format!("HTTP {status} - {body}")
    };
    Self::remote(Some(status), message)
  }

  pub(crate) fn transport(error: &reqwest::Error) -> Self {
    Self::remote(error.status(), error.to_string())
  }

  pub(crate) fn deserialization<T>(source: serde_json::Error) -> Self {
    Self::Deserialization {
      target: std::any::type_name::<T>(),
      source,
    }
  }

  /// HTTP status carried by the error, if Jira answered at all
  pub fn status(&self) -> Option<StatusCode> {
    match self {
      Self::Remote { status, .. } => *status,
      _ => None,
    }
  }

  /// Whether Jira answered 404
  pub fn is_not_found(&self) -> bool {
    self.status() == Some(StatusCode::NOT_FOUND)
  }
}

/// Error body Jira returns alongside 4xx statuses
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorCollection {
  #[serde(default)]
  pub errors: BTreeMap<String, String>,
}

/// Validation messages keyed by field label (or field id when unlabelled)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
  /// Rewrite Jira field ids to the labels in `field_names`, keeping ids that
  /// have no label.
  pub fn relabel<I>(errors: I, field_names: &HashMap<String, String>) -> Self
  where
    I: IntoIterator<Item = (String, String)>,
  {
    let relabelled = errors
      .into_iter()
      .map(|(field_id, message)| {
        let label = field_names.get(&field_id).cloned().unwrap_or(field_id);
        (label, message)
      })
      .collect();
    Self(relabelled)
  }

  /// Message reported for `field`
  pub fn get(&self, field: &str) -> Option<&str> {
    self.0.get(field).map(String::as_str)
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.0.iter().map(|(field, message)| (field.as_str(), message.as_str()))
  }

  /// JSON object form, e.g. `{"Severity":"required"}`
  pub fn to_json(&self) -> String {
    serde_json::to_string(&self.0).unwrap_or_default()
  }
}

impl fmt::Display for FieldErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.to_json())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn errors(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
  }

  #[test]
  fn test_relabel_uses_field_names() {
    let names = HashMap::from([("customfield_1".to_string(), "Severity".to_string())]);
    let relabelled = FieldErrors::relabel(errors(&[("customfield_1", "required")]), &names);

    assert_eq!(relabelled.get("Severity"), Some("required"));
    assert_eq!(relabelled.to_json(), r#"{"Severity":"required"}"#);
  }

  #[test]
  fn test_relabel_keeps_unmapped_ids() {
    let names = HashMap::from([("customfield_1".to_string(), "Severity".to_string())]);
    let relabelled = FieldErrors::relabel(
      errors(&[("customfield_1", "required"), ("customfield_9", "too long")]),
      &names,
    );

    assert_eq!(relabelled.len(), 2);
    assert_eq!(relabelled.get("customfield_9"), Some("too long"));
    assert_eq!(
      relabelled.to_string(),
      r#"{"Severity":"required","customfield_9":"too long"}"#
    );
  }

  #[test]
  fn test_validation_error_displays_json() {
    let names = HashMap::new();
    let error = JiraError::Validation(FieldErrors::relabel(errors(&[("summary", "empty")]), &names));
    assert_eq!(error.to_string(), r#"{"summary":"empty"}"#);
  }

  #[test]
  fn test_from_status_message() {
    let error = JiraError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "boom");
    assert_eq!(error.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert!(error.to_string().contains("HTTP 500 Internal Server Error - boom"));
    assert!(!error.is_not_found());

    let error = JiraError::from_status(StatusCode::NOT_FOUND, "  ");
    assert!(error.is_not_found());
    assert!(error.to_string().ends_with("HTTP 404 Not Found"));
  }

  #[test]
  fn test_error_collection_deserialization() {
    let collection: ErrorCollection =
      serde_json::from_str(r#"{"errorMessages":[],"errors":{"customfield_1":"required"}}"#).unwrap();
    assert_eq!(collection.errors.get("customfield_1").map(String::as_str), Some("required"));

    let collection: ErrorCollection = serde_json::from_str(r#"{"errorMessages":["nope"]}"#).unwrap();
    assert!(collection.errors.is_empty());
  }
}
