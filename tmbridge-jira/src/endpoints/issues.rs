//! # Jira Issue Endpoints
//!
//! Jira API endpoint implementations for issue operations,
//! including fetching, creating, updating, and deleting Jira issues.

use std::collections::HashMap;

use reqwest::blocking::Response;
use reqwest::{Method, StatusCode};
use tracing::{error, info, instrument, warn};

use crate::client::{JiraClient, ensure_success, parse_json, read_json};
use crate::error::{ErrorCollection, FieldErrors, JiraError, Result};
use crate::models::{JiraAddIssueResponse, JiraIssue};

impl JiraClient {
  /// Get a Jira issue by id or key
  #[instrument(skip(self), level = "debug")]
  pub fn get_issue(&self, issue_id: &str) -> Result<JiraIssue> {
    info!("getIssues: {}", issue_id);
    let url = self.api_url(&["issue", issue_id])?;
    self.get_json(url)
  }

  /// Create an issue from a pre-serialized JSON body.
  ///
  /// # Errors
  ///
  /// On HTTP 400 the field errors Jira reports are relabelled through
  /// `field_names` and returned as [`JiraError::Validation`]. Any other failure
  /// is a [`JiraError::Remote`].
  #[instrument(skip(self, body, field_names), level = "debug")]
  pub fn add_issue(&self, body: &str, field_names: &HashMap<String, String>) -> Result<JiraAddIssueResponse> {
    info!("addIssue: {}", body);
    let url = self.api_url(&["issue"])?;

    let response = self.dispatch(self.json_request(Method::POST, url, body)?)?;
    let created: JiraAddIssueResponse = read_json(reject_field_errors(response, field_names)?)?;

    info!("Created Jira issue {}", created.key);
    Ok(created)
  }

  /// Update an issue from a pre-serialized JSON body; same error policy as
  /// [`add_issue`](Self::add_issue)
  #[instrument(skip(self, body, field_names), level = "debug")]
  pub fn update_issue(&self, issue_id: &str, body: &str, field_names: &HashMap<String, String>) -> Result<()> {
    info!("updateIssue: {} {}", issue_id, body);
    let url = self.api_url(&["issue", issue_id])?;

    let response = self.dispatch(self.json_request(Method::PUT, url, body)?)?;
    reject_field_errors(response, field_names)?;
    Ok(())
  }

  /// Delete an issue. An issue Jira no longer knows about counts as deleted.
  #[instrument(skip(self), level = "debug")]
  pub fn delete_issue(&self, issue_id: &str) -> Result<()> {
    info!("deleteIssue: {}", issue_id);
    let url = self.api_url(&["issue", issue_id])?;
    self.delete_tolerating_missing(url)
  }

  /// DELETE that treats 404 as success
  pub(crate) fn delete_tolerating_missing(&self, url: url::Url) -> Result<()> {
    match self.execute(self.request(Method::DELETE, url.clone())?) {
      Ok(_) => Ok(()),
      Err(e) if e.is_not_found() => {
        warn!("{} is already gone, nothing to delete", url);
        Ok(())
      }
      Err(e) => {
        error!("DELETE {} failed: {}", url, e);
        Err(e)
      }
    }
  }
}

/// Pass successful create/update responses through. A 400 that names the
/// offending fields becomes a [`JiraError::Validation`] keyed by field label;
/// every other failure is a [`JiraError::Remote`].
fn reject_field_errors(response: Response, field_names: &HashMap<String, String>) -> Result<Response> {
  if response.status() != StatusCode::BAD_REQUEST {
    return ensure_success(response).inspect_err(|e| error!("{}", e));
  }

  let body = response.text().unwrap_or_default();
  match parse_json::<ErrorCollection>(&body) {
    Ok(collection) if !collection.errors.is_empty() => {
      let errors = FieldErrors::relabel(collection.errors, field_names);
      error!("Jira rejected fields: {}", errors);
      return Err(JiraError::Validation(errors));
    }
    Ok(_) => {}
    Err(parse_error) => error!("Failed to read Jira field errors: {}", parse_error),
  }

  let error = JiraError::from_status(StatusCode::BAD_REQUEST, &body);
  error!("{}", error);
  Err(error)
}
