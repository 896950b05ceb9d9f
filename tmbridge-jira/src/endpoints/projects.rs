//! # Jira Project Endpoints
//!
//! Project lookup and the metadata hung off it: issue types, create
//! metadata, fields, and statuses.

use reqwest::Method;
use tracing::{error, instrument, warn};

use crate::client::{JiraClient, parse_json, with_query};
use crate::error::{JiraError, Result};
use crate::models::{
  CreateMetadataFields, JiraCreateMetadataResponse, JiraField, JiraIssueType, JiraProject, JiraProjectStatuses,
};

const CREATE_METADATA_CONFIG_ERROR: &str = "Please check the integration settings or the Jira project id";

impl JiraClient {
  /// Get a project by key or id
  #[instrument(skip(self), level = "debug")]
  pub fn get_project(&self, project_key: &str) -> Result<JiraProject> {
    let url = self.api_url(&["project", project_key])?;
    self
      .get_json(url)
      .inspect_err(|e| error!("Failed to fetch project {}: {}", project_key, e))
  }

  /// Issue types usable in a project.
  ///
  /// Jira Cloud serves these from `issuetype/project`; Server/DC answers 404
  /// there, in which case the project's own `issueTypes` are returned.
  #[instrument(skip(self), level = "debug")]
  pub fn get_issue_type(&self, project_key: &str) -> Result<Vec<JiraIssueType>> {
    let project = self.get_project(project_key)?;
    let url = with_query(
      self.api_url(&["issuetype", "project"])?,
      [("projectId", project.id.as_str())],
    );

    match self.get_list(url) {
      Ok(issue_types) => Ok(issue_types),
      Err(e) if e.is_not_found() => {
        warn!("issuetype/project is unavailable, using the issue types of {}", project.key);
        Ok(project.issue_types)
      }
      Err(e) => {
        error!("Failed to fetch issue types of {}: {}", project_key, e);
        Err(e)
      }
    }
  }

  /// Fields that can be set when creating an `issue_type` issue in
  /// `project_key`, keyed by field id. `project` and `issuetype` are never
  /// included.
  ///
  /// # Errors
  ///
  /// [`JiraError::Config`] when Jira knows no such project/issue type
  /// combination.
  #[instrument(skip(self), level = "debug")]
  pub fn get_create_metadata(&self, project_key: &str, issue_type: &str) -> Result<CreateMetadataFields> {
    let url = with_query(
      self.api_url(&["issue", "createmeta"])?,
      [
        ("projectKeys", project_key),
        ("issuetypeIds", issue_type),
        ("expand", "projects.issuetypes.fields"),
      ],
    );

    let body = self
      .execute(self.request(Method::GET, url)?)
      .and_then(|response| response.text().map_err(|e| JiraError::transport(&e)))
      .inspect_err(|e| error!("Failed to fetch create metadata: {}", e))?;

    let mut fields = parse_json::<JiraCreateMetadataResponse>(&body)
      .inspect_err(|e| error!("{}", e))
      .ok()
      .and_then(|metadata| metadata.projects.into_iter().next())
      .and_then(|project| project.issuetypes.into_iter().next())
      .and_then(|issue_type| issue_type.fields)
      .ok_or_else(|| JiraError::Config(CREATE_METADATA_CONFIG_ERROR.into()))?;

    fields.remove("project");
    fields.remove("issuetype");
    Ok(fields)
  }

  /// Every field definition known to the instance
  #[instrument(skip(self), level = "debug")]
  pub fn get_fields(&self) -> Result<Vec<JiraField>> {
    self.get_list(self.api_url(&["field"])?)
  }

  /// Statuses per issue type of a project
  #[instrument(skip(self), level = "debug")]
  pub fn get_status(&self, project_key: &str) -> Result<Vec<JiraProjectStatuses>> {
    self.get_list(self.api_url(&["project", project_key, "statuses"])?)
  }
}
