use reqwest::Method;
use tracing::{error, info, instrument};

use crate::client::{JiraClient, with_query};
use crate::consts::ISSUE_LINK_FILTER_JQL;
use crate::error::{JiraError, Result};
use crate::models::{
  JiraIssueLink, JiraIssueLinkRequest, JiraIssueLinkType, JiraIssueLinkTypeResponse, JiraIssuePickerResponse,
};

impl JiraClient {
  /// Issues that can be linked to `current_issue_key`, matching `query`
  #[instrument(skip(self), level = "debug")]
  pub fn get_issue_links(&self, current_issue_key: Option<&str>, query: Option<&str>) -> Result<Vec<JiraIssueLink>> {
    let mut pairs = vec![("showSubTaskParent", "true"), ("showSubTasks", "true")];
    if let Some(key) = current_issue_key.filter(|k| !k.is_empty()) {
      pairs.push(("currentIssueKey", key));
    }
    if let Some(query) = query.filter(|q| !q.is_empty()) {
      pairs.push(("query", query));
    }
    pairs.push(("currentJQL", ISSUE_LINK_FILTER_JQL));

    let url = with_query(self.api_url(&["issue", "picker"])?, pairs);
    let picker: JiraIssuePickerResponse = self.get_json(url)?;

    Ok(
      picker
        .sections
        .unwrap_or_default()
        .into_iter()
        .flat_map(|section| section.issues.unwrap_or_default())
        .collect(),
    )
  }

  /// Every link type the instance defines
  #[instrument(skip(self), level = "debug")]
  pub fn get_issue_link_type(&self) -> Result<Vec<JiraIssueLinkType>> {
    let response: JiraIssueLinkTypeResponse = self.get_json(self.api_url(&["issueLinkType"])?)?;
    Ok(response.issue_link_types.unwrap_or_default())
  }

  /// Create a link between two issues
  #[instrument(skip(self), level = "debug")]
  pub fn link_issue(&self, request: &JiraIssueLinkRequest) -> Result<()> {
    let body = serde_json::to_string(request)
      .map_err(|e| JiraError::remote(None, format!("Failed to serialize issue link: {e}")))?;
    info!("linkIssue: {}", body);

    let url = self.api_url(&["issueLink"])?;
    self
      .execute(self.json_request(Method::POST, url, &body)?)
      .inspect_err(|e| error!("Failed to link issues: {}", e))?;
    Ok(())
  }

  /// Remove an issue link
  #[instrument(skip(self), level = "debug")]
  pub fn delete_issue_link(&self, link_id: &str) -> Result<()> {
    info!("deleteIssueLink: {}", link_id);
    let url = self.api_url(&["issueLink", link_id])?;
    self
      .execute(self.request(Method::DELETE, url)?)
      .inspect_err(|e| error!("Failed to delete issue link {}: {}", link_id, e))?;
    Ok(())
  }
}
