//! # Jira Search Endpoints
//!
//! JQL searches scoped to one project and issue type.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use crate::client::{JiraClient, with_query};
use crate::error::Result;
use crate::models::JiraIssueListResponse;

/// Fields requested by [`JiraClient::get_demands`]
const DEMAND_FIELDS: &str = "summary,issuetype";

#[derive(Debug, Deserialize)]
struct RawSearchResponse {
  #[serde(default)]
  issues: Vec<Value>,
}

impl JiraClient {
  /// Fetch one page of issues of `issue_type` in `project_key`, optionally
  /// restricting the returned fields (comma separated)
  #[instrument(skip(self), level = "debug")]
  pub fn get_project_issues(
    &self,
    start_at: u32,
    max_results: u32,
    project_key: &str,
    issue_type: &str,
    fields: Option<&str>,
  ) -> Result<JiraIssueListResponse> {
    let url = self.search_url(start_at, max_results, project_key, issue_type, fields)?;
    let page: JiraIssueListResponse = self.get_json(url)?;
    debug!("Fetched {} of {} issues", page.issues.len(), page.total);
    Ok(page)
  }

  /// [`get_project_issues`](Self::get_project_issues) returning only the
  /// attachment field of each issue
  pub fn get_project_issues_attachment(
    &self,
    start_at: u32,
    max_results: u32,
    project_key: &str,
    issue_type: &str,
  ) -> Result<JiraIssueListResponse> {
    self.get_project_issues(start_at, max_results, project_key, issue_type, Some("attachment"))
  }

  /// Summary and issue type of each issue in a page, as untyped JSON
  #[instrument(skip(self), level = "debug")]
  pub fn get_demands(
    &self,
    project_key: &str,
    issue_type: &str,
    start_at: u32,
    max_results: u32,
  ) -> Result<Vec<Value>> {
    let url = self.search_url(start_at, max_results, project_key, issue_type, Some(DEMAND_FIELDS))?;
    let page: RawSearchResponse = self.get_json(url)?;
    Ok(page.issues)
  }

  fn search_url(
    &self,
    start_at: u32,
    max_results: u32,
    project_key: &str,
    issue_type: &str,
    fields: Option<&str>,
  ) -> Result<Url> {
    let start_at = start_at.to_string();
    let max_results = max_results.to_string();
    let jql = format!("project={project_key} AND issuetype={issue_type}");

    let mut pairs = vec![
      ("startAt", start_at.as_str()),
      ("maxResults", max_results.as_str()),
      ("jql", jql.as_str()),
    ];
    if let Some(fields) = fields.filter(|f| !f.trim().is_empty()) {
      pairs.push(("fields", fields));
    }

    Ok(with_query(self.api_url(&["search"])?, pairs))
  }
}

#[cfg(test)]
mod tests {
  use tmbridge_test_utils::MockJira;
  use wiremock::matchers::{method, path, query_param, query_param_is_missing};
  use wiremock::{Mock, ResponseTemplate};

  use crate::client::JiraClient;
  use crate::config::JiraConfig;

  fn client(jira: &MockJira) -> JiraClient {
    JiraClient::new(JiraConfig::basic(&jira.uri(), "test_user", "test_token"))
  }

  #[test]
  fn test_get_project_issues() -> anyhow::Result<()> {
    let jira = MockJira::start();
    jira.mount(
      Mock::given(method("GET"))
        .and(path("/rest/api/2/search"))
        .and(query_param("jql", "project=TP AND issuetype=Bug"))
        .and(query_param("startAt", "50"))
        .and(query_param("maxResults", "25"))
        .and(query_param_is_missing("fields"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "startAt": 50,
            "maxResults": 25,
            "total": 51,
            "issues": [
                { "id": "1", "key": "TP-1", "fields": { "summary": "First" } }
            ]
        }))),
    );

    let page = client(&jira).get_project_issues(50, 25, "TP", "Bug", None)?;
    assert_eq!(page.start_at, 50);
    assert_eq!(page.max_results, 25);
    assert_eq!(page.total, 51);
    assert_eq!(page.issues.len(), 1);
    assert_eq!(page.issues[0].key, "TP-1");

    Ok(())
  }

  #[test]
  fn test_get_project_issues_attachment() -> anyhow::Result<()> {
    let jira = MockJira::start();
    jira.mount(
      Mock::given(method("GET"))
        .and(path("/rest/api/2/search"))
        .and(query_param("fields", "attachment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "startAt": 0,
            "maxResults": 10,
            "total": 1,
            "issues": [{
                "id": "1",
                "key": "TP-1",
                "fields": {
                    "attachment": [{
                        "id": "900",
                        "filename": "trace.log",
                        "content": "http://jira/secure/attachment/900/trace.log",
                        "size": 12
                    }]
                }
            }]
        }))),
    );

    let page = client(&jira).get_project_issues_attachment(0, 10, "TP", "Bug")?;
    let attachments = page.issues[0].fields.attachment.clone().unwrap_or_default();
    assert_eq!(attachments.len(), 1);
    assert_eq!(attachments[0].filename, "trace.log");

    Ok(())
  }

  #[test]
  fn test_get_demands() -> anyhow::Result<()> {
    let jira = MockJira::start();
    jira.mount(
      Mock::given(method("GET"))
        .and(path("/rest/api/2/search"))
        .and(query_param("fields", "summary,issuetype"))
        .and(query_param("jql", "project=TP AND issuetype=Story"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "issues": [
                { "key": "TP-7", "fields": { "summary": "Checkout", "issuetype": { "name": "Story" } } },
                { "key": "TP-8", "fields": { "summary": "Refunds" } }
            ]
        }))),
    );

    let demands = client(&jira).get_demands("TP", "Story", 0, 100)?;
    assert_eq!(demands.len(), 2);
    assert_eq!(demands[0]["key"], "TP-7");
    assert_eq!(demands[1]["fields"]["summary"], "Refunds");

    Ok(())
  }

  #[test]
  fn test_get_demands_without_issues() -> anyhow::Result<()> {
    let jira = MockJira::start();
    jira.mount(
      Mock::given(method("GET"))
        .and(path("/rest/api/2/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "total": 0 }))),
    );

    assert!(client(&jira).get_demands("TP", "Story", 0, 100)?.is_empty());
    Ok(())
  }

  #[test]
  fn test_search_error() {
    let jira = MockJira::start();
    jira.mount(
      Mock::given(method("GET"))
        .and(path("/rest/api/2/search"))
        .respond_with(ResponseTemplate::new(400).set_body_string("The value 'XX' does not exist for the field 'project'.")),
    );

    let error = client(&jira)
      .get_project_issues(0, 10, "XX", "Bug", None)
      .unwrap_err();
    assert_eq!(error.status(), Some(reqwest::StatusCode::BAD_REQUEST));
  }
}
