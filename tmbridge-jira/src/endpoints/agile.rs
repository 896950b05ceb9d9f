//! # Greenhopper Endpoints
//!
//! Sprint and epic pickers served by the legacy agile namespace. Both are
//! GETs with a millisecond `_` parameter so intermediaries do not cache them.

use tracing::{debug, instrument};

use crate::client::{JiraClient, cache_buster, with_query};
use crate::consts::EPIC_SEARCH_PAGE_SIZE;
use crate::error::Result;
use crate::models::{JiraEpic, JiraEpicResponse, JiraSprint, JiraSprintResponse};

impl JiraClient {
  /// Sprints matching `query`: suggestions first, then all other matches
  #[instrument(skip(self), level = "debug")]
  pub fn get_sprint(&self, query: Option<&str>) -> Result<Vec<JiraSprint>> {
    let timestamp = cache_buster();
    let mut pairs = vec![("_", timestamp.as_str())];
    if let Some(query) = query.filter(|q| !q.trim().is_empty()) {
      pairs.push(("query", query));
    }

    let url = with_query(self.greenhopper_url(&["sprint", "picker"])?, pairs);
    let response: JiraSprintResponse = self.get_json(url)?;

    let mut sprints = response.suggestions.unwrap_or_default();
    sprints.extend(response.all_matches.unwrap_or_default());
    debug!("Found {} sprints", sprints.len());
    Ok(sprints)
  }

  /// Open epics matching `query_key`, flattened across every epic list
  #[instrument(skip(self), level = "debug")]
  pub fn get_epics(&self, query_key: &str) -> Result<Vec<JiraEpic>> {
    let page_size = EPIC_SEARCH_PAGE_SIZE.to_string();
    let timestamp = cache_buster();
    let url = with_query(
      self.greenhopper_url(&["epics"])?,
      [
        ("maxResults", page_size.as_str()),
        ("searchQuery", query_key),
        ("hideDone", "true"),
        ("_", timestamp.as_str()),
      ],
    );

    let response: JiraEpicResponse = self.get_json(url)?;
    Ok(
      response
        .epic_lists
        .unwrap_or_default()
        .into_iter()
        .flat_map(|list| list.epic_names.unwrap_or_default())
        .collect(),
    )
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
  fn test_get_sprint_concatenates_suggestions_and_matches() -> anyhow::Result<()> {
    let jira = MockJira::start();
    jira.mount(
      Mock::given(method("GET"))
        .and(path("/rest/greenhopper/1.0/sprint/picker"))
        .and(query_param("query", "Sprint"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "suggestions": [
                { "id": 1, "name": "A", "stateKey": "ACTIVE", "boardName": "TP board" },
                { "id": 2, "name": "B", "stateKey": "FUTURE" }
            ],
            "allMatches": [
                { "id": 3, "name": "C" }
            ]
        }))),
    );

    let sprints = client(&jira).get_sprint(Some("Sprint"))?;
    let names: Vec<_> = sprints.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["A", "B", "C"]);
    assert_eq!(sprints[0].state_key.as_deref(), Some("ACTIVE"));

    let requests = jira.received_requests();
    assert!(requests[0].url.query_pairs().any(|(k, v)| k == "_" && v.parse::<i64>().is_ok()));

    Ok(())
  }

  #[test]
  fn test_get_sprint_without_query_or_lists() -> anyhow::Result<()> {
    let jira = MockJira::start();
    jira.mount(
      Mock::given(method("GET"))
        .and(path("/rest/greenhopper/1.0/sprint/picker"))
        .and(query_param_is_missing("query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "allMatches": [{ "id": 3, "name": "C" }]
        }))),
    );

    let sprints = client(&jira).get_sprint(None)?;
    assert_eq!(sprints.len(), 1);
    assert_eq!(sprints[0].id, 3);

    Ok(())
  }

  #[test]
  fn test_get_epics_flattens_lists() -> anyhow::Result<()> {
    let jira = MockJira::start();
    jira.mount(
      Mock::given(method("GET"))
        .and(path("/rest/greenhopper/1.0/epics"))
        .and(query_param("maxResults", "300"))
        .and(query_param("searchQuery", "pay"))
        .and(query_param("hideDone", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "epicLists": [
                {
                    "listDescriptor": "Epics in TP",
                    "epicNames": [
                        { "key": "TP-10", "name": "E1", "isDone": false },
                        { "key": "TP-11", "name": "E2", "isDone": false }
                    ]
                },
                { "listDescriptor": "Other" },
                {
                    "listDescriptor": "Epics in OPS",
                    "epicNames": [{ "key": "OPS-1", "name": "E3", "isDone": false }]
                }
            ],
            "total": 3
        }))),
    );

    let epics = client(&jira).get_epics("pay")?;
    let names: Vec<_> = epics.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["E1", "E2", "E3"]);

    Ok(())
  }

  #[test]
  fn test_get_epics_none() -> anyhow::Result<()> {
    let jira = MockJira::start();
    jira.mount(
      Mock::given(method("GET"))
        .and(path("/rest/greenhopper/1.0/epics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "total": 0 }))),
    );

    assert!(client(&jira).get_epics("nothing")?.is_empty());
    Ok(())
  }

  #[test]
  fn test_greenhopper_ignores_api_prefix() -> anyhow::Result<()> {
    let jira = MockJira::start();
    jira.mount(
      Mock::given(method("GET"))
        .and(path("/jira/rest/greenhopper/1.0/epics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({}))),
    );

    let config =
      JiraConfig::basic(&jira.uri_with_context("jira"), "test_user", "test_token").with_prefix("/rest/api/latest");
    assert!(JiraClient::new(config).get_epics("x")?.is_empty());

    Ok(())
  }
}
