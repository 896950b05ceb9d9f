//! # Jira User Endpoints
//!
//! User pickers. Cloud and Server disagree on whether the search term is
//! passed as `query` or `username`, so each search tries one form and falls
//! back to the other once.

use tracing::{debug, error, instrument, warn};
use url::Url;

use crate::client::{JiraClient, with_query};
use crate::consts::USER_SEARCH_PAGE_SIZE;
use crate::error::Result;
use crate::models::JiraUser;

impl JiraClient {
  /// Users that can be assigned issues in `project_key`, optionally filtered.
  ///
  /// Never fails: when neither parameter form is accepted the result is empty.
  #[instrument(skip(self), level = "debug")]
  pub fn assignable_user_search(&self, project_key: &str, query: Option<&str>) -> Vec<JiraUser> {
    let query = query.filter(|q| !q.trim().is_empty());
    let attempt = |param: &str| -> Result<Url> {
      let url = self.user_search_url(&["user", "assignable", "search"], Some(project_key))?;
      Ok(match query {
        Some(query) => with_query(url, [(param, query)]),
        None => url,
      })
    };

    self.search_users(attempt("username"), || attempt("query"))
  }

  /// Search every user by name or email.
  ///
  /// Never fails: when neither parameter form is accepted the result is empty.
  #[instrument(skip(self), level = "debug")]
  pub fn all_user_search(&self, query: Option<&str>) -> Vec<JiraUser> {
    let query = query.filter(|q| !q.trim().is_empty());
    let attempt = |param: &str, value: &str| -> Result<Url> {
      let url = self.user_search_url(&["user", "search"], None)?;
      Ok(with_query(url, [(param, value)]))
    };

    self.search_users(attempt("query", query.unwrap_or_default()), || {
      attempt("username", query.unwrap_or("\"\""))
    })
  }

  fn user_search_url(&self, segments: &[&str], project_key: Option<&str>) -> Result<Url> {
    let page_size = USER_SEARCH_PAGE_SIZE.to_string();
    let url = self.api_url(segments)?;
    let url = match project_key {
      Some(project_key) => with_query(url, [("project", project_key)]),
      None => url,
    };
    Ok(with_query(url, [("maxResults", page_size.as_str()), ("startAt", "0")]))
  }

  fn search_users<F>(&self, first: Result<Url>, fallback: F) -> Vec<JiraUser>
  where
    F: FnOnce() -> Result<Url>,
  {
    match first.and_then(|url| self.get_list(url)) {
      Ok(users) => return users,
      Err(e) => debug!("User search rejected, retrying with the other parameter form: {}", e),
    }

    match fallback().and_then(|url| self.get_list(url)) {
      Ok(users) => users,
      Err(e) => {
        error!("User search failed: {}", e);
        warn!("Returning no users");
        Vec::new()
      }
    }
  }
}
