use reqwest::Method;
use tracing::{error, info, instrument};

use crate::client::JiraClient;
use crate::error::{JiraError, Result};
use crate::models::{JiraTransition, JiraTransitions, TransitionRequest};

impl JiraClient {
  /// Get available transitions for an issue
  #[instrument(skip(self), level = "debug")]
  pub fn get_transitions(&self, issue_key: &str) -> Result<Vec<JiraTransition>> {
    let url = self.api_url(&["issue", issue_key, "transitions"])?;
    let transitions: JiraTransitions = self.get_json(url)?;
    Ok(transitions.transitions)
  }

  /// Move an issue through `transition`; only its `id` is needed
  #[instrument(skip(self), level = "debug")]
  pub fn set_transitions(&self, issue_key: &str, transition: &JiraTransition) -> Result<()> {
    info!("setTransitions: {} -> {}", issue_key, transition.id);
    let url = self.api_url(&["issue", issue_key, "transitions"])?;

    let payload = serde_json::to_string(&TransitionRequest { transition })
      .map_err(|e| JiraError::remote(None, format!("Failed to serialize transition: {e}")))?;

    self
      .execute(self.json_request(Method::POST, url, &payload)?)
      .inspect_err(|e| error!("Failed to transition {}: {}", issue_key, e))?;
    Ok(())
  }
}
