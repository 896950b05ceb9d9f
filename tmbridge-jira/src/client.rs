//! # Jira HTTP Client
//!
//! Connection handling and request plumbing shared by every endpoint:
//! configuration, URL construction, authenticated dispatch, and response
//! decoding.

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{self, HeaderMap};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, instrument, trace};
use url::Url;

use crate::auth;
use crate::config::JiraConfig;
use crate::consts::{GREENHOPPER_V1_PREFIX, USER_AGENT, USER_PAYLOAD_MARKER};
use crate::error::{JiraError, Result};

/// Represents a Jira API client
pub struct JiraClient {
  pub(crate) client: Client,
  pub(crate) config: JiraConfig,
}

impl JiraClient {
  /// Create a new Jira client
  pub fn new(config: JiraConfig) -> Self {
    Self {
      client: Client::new(),
      config: config.normalized(),
    }
  }

  /// Replace the connection settings.
  ///
  /// Fails with [`JiraError::InvalidConfig`] when no configuration is given,
  /// leaving the previous settings in place.
  pub fn configure(&mut self, config: Option<JiraConfig>) -> Result<()> {
    let config = config.ok_or_else(|| JiraError::InvalidConfig("config is null".into()))?;
    self.config = config.normalized();
    debug!("Configured Jira client for {}", self.config.url);
    Ok(())
  }

  /// The active connection settings
  pub fn config(&self) -> &JiraConfig {
    &self.config
  }

  /// Endpoint URL, without trailing slash
  pub fn endpoint(&self) -> &str {
    &self.config.url
  }

  /// `endpoint + prefix`, the root every REST path hangs off
  pub fn base_url(&self) -> String {
    format!("{}{}", self.config.url, self.config.prefix)
  }

  /// Root of the Greenhopper (agile) namespace
  pub fn greenhopper_base_url(&self) -> String {
    format!("{}{}", self.config.url, GREENHOPPER_V1_PREFIX)
  }

  /// Authorization and encoding headers for the current configuration
  pub fn build_auth_headers(&self) -> Result<HeaderMap> {
    auth::build_auth_headers(&self.config)
  }

  /// REST URL for `segments`, each pushed as an encoded path segment
  pub(crate) fn api_url(&self, segments: &[&str]) -> Result<Url> {
    join_segments(&self.base_url(), segments)
  }

  /// Greenhopper URL for `segments`
  pub(crate) fn greenhopper_url(&self, segments: &[&str]) -> Result<Url> {
    join_segments(&self.greenhopper_base_url(), segments)
  }

  /// Start an authenticated request
  pub(crate) fn request(&self, method: Method, url: Url) -> Result<RequestBuilder> {
    trace!("Jira API request: {} {}", method, url);
    Ok(
      self
        .client
        .request(method, url)
        .headers(self.build_auth_headers()?)
        .header(header::USER_AGENT, USER_AGENT),
    )
  }

  /// Send a request, mapping transport failures to [`JiraError::Remote`] but
  /// leaving the status for the caller to judge
  pub(crate) fn dispatch(&self, request: RequestBuilder) -> Result<Response> {
    let response = request.send().map_err(|e| JiraError::transport(&e))?;
    debug!("Jira API response status: {}", response.status());
    Ok(response)
  }

  /// Send a request, turning transport failures and non-2xx statuses into
  /// [`JiraError::Remote`]
  pub(crate) fn execute(&self, request: RequestBuilder) -> Result<Response> {
    ensure_success(self.dispatch(request)?)
  }

  /// `GET url` and decode the JSON body
  pub(crate) fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
    let response = self.execute(self.request(Method::GET, url)?)?;
    read_json(response)
  }

  /// `GET url` and decode a JSON array body
  pub(crate) fn get_list<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>> {
    let response = self.execute(self.request(Method::GET, url)?)?;
    read_list(response)
  }

  /// Start an authenticated request carrying `body` as `application/json`
  pub(crate) fn json_request(&self, method: Method, url: Url, body: &str) -> Result<RequestBuilder> {
    Ok(
      self
        .request(method, url)?
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.to_string()),
    )
  }

  /// Test the Jira connection by fetching the current user.
  ///
  /// # Errors
  ///
  /// [`JiraError::Auth`] on 401, [`JiraError::Connection`] when the answer
  /// does not look like a Jira user, [`JiraError::Remote`] for anything else.
  #[instrument(skip(self), level = "debug")]
  pub fn test_connection(&self) -> Result<()> {
    let url = self.api_url(&["myself"])?;

    let body = match self.execute(self.request(Method::GET, url)?) {
      Ok(response) => response.text().map_err(|e| JiraError::transport(&e))?,
      Err(e) if e.status() == Some(StatusCode::UNAUTHORIZED) => {
        return Err(JiraError::Auth("Invalid account name or password (token)".into()));
      }
      Err(e) => {
        error!("Jira connection test failed: {}", e);
        return Err(e);
      }
    };

    if !body.trim_start().starts_with(USER_PAYLOAD_MARKER) {
      return Err(JiraError::Connection(
        "Connection test failed, please check that the Jira URL is correct".into(),
      ));
    }

    info!("Connected to Jira at {}", self.config.url);
    Ok(())
  }
}

/// Create a Jira client from connection settings
pub fn create_jira_client(config: Option<JiraConfig>) -> Result<JiraClient> {
  let config = config.ok_or_else(|| JiraError::InvalidConfig("config is null".into()))?;
  Ok(JiraClient::new(config))
}

fn join_segments(base: &str, segments: &[&str]) -> Result<Url> {
  let mut url = Url::parse(base).map_err(|e| JiraError::InvalidConfig(format!("invalid Jira URL '{base}': {e}")))?;
  url
    .path_segments_mut()
    .map_err(|()| JiraError::InvalidConfig(format!("Jira URL '{base}' cannot have a path")))?
    .pop_if_empty()
    .extend(segments);
  Ok(url)
}

/// Append query pairs, leaving the URL untouched when there are none
pub(crate) fn with_query<'a, I>(mut url: Url, pairs: I) -> Url
where
  I: IntoIterator<Item = (&'a str, &'a str)>,
{
  let mut pairs = pairs.into_iter().peekable();
  if pairs.peek().is_some() {
    url.query_pairs_mut().extend_pairs(pairs);
  }
  url
}

/// Millisecond timestamp used to defeat caches on Greenhopper endpoints
pub(crate) fn cache_buster() -> String {
  chrono::Utc::now().timestamp_millis().to_string()
}

/// Pass 2xx responses through; anything else becomes [`JiraError::Remote`]
/// carrying the response body
pub(crate) fn ensure_success(response: Response) -> Result<Response> {
  let status = response.status();
  if status.is_success() {
    Ok(response)
  } else {
    let body = response.text().unwrap_or_default();
    Err(JiraError::from_status(status, &body))
  }
}

/// Decode a JSON body into `T`
pub(crate) fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
  let body = response.text().map_err(|e| JiraError::transport(&e))?;
  parse_json(&body)
}

/// Decode a JSON array body into `Vec<T>`, preserving order
pub(crate) fn read_list<T: DeserializeOwned>(response: Response) -> Result<Vec<T>> {
  read_json::<Vec<T>>(response)
}

pub(crate) fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T> {
  serde_json::from_str(body).map_err(JiraError::deserialization::<T>)
}
