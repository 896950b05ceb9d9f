//! # Jira Attachment Endpoints
//!
//! Upload, deletion, and download of issue attachments, plus a restricted
//! GET proxy for attachment URLs embedded in issue content.

use std::io::Read;
use std::path::Path;

use reqwest::Method;
use reqwest::blocking::Response;
use reqwest::blocking::multipart::Form;
use reqwest::header;
use tracing::{error, info, instrument};
use url::{Position, Url};

use crate::client::JiraClient;
use crate::consts::{ACCEPT_OCTET_STREAM, PROXY_ALLOWED_PREFIXES};
use crate::error::{JiraError, Result};

impl JiraClient {
  /// Attach a local file to an issue.
  ///
  /// Failures, including an unreadable file, are logged and otherwise ignored.
  #[instrument(skip(self), level = "debug")]
  pub fn upload_attachment(&self, issue_key: &str, file: &Path) {
    if let Err(e) = self.try_upload_attachment(issue_key, file) {
      error!("Failed to upload {} to {}: {}", file.display(), issue_key, e);
    }
  }

  fn try_upload_attachment(&self, issue_key: &str, file: &Path) -> Result<()> {
    let form = Form::new()
      .file("file", file)
      .map_err(|e| JiraError::remote(None, format!("Failed to read {}: {e}", file.display())))?;

    let url = self.api_url(&["issue", issue_key, "attachments"])?;
    let request = self
      .request(Method::POST, url)?
      .header("X-Atlassian-Token", "no-check")
      .multipart(form);

    self.execute(request)?;
    info!("Uploaded {} to {}", file.display(), issue_key);
    Ok(())
  }

  /// Delete an attachment. An attachment Jira no longer knows about counts as
  /// deleted.
  #[instrument(skip(self), level = "debug")]
  pub fn delete_attachment(&self, attachment_id: &str) -> Result<()> {
    info!("deleteAttachment: {}", attachment_id);
    let url = self.api_url(&["attachment", attachment_id])?;
    self.delete_tolerating_missing(url)
  }

  /// Download the attachment at the absolute `url`, handing the body to
  /// `handler` as it streams in
  #[instrument(skip(self, handler), level = "debug")]
  pub fn get_attachment_content<F, R>(&self, url: &str, handler: F) -> Result<R>
  where
    F: FnOnce(&mut dyn Read) -> R,
  {
    let url = Url::parse(url).map_err(|e| JiraError::remote(None, format!("invalid attachment URL '{url}': {e}")))?;
    let request = self
      .request(Method::GET, url)?
      .header(header::ACCEPT, ACCEPT_OCTET_STREAM);

    let mut response = self.execute(request)?;
    Ok(handler(&mut response))
  }

  /// GET an attachment path on the Jira host, outside any context path the
  /// endpoint carries (`http://host/jira` + `/secure/attachment/1/a.png` is
  /// fetched from `http://host/secure/attachment/1/a.png`).
  ///
  /// # Errors
  ///
  /// [`JiraError::ForbiddenProxyTarget`] unless the path stays on the Jira
  /// host and under `/secure/attachment` or `/attachment/content`.
  #[instrument(skip(self), level = "debug")]
  pub fn proxy_for_get(&self, path: &str) -> Result<Response> {
    info!("jira proxyForGet: {}", path);
    let target = self.proxy_target(path)?;
    self.execute(self.request(Method::GET, target)?)
  }

  fn proxy_target(&self, path: &str) -> Result<Url> {
    let forbidden = || JiraError::ForbiddenProxyTarget(path.to_string());

    let endpoint = Url::parse(self.endpoint())
      .map_err(|e| JiraError::InvalidConfig(format!("invalid Jira URL '{}': {e}", self.endpoint())))?;
    if !path.starts_with('/') {
      return Err(forbidden());
    }

    let Ok(target) = Url::parse(&format!("{}{}", &endpoint[..Position::BeforePath], path)) else {
      return Err(forbidden());
    };
    let same_origin = target.scheme() == endpoint.scheme()
      && target.host_str() == endpoint.host_str()
      && target.port_or_known_default() == endpoint.port_or_known_default();
    let allowed = PROXY_ALLOWED_PREFIXES.iter().any(|prefix| {
      target
        .path()
        .strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    });

    if same_origin && allowed {
      Ok(target)
    } else {
      error!("Refusing to proxy {}", target);
      Err(forbidden())
    }
  }
}

#[cfg(test)]
mod tests {
  use std::io::{Read, Write};

  use tmbridge_test_utils::MockJira;
  use wiremock::matchers::{body_string_contains, header, header_exists, method, path};
  use wiremock::{Mock, ResponseTemplate};

  use crate::client::JiraClient;
  use crate::config::JiraConfig;
  use crate::consts::ACCEPT_OCTET_STREAM;
  use crate::error::JiraError;

  fn client(jira: &MockJira) -> JiraClient {
    JiraClient::new(JiraConfig::basic(&jira.uri(), "test_user", "test_token"))
  }

  #[test]
  fn test_upload_attachment() -> anyhow::Result<()> {
    let jira = MockJira::start();
    jira.mount(
      Mock::given(method("POST"))
        .and(path("/rest/api/2/issue/TP-1/attachments"))
        .and(header("x-atlassian-token", "no-check"))
        .and(header_exists("content-type"))
        .and(body_string_contains("filename=\"report.txt\""))
        .and(body_string_contains("steps to reproduce"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{ "id": "900" }])))
        .expect(1),
    );

    let dir = tempfile::tempdir()?;
    let file = dir.path().join("report.txt");
    std::fs::File::create(&file)?.write_all(b"steps to reproduce")?;

    client(&jira).upload_attachment("TP-1", &file);
    jira.verify();

    let requests = jira.received_requests();
    let content_type = requests[0]
      .headers
      .get("content-type")
      .and_then(|v| v.to_str().ok())
      .unwrap_or_default();
    assert!(content_type.starts_with("multipart/form-data"));

    Ok(())
  }

  #[test]
  fn test_upload_attachment_failures_are_swallowed() -> anyhow::Result<()> {
    let jira = MockJira::start();
    jira.mount(
      Mock::given(method("POST"))
        .and(path("/rest/api/2/issue/TP-1/attachments"))
        .respond_with(ResponseTemplate::new(413))
        .expect(1),
    );

    let dir = tempfile::tempdir()?;
    let missing = dir.path().join("missing.txt");
    client(&jira).upload_attachment("TP-1", &missing);

    let file = dir.path().join("big.bin");
    std::fs::write(&file, [0u8; 16])?;
    client(&jira).upload_attachment("TP-1", &file);

    jira.verify();
    Ok(())
  }

  #[test]
  fn test_delete_attachment() -> anyhow::Result<()> {
    let jira = MockJira::start();
    jira.mount(
      Mock::given(method("DELETE"))
        .and(path("/rest/api/2/attachment/900"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1),
    );
    jira.mount(
      Mock::given(method("DELETE"))
        .and(path("/rest/api/2/attachment/404"))
        .respond_with(ResponseTemplate::new(404)),
    );
    jira.mount(
      Mock::given(method("DELETE"))
        .and(path("/rest/api/2/attachment/500"))
        .respond_with(ResponseTemplate::new(500)),
    );

    let client = client(&jira);
    client.delete_attachment("900")?;
    client.delete_attachment("404")?;
    let error = client.delete_attachment("500").unwrap_err();
    assert_eq!(error.status(), Some(reqwest::StatusCode::INTERNAL_SERVER_ERROR));
    jira.verify();

    Ok(())
  }

  #[test]
  fn test_get_attachment_content() -> anyhow::Result<()> {
    let jira = MockJira::start();
    jira.mount(
      Mock::given(method("GET"))
        .and(path("/secure/attachment/900/trace.log"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"line 1\nline 2\n".to_vec())),
    );

    let url = format!("{}/secure/attachment/900/trace.log", jira.uri());
    let content = client(&jira).get_attachment_content(&url, |body| {
      let mut content = String::new();
      body.read_to_string(&mut content).map(|_| content)
    })??;
    assert_eq!(content, "line 1\nline 2\n");

    let requests = jira.received_requests();
    assert_eq!(
      requests[0].headers.get("accept").and_then(|v| v.to_str().ok()),
      Some(ACCEPT_OCTET_STREAM)
    );
    assert!(requests[0].headers.contains_key("authorization"));

    Ok(())
  }

  #[test]
  fn test_get_attachment_content_not_found() {
    let jira = MockJira::start();
    jira.mount(
      Mock::given(method("GET"))
        .and(path("/secure/attachment/1/gone.png"))
        .respond_with(ResponseTemplate::new(404)),
    );

    let url = format!("{}/secure/attachment/1/gone.png", jira.uri());
    let mut called = false;
    let error = client(&jira)
      .get_attachment_content(&url, |_| called = true)
      .unwrap_err();
    assert!(error.is_not_found());
    assert!(!called);
  }

  #[test]
  fn test_proxy_for_get_strips_context_path() -> anyhow::Result<()> {
    let jira = MockJira::start();
    jira.mount(
      Mock::given(method("GET"))
        .and(path("/secure/attachment/123/x.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x89, b'P', b'N', b'G']))
        .expect(1),
    );

    let client = JiraClient::new(JiraConfig::basic(
      &jira.uri_with_context("jira"),
      "test_user",
      "test_token",
    ));
    let response = client.proxy_for_get("/secure/attachment/123/x.png")?;
    assert_eq!(response.bytes()?.as_ref(), [0x89, b'P', b'N', b'G']);
    jira.verify();

    Ok(())
  }

  #[test]
  fn test_proxy_for_get_attachment_content() -> anyhow::Result<()> {
    let jira = MockJira::start();
    jira.mount(
      Mock::given(method("GET"))
        .and(path("/attachment/content/77"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok")),
    );

    let response = client(&jira).proxy_for_get("/attachment/content/77")?;
    assert_eq!(response.text()?, "ok");

    Ok(())
  }

  #[test]
  fn test_proxy_for_get_rejects_other_targets() {
    let jira = MockJira::start();
    let client = JiraClient::new(JiraConfig::basic(
      &jira.uri_with_context("jira"),
      "test_user",
      "test_token",
    ));

    for path in [
      "/etc/passwd",
      "/secure/attachment/../../etc/passwd",
      "/secure/attachmentsX/1",
      "/rest/api/2/myself",
      "@evil.example.com/secure/attachment/1",
      "//evil.example.com/secure/attachment/1",
      "secure/attachment/1",
    ] {
      let error = client.proxy_for_get(path).unwrap_err();
      assert!(
        matches!(error, JiraError::ForbiddenProxyTarget(_)),
        "{path} should be rejected, got {error:?}"
      );
    }
    assert!(jira.received_requests().is_empty());
  }
}
