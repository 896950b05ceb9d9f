//! Mock Jira server for blocking clients
//!
//! `reqwest::blocking` refuses to run inside an async context, so the usual
//! `#[tokio::test]` + `MockServer` pairing does not work for the tmbridge
//! client. [`MockJira`] owns its own tokio runtime and only enters it to start
//! the server and mount expectations, leaving the test thread free for
//! blocking calls.

use tokio::runtime::Runtime;
use wiremock::{Mock, MockServer, Request};

/// A wiremock server driven from synchronous test code
pub struct MockJira {
  // Declared before the runtime so the server is released first.
  server: MockServer,
  runtime: Runtime,
}

impl Default for MockJira {
  fn default() -> Self {
    Self::start()
  }
}

impl MockJira {
  /// Start a new mock server on a private runtime
  pub fn start() -> Self {
    let runtime = Runtime::new().expect("Failed to create tokio runtime for mock server");
    let server = runtime.block_on(MockServer::start());
    Self { server, runtime }
  }

  /// Base URI of the server, e.g. `http://127.0.0.1:41234`
  pub fn uri(&self) -> String {
    self.server.uri()
  }

  /// Base URI with a context path appended, e.g. `http://127.0.0.1:41234/jira`
  pub fn uri_with_context(&self, context: &str) -> String {
    format!("{}/{}", self.server.uri(), context.trim_matches('/'))
  }

  /// Mount a mock on the server
  pub fn mount(&self, mock: Mock) {
    self.runtime.block_on(mock.mount(&self.server));
  }

  /// Verify every `expect(..)` registered so far, panicking on mismatch
  pub fn verify(&self) {
    self.runtime.block_on(self.server.verify());
  }

  /// All requests received so far
  pub fn received_requests(&self) -> Vec<Request> {
    self
      .runtime
      .block_on(self.server.received_requests())
      .unwrap_or_default()
  }
}

#[cfg(test)]
mod tests {
  use std::io::{Read, Write};
  use std::net::TcpStream;

  use wiremock::matchers::{method, path};
  use wiremock::ResponseTemplate;

  use super::*;

  fn raw_get(uri: &str, request_path: &str) -> String {
    let address = uri.trim_start_matches("http://");
    let mut stream = TcpStream::connect(address).expect("connect to mock server");
    write!(
      stream,
      "GET {request_path} HTTP/1.1\r\nHost: {address}\r\nConnection: close\r\n\r\n"
    )
    .expect("write request");
    let mut response = String::new();
    stream.read_to_string(&mut response).expect("read response");
    response
  }

  #[test]
  fn test_mock_jira_serves_mounted_mock() {
    let jira = MockJira::start();
    jira.mount(
      Mock::given(method("GET"))
        .and(path("/rest/api/2/myself"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1),
    );

    let response = raw_get(&jira.uri(), "/rest/api/2/myself");
    assert!(response.starts_with("HTTP/1.1 200"));
    assert!(response.ends_with("ok"));

    jira.verify();
    assert_eq!(jira.received_requests().len(), 1);
  }

  #[test]
  fn test_uri_with_context() {
    let jira = MockJira::start();
    assert_eq!(jira.uri_with_context("/jira/"), format!("{}/jira", jira.uri()));
  }
}
