//! # Jira REST Client
//!
//! Synchronous Jira REST client used by tmbridge to mirror test-management
//! defects and demands into Jira Cloud and Server/DC: issue CRUD,
//! transitions, JQL search, project metadata, user pickers, issue links,
//! sprints and epics, and attachments.
//!
//! ```no_run
//! use tmbridge_jira::{JiraConfig, create_jira_client};
//!
//! # fn main() -> tmbridge_jira::Result<()> {
//! let client = create_jira_client(Some(JiraConfig::basic("https://jira.example.com", "qa", "secret")))?;
//! client.test_connection()?;
//! let issue = client.get_issue("TP-1")?;
//! println!("{}", issue.key);
//! # Ok(())
//! # }
//! ```

mod auth;
mod client;
pub mod config;
pub mod consts;
mod endpoints;
pub mod error;
pub mod models;

pub use auth::build_auth_headers;
// Re-export the client
pub use client::{JiraClient, create_jira_client};
pub use config::{AuthType, JiraConfig};
pub use error::{FieldErrors, JiraError, Result};
// Re-export models
pub use models::{
  CreateMetadataFields, IssueRef, JiraAddIssueResponse, JiraAttachment, JiraCreateMetadataField, JiraEpic, JiraField,
  JiraFieldSchema, JiraIssue, JiraIssueFields, JiraIssueLink, JiraIssueLinkRequest, JiraIssueLinkType,
  JiraIssueListResponse, JiraIssueType, JiraProject, JiraProjectStatuses, JiraSprint, JiraStatus, JiraStatusCategory,
  JiraTransition, JiraUser, LinkTypeRef,
};
