use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Represents a Jira issue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraIssue {
  pub id: String,
  pub key: String,
  #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
  pub self_url: Option<String>,
  #[serde(default)]
  pub fields: JiraIssueFields,
}

/// Represents Jira issue fields.
///
/// Well-known fields are typed; everything else (custom fields included) is
/// kept verbatim in `other`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JiraIssueFields {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub summary: Option<String>,
  /// Plain text on API v2, an ADF document on v3
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<Value>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub status: Option<JiraStatus>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub issuetype: Option<JiraIssueType>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub attachment: Option<Vec<JiraAttachment>>,
  #[serde(flatten)]
  pub other: Map<String, Value>,
}

/// Attachment metadata embedded in issue fields
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraAttachment {
  pub id: String,
  pub filename: String,
  /// Absolute download URL
  #[serde(default)]
  pub content: Option<String>,
  #[serde(default)]
  pub mime_type: Option<String>,
  #[serde(default)]
  pub size: Option<u64>,
  #[serde(default)]
  pub created: Option<String>,
}

/// Response of `POST /issue`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraAddIssueResponse {
  pub id: String,
  pub key: String,
  #[serde(rename = "self", default)]
  pub self_url: Option<String>,
}

/// One page of a JQL search
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraIssueListResponse {
  #[serde(default)]
  pub start_at: u32,
  #[serde(default)]
  pub max_results: u32,
  #[serde(default)]
  pub total: u64,
  #[serde(default)]
  pub issues: Vec<JiraIssue>,
}

/// Represents a Jira issue status
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraStatus {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub status_category: Option<JiraStatusCategory>,
}

/// Coarse status bucket (`new`, `indeterminate`, `done`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraStatusCategory {
  #[serde(default)]
  pub id: Option<i64>,
  pub key: String,
  #[serde(default)]
  pub name: Option<String>,
}

/// Statuses available to one issue type of a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraProjectStatuses {
  pub id: String,
  pub name: String,
  #[serde(default)]
  pub subtask: bool,
  #[serde(default)]
  pub statuses: Vec<JiraStatus>,
}

/// Represents a Jira transition.
///
/// Doubles as the request payload of a transition: only the populated fields
/// are serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraTransition {
  pub id: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub to: Option<JiraStatus>,
}

impl JiraTransition {
  /// A transition reference carrying only its id
  pub fn with_id(id: &str) -> Self {
    Self {
      id: id.to_string(),
      name: None,
      to: None,
    }
  }
}

/// Represents a list of Jira transitions
#[derive(Debug, Deserialize)]
pub(crate) struct JiraTransitions {
  #[serde(default)]
  pub transitions: Vec<JiraTransition>,
}

/// Represents a transition request payload
#[derive(Debug, Serialize)]
pub(crate) struct TransitionRequest<'a> {
  pub transition: &'a JiraTransition,
}

/// Represents a Jira issue type
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraIssueType {
  pub id: String,
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(default)]
  pub subtask: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub icon_url: Option<String>,
}

/// Represents a Jira project
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraProject {
  pub id: String,
  pub key: String,
  #[serde(default)]
  pub name: Option<String>,
  #[serde(default)]
  pub issue_types: Vec<JiraIssueType>,
}

/// Represents a Jira user (Cloud identifies by `accountId`, Server by `name`/`key`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraUser {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub account_id: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub key: Option<String>,
  #[serde(default)]
  pub display_name: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub email_address: Option<String>,
  #[serde(default)]
  pub active: bool,
}

/// A field definition from `GET /field`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraField {
  pub id: String,
  pub name: String,
  #[serde(default)]
  pub custom: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub schema: Option<JiraFieldSchema>,
}

/// Value type of a field
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraFieldSchema {
  #[serde(rename = "type")]
  pub field_type: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub items: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub system: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub custom: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub custom_id: Option<i64>,
}

/// Field descriptors keyed by field id, as returned by create metadata
pub type CreateMetadataFields = BTreeMap<String, JiraCreateMetadataField>;

/// How one field may be filled in when creating an issue
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraCreateMetadataField {
  #[serde(default)]
  pub required: bool,
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub key: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub schema: Option<JiraFieldSchema>,
  #[serde(default)]
  pub has_default_value: bool,
  #[serde(default)]
  pub operations: Vec<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub allowed_values: Option<Vec<Value>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub auto_complete_url: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub default_value: Option<Value>,
}

/// `GET /issue/createmeta?expand=projects.issuetypes.fields`
#[derive(Debug, Deserialize)]
pub(crate) struct JiraCreateMetadataResponse {
  #[serde(default)]
  pub projects: Vec<CreateMetadataProject>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateMetadataProject {
  #[serde(default)]
  pub issuetypes: Vec<CreateMetadataIssueType>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateMetadataIssueType {
  #[serde(default)]
  pub fields: Option<CreateMetadataFields>,
}

/// A sprint offered by the Greenhopper sprint picker
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraSprint {
  pub id: i64,
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub state_key: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub board_name: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JiraSprintResponse {
  #[serde(default)]
  pub suggestions: Option<Vec<JiraSprint>>,
  #[serde(default)]
  pub all_matches: Option<Vec<JiraSprint>>,
}

/// An epic offered by the Greenhopper epic search
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraEpic {
  pub key: String,
  pub name: String,
  #[serde(default)]
  pub is_done: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JiraEpicResponse {
  #[serde(default)]
  pub epic_lists: Option<Vec<JiraEpicList>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JiraEpicList {
  #[serde(default)]
  pub epic_names: Option<Vec<JiraEpic>>,
}

/// An issue offered by the issue picker
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraIssueLink {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id: Option<i64>,
  pub key: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub key_html: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub img: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub summary: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub summary_text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct JiraIssuePickerResponse {
  #[serde(default)]
  pub sections: Option<Vec<JiraIssuePickerSection>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct JiraIssuePickerSection {
  #[serde(default)]
  pub issues: Option<Vec<JiraIssueLink>>,
}

/// A kind of link between issues ("blocks", "relates to", ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraIssueLinkType {
  pub id: String,
  pub name: String,
  #[serde(default)]
  pub inward: Option<String>,
  #[serde(default)]
  pub outward: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JiraIssueLinkTypeResponse {
  #[serde(default)]
  pub issue_link_types: Option<Vec<JiraIssueLinkType>>,
}

/// Body of `POST /issueLink`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraIssueLinkRequest {
  #[serde(rename = "type")]
  pub link_type: LinkTypeRef,
  pub inward_issue: IssueRef,
  pub outward_issue: IssueRef,
}

impl JiraIssueLinkRequest {
  /// Link `inward_key` to `outward_key` through the link type named `link_type`
  pub fn new(link_type: &str, inward_key: &str, outward_key: &str) -> Self {
    Self {
      link_type: LinkTypeRef {
        id: None,
        name: Some(link_type.to_string()),
      },
      inward_issue: IssueRef {
        key: inward_key.to_string(),
      },
      outward_issue: IssueRef {
        key: outward_key.to_string(),
      },
    }
  }
}

/// Reference to a link type by id or name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkTypeRef {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
}

/// Reference to an issue by key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueRef {
  pub key: String,
}
