//! Constants for the tmbridge-jira client.

/// User-Agent header value for the Jira API client
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// REST prefix used when a configuration does not name one
pub const DEFAULT_API_PREFIX: &str = "/rest/api/2";

/// Namespace of the legacy agile endpoints (sprints, epics)
pub const GREENHOPPER_V1_PREFIX: &str = "/rest/greenhopper/1.0";

/// Accept-Encoding sent with every request
pub const ACCEPT_ENCODING: &str = "gzip,x-gzip,deflate";

/// Accept header for binary attachment downloads
pub const ACCEPT_OCTET_STREAM: &str = "application/octet-stream, */*";

/// Page size used by the user search endpoints
pub const USER_SEARCH_PAGE_SIZE: u32 = 30;

/// Page size used by the epic search endpoint
pub const EPIC_SEARCH_PAGE_SIZE: u32 = 300;

/// Filter applied to the issue picker when choosing issues to link
pub const ISSUE_LINK_FILTER_JQL: &str = "project in projectsWhereUserHasPermission(\"Link Issues\") AND (resolution = Unresolved or statusCategory != Done) ORDER BY priority DESC, updated DESC";

/// Path prefixes `proxy_for_get` is allowed to reach
pub const PROXY_ALLOWED_PREFIXES: [&str; 2] = ["/secure/attachment", "/attachment/content"];

/// Marker every `/myself` payload starts with
pub const USER_PAYLOAD_MARKER: &str = "{\"self\"";
