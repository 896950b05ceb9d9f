//! # Jira API Endpoints
//!
//! Endpoint implementations grouped by Jira resource. Each module adds
//! methods to [`JiraClient`](crate::JiraClient).

pub mod agile;
pub mod attachments;
pub mod issues;
pub mod links;
pub mod projects;
pub mod search;
pub mod transitions;
pub mod users;
