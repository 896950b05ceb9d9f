//! # Command Line Interface
//!
//! Derive-based CLI definition and the handlers that map each subcommand onto
//! one Jira client operation.

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tmbridge_jira::{JiraClient, create_jira_client};
use tracing::info;

use crate::output::write_json;
use crate::profile;

/// Top-level CLI command for tmbridge
#[derive(Parser)]
#[command(name = "tmbridge")]
#[command(about = "Talk to Jira the way the test-management integration does")]
#[command(
  long_about = "tmbridge runs the Jira operations used by the test-management integration.\n\n\
        Connection settings come from a TOML profile (see --config) and the JIRA_HOST,\n\
        JIRA_ACCOUNT, JIRA_PASSWORD, JIRA_TOKEN and JIRA_AUTH_TYPE environment variables.\n\
        Results are printed to stdout as JSON."
)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(propagate_version = true)]
#[command(subcommand_required(true))]
#[command(disable_help_subcommand = true)]
#[command(max_term_width = 120)]
pub struct Cli {
  /// Sets the level of verbosity (can be used multiple times)
  #[arg(
    short = 'v',
    long = "verbose",
    action = ArgAction::Count,
    global = true,
    long_help = "Sets the level of verbosity for tracing and logging output.\n\n\
             -v: Show info level messages\n\
             -vv: Show debug level messages\n\
             -vvv: Show trace level messages\n\n\
             Falls back to TMBRIDGE_VERBOSITY (0-3) when not given."
  )]
  pub verbose: u8,

  /// Connection profile to use instead of <config dir>/jira.toml
  #[arg(long, value_name = "PATH", global = true)]
  pub config: Option<PathBuf>,

  /// Subcommands
  #[command(subcommand)]
  pub command: Commands,
}

/// Subcommands for the tmbridge tool
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
  /// Verify the URL and credentials of the profile
  Check,

  /// Show one issue
  Issue {
    /// Issue key or id (e.g., TP-123)
    key: String,
  },

  /// List the transitions available to an issue
  Transitions {
    /// Issue key or id
    key: String,
  },

  /// Page through the issues of one type in a project
  Search {
    /// Project key
    project: String,

    /// Issue type name or id
    issue_type: String,

    /// Index of the first issue to return
    #[arg(long, default_value_t = 0)]
    start_at: u32,

    /// Page size
    #[arg(long, default_value_t = 50)]
    max_results: u32,

    /// Comma-separated fields to return (all fields when omitted)
    #[arg(long)]
    fields: Option<String>,
  },

  /// Show a project and its issue types
  Project {
    /// Project key or id
    key: String,
  },

  /// List the issue types usable in a project
  IssueTypes {
    /// Project key
    project: String,
  },

  /// Show the fields required to create an issue
  CreateMeta {
    /// Project key
    project: String,

    /// Issue type id
    issue_type: String,
  },

  /// List every field definition
  Fields,

  /// List the statuses of each issue type in a project
  Statuses {
    /// Project key
    project: String,
  },

  /// Search users, optionally restricted to assignees of a project
  Users {
    /// Only users assignable in this project
    #[arg(long)]
    project: Option<String>,

    /// Name or email to search for
    query: Option<String>,
  },

  /// Search sprints
  Sprints {
    /// Sprint name filter
    query: Option<String>,
  },

  /// Search open epics
  Epics {
    /// Epic name or key filter
    query: String,
  },

  /// List issue link types
  LinkTypes,

  /// Attach a file to an issue
  Attach {
    /// Issue key
    key: String,

    /// File to upload
    file: PathBuf,
  },

  /// Download an attachment to a local file
  Download {
    /// Absolute attachment URL
    url: String,

    /// Destination file
    out: PathBuf,
  },
}

/// Handle the parsed CLI
pub fn handle_cli(cli: Cli) -> Result<()> {
  let config = profile::load_profile(cli.config.as_deref()).context("Failed to load Jira connection profile")?;
  let client = create_jira_client(Some(config)).context("Failed to create Jira client")?;

  let stdout = io::stdout();
  let mut out = stdout.lock();
  run_command(&client, cli.command, &mut out)
}

/// Run one command against `client`, writing its JSON result to `out`
pub fn run_command<W: Write + ?Sized>(client: &JiraClient, command: Commands, out: &mut W) -> Result<()> {
  match command {
    Commands::Check => {
      client.test_connection().context("Jira connection check failed")?;
      write_json(out, &serde_json::json!({ "url": client.endpoint(), "connected": true }))
    }
    Commands::Issue { key } => {
      let issue = client
        .get_issue(&key)
        .with_context(|| format!("Failed to fetch issue {key}"))?;
      write_json(out, &issue)
    }
    Commands::Transitions { key } => {
      let transitions = client
        .get_transitions(&key)
        .with_context(|| format!("Failed to fetch transitions of {key}"))?;
      write_json(out, &transitions)
    }
    Commands::Search {
      project,
      issue_type,
      start_at,
      max_results,
      fields,
    } => {
      let page = client
        .get_project_issues(start_at, max_results, &project, &issue_type, fields.as_deref())
        .with_context(|| format!("Failed to search {issue_type} issues in {project}"))?;
      write_json(out, &page)
    }
    Commands::Project { key } => {
      let project = client
        .get_project(&key)
        .with_context(|| format!("Failed to fetch project {key}"))?;
      write_json(out, &project)
    }
    Commands::IssueTypes { project } => {
      let issue_types = client
        .get_issue_type(&project)
        .with_context(|| format!("Failed to fetch issue types of {project}"))?;
      write_json(out, &issue_types)
    }
    Commands::CreateMeta { project, issue_type } => {
      let fields = client
        .get_create_metadata(&project, &issue_type)
        .with_context(|| format!("Failed to fetch create metadata for {project}/{issue_type}"))?;
      write_json(out, &fields)
    }
    Commands::Fields => {
      let fields = client.get_fields().context("Failed to fetch fields")?;
      write_json(out, &fields)
    }
    Commands::Statuses { project } => {
      let statuses = client
        .get_status(&project)
        .with_context(|| format!("Failed to fetch statuses of {project}"))?;
      write_json(out, &statuses)
    }
    Commands::Users { project, query } => {
      let users = match project {
        Some(project) => client.assignable_user_search(&project, query.as_deref()),
        None => client.all_user_search(query.as_deref()),
      };
      write_json(out, &users)
    }
    Commands::Sprints { query } => {
      let sprints = client.get_sprint(query.as_deref()).context("Failed to search sprints")?;
      write_json(out, &sprints)
    }
    Commands::Epics { query } => {
      let epics = client.get_epics(&query).context("Failed to search epics")?;
      write_json(out, &epics)
    }
    Commands::LinkTypes => {
      let link_types = client.get_issue_link_type().context("Failed to fetch issue link types")?;
      write_json(out, &link_types)
    }
    Commands::Attach { key, file } => {
      File::open(&file).with_context(|| format!("Cannot read {}", file.display()))?;
      client.upload_attachment(&key, &file);
      info!("Requested upload of {} to {}", file.display(), key);
      write_json(out, &serde_json::json!({ "issue": key, "file": file }))
    }
    Commands::Download { url, out: destination } => {
      let mut file =
        File::create(&destination).with_context(|| format!("Failed to create {}", destination.display()))?;
      let bytes = client
        .get_attachment_content(&url, |body| io::copy(body, &mut file))
        .with_context(|| format!("Failed to download {url}"))?
        .with_context(|| format!("Failed to write {}", destination.display()))?;
      write_json(out, &serde_json::json!({ "file": destination, "bytes": bytes }))
    }
  }
}
