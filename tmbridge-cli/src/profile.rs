//! # Connection Profile
//!
//! Loads Jira connection settings from a TOML profile and overlays the
//! `JIRA_*` environment variables on top of it.
//!
//! ```toml
//! url = "http://jira.internal:8080/jira"
//! account = "qa-bot"
//! password = "secret"
//! auth_type = "basic"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::Deserialize;
use tmbridge_jira::consts::DEFAULT_API_PREFIX;
use tmbridge_jira::{AuthType, JiraConfig};
use tracing::debug;
use url::Url;

pub const ENV_JIRA_HOST: &str = "JIRA_HOST";
pub const ENV_JIRA_ACCOUNT: &str = "JIRA_ACCOUNT";
pub const ENV_JIRA_PASSWORD: &str = "JIRA_PASSWORD";
pub const ENV_JIRA_TOKEN: &str = "JIRA_TOKEN";
pub const ENV_JIRA_AUTH_TYPE: &str = "JIRA_AUTH_TYPE";

const PROFILE_FILE_NAME: &str = "jira.toml";

/// Profile as written on disk; every key is optional so the environment can
/// supply the rest
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProfileFile {
  url: Option<String>,
  account: Option<String>,
  password: Option<String>,
  token: Option<String>,
  #[serde(alias = "authType")]
  auth_type: Option<String>,
  prefix: Option<String>,
}

/// Default profile location, `<config dir>/jira.toml`
pub fn default_profile_path() -> Result<PathBuf> {
  let proj_dirs = ProjectDirs::from("", "", "tmbridge").context("Failed to determine project directories")?;
  Ok(proj_dirs.config_dir().join(PROFILE_FILE_NAME))
}

/// Load the connection profile from `path` (or the default location) and the
/// process environment
pub fn load_profile(path: Option<&Path>) -> Result<JiraConfig> {
  load_profile_with(path, |key| std::env::var(key).ok())
}

/// Load the connection profile, reading environment variables through `env`.
///
/// An explicit `path` must exist; the default location may be absent, in
/// which case the environment alone has to provide the settings.
pub fn load_profile_with<F>(path: Option<&Path>, env: F) -> Result<JiraConfig>
where
  F: Fn(&str) -> Option<String>,
{
  let file = match path {
    Some(path) => read_profile(path)?,
    None => {
      let path = default_profile_path()?;
      if path.exists() {
        read_profile(&path)?
      } else {
        debug!("No profile at {}, using environment only", path.display());
        ProfileFile::default()
      }
    }
  };

  let pick = |key: &str, from_file: Option<String>| env(key).filter(|v| !v.is_empty()).or(from_file);

  let url = pick(ENV_JIRA_HOST, file.url)
    .ok_or_else(|| anyhow!("No Jira URL configured. Set `url` in the profile or the {ENV_JIRA_HOST} variable"))?;

  Ok(JiraConfig {
    url: ensure_scheme(&url)?,
    account: pick(ENV_JIRA_ACCOUNT, file.account).unwrap_or_default(),
    password: pick(ENV_JIRA_PASSWORD, file.password).unwrap_or_default(),
    token: pick(ENV_JIRA_TOKEN, file.token).unwrap_or_default(),
    auth_type: pick(ENV_JIRA_AUTH_TYPE, file.auth_type)
      .map(|flag| AuthType::from_flag(&flag))
      .unwrap_or_default(),
    prefix: file.prefix.unwrap_or_else(|| DEFAULT_API_PREFIX.to_string()),
  })
}

fn read_profile(path: &Path) -> Result<ProfileFile> {
  let content = fs::read_to_string(path).with_context(|| format!("Failed to read profile {}", path.display()))?;
  toml::from_str(&content).with_context(|| format!("Failed to parse profile {}", path.display()))
}

/// Prefix `https://` onto hosts given without a scheme
fn ensure_scheme(input: &str) -> Result<String> {
  let trimmed = input.trim();
  if trimmed.is_empty() {
    return Err(anyhow!("Host cannot be empty"));
  }

  // "host:8080" parses as scheme "host", so a URL only counts when it has a host.
  let url = match Url::parse(trimmed) {
    Ok(url) if url.host().is_some() => url,
    _ => Url::parse(&format!("https://{trimmed}")).with_context(|| format!("Invalid Jira host '{trimmed}'"))?,
  };

  Ok(url.as_str().trim_end_matches('/').to_string())
}
