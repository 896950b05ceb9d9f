//! Temporary connection profile files for testing
//!
//! This module provides a guard that writes a TOML profile into a per-test
//! temporary directory and removes it when dropped.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A profile file living in a temporary directory
pub struct ProfileFileGuard {
  /// The temporary directory holding the profile
  pub temp_dir: TempDir,
  path: PathBuf,
}

impl ProfileFileGuard {
  /// File name used for profiles written by this guard
  pub const FILE_NAME: &'static str = "jira.toml";

  /// Write `content` to `<tempdir>/jira.toml`
  pub fn new(content: &str) -> anyhow::Result<Self> {
    let temp_dir = TempDir::new().map_err(|e| anyhow::anyhow!("Failed to create temporary directory: {e}"))?;
    let path = temp_dir.path().join(Self::FILE_NAME);
    fs::write(&path, content).map_err(|e| anyhow::anyhow!("Failed to write profile file: {e}"))?;
    Ok(Self { temp_dir, path })
  }

  /// A guard whose directory exists but holds no profile file
  pub fn missing() -> anyhow::Result<Self> {
    let temp_dir = TempDir::new().map_err(|e| anyhow::anyhow!("Failed to create temporary directory: {e}"))?;
    let path = temp_dir.path().join(Self::FILE_NAME);
    Ok(Self { temp_dir, path })
  }

  /// Path of the profile file
  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Directory that contains the profile file
  pub fn dir(&self) -> &Path {
    self.temp_dir.path()
  }
}
