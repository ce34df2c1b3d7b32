//! # Report Module
//!
//! Records what happened to each visited file and summarizes a run. Reports
//! can be written as JSON for tooling.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};

/// Information about a visited file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
  /// Path to the file, as produced by the directory walk
  #[serde(with = "path_serialization")]
  pub path: PathBuf,
  /// What was done to the file
  pub action: FileAction,
  /// Extra context, e.g. the ignore suffix that matched or an error message
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub detail: Option<String>,
}

impl FileReport {
  pub fn new(path: impl Into<PathBuf>, action: FileAction) -> Self {
    Self {
      path: path.into(),
      action,
      detail: None,
    }
  }

  #[must_use]
  pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
    self.detail = Some(detail.into());
    self
  }
}

/// Possible outcomes for a visited file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileAction {
  /// An existing header block was replaced (or would be, in a dry run)
  Replaced,
  /// The header was written before the original content
  Prepended,
  /// The file already started with the header and was left alone
  Unchanged,
  /// The path matched an ignored suffix, or was a symlink
  Ignored,
  /// Reading or writing failed
  Failed,
}

mod path_serialization {
  use std::path::{Path, PathBuf};

  use serde::{Deserialize, Deserializer, Serializer};

  pub fn serialize<S>(path: &Path, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    serializer.serialize_str(&path.to_string_lossy())
  }

  pub fn deserialize<'de, D>(deserializer: D) -> Result<PathBuf, D::Error>
  where
    D: Deserializer<'de>,
  {
    let s = String::deserialize(deserializer)?;
    Ok(PathBuf::from(s))
  }
}

/// Counts per action for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingSummary {
  /// Every file and symlink the walk produced
  pub total_files: usize,
  pub replaced: usize,
  pub prepended: usize,
  pub unchanged: usize,
  pub ignored: usize,
  pub failed: usize,
  /// Wall-clock time of the run
  #[serde(with = "duration_millis")]
  pub processing_time: Duration,
}

impl ProcessingSummary {
  pub fn from_reports(reports: &[FileReport], processing_time: Duration) -> Self {
    let mut summary = Self {
      total_files: reports.len(),
      processing_time,
      ..Self::default()
    };

    for report in reports {
      match report.action {
        FileAction::Replaced => summary.replaced += 1,
        FileAction::Prepended => summary.prepended += 1,
        FileAction::Unchanged => summary.unchanged += 1,
        FileAction::Ignored => summary.ignored += 1,
        FileAction::Failed => summary.failed += 1,
      }
    }

    summary
  }

  /// Files whose content changed (or would change).
  pub const fn changed(&self) -> usize {
    self.replaced + self.prepended
  }
}

mod duration_millis {
  use std::time::Duration;

  use serde::{Deserialize, Deserializer, Serializer};

  pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
  }

  pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
  where
    D: Deserializer<'de>,
  {
    Ok(Duration::from_millis(u64::deserialize(deserializer)?))
  }
}

/// Top-level JSON document.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonReport {
  /// Local time the report was generated, RFC 3339
  pub generated_at: String,
  /// Root directory that was walked
  #[serde(with = "path_serialization")]
  pub root: PathBuf,
  /// Whether files were left unmodified
  pub dry_run: bool,
  pub summary: ProcessingSummary,
  pub files: Vec<FileReport>,
}

/// Writes a JSON report of a run to `output_path`.
pub fn write_json_report(
  output_path: &Path,
  root: &Path,
  dry_run: bool,
  files: &[FileReport],
  summary: &ProcessingSummary,
) -> Result<()> {
  let report = JsonReport {
    generated_at: Local::now().to_rfc3339(),
    root: root.to_path_buf(),
    dry_run,
    summary: summary.clone(),
    files: files.to_vec(),
  };

  let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
  fs::write(output_path, json).with_context(|| format!("Failed to write report: {}", output_path.display()))
}
