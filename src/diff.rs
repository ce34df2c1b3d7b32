//! # Diff Module
//!
//! Renders unified diffs of the rewrites a dry run would perform.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use owo_colors::{OwoColorize, Stream};
use similar::TextDiff;

/// Lines of unchanged context around each hunk.
const CONTEXT_LINES: usize = 3;

/// Shows and/or saves diffs of pending header rewrites.
#[derive(Debug, Default)]
pub struct DiffManager {
  /// Print diffs to stderr
  pub show_diff: bool,

  /// Append diffs to this file
  pub save_diff_path: Option<PathBuf>,
}

impl DiffManager {
  pub const fn new(show_diff: bool, save_diff_path: Option<PathBuf>) -> Self {
    Self {
      show_diff,
      save_diff_path,
    }
  }

  pub const fn is_active(&self) -> bool {
    self.show_diff || self.save_diff_path.is_some()
  }

  /// Truncates the diff output file so a run starts from an empty file.
  pub fn init(&self) -> Result<()> {
    if let Some(ref path) = self.save_diff_path {
      std::fs::write(path, "").with_context(|| format!("Failed to create diff file: {}", path.display()))?;
    }
    Ok(())
  }

  /// Builds the unified diff text for one file.
  pub fn render(path: &Path, original: &str, new: &str) -> String {
    let display = path.to_string_lossy();
    TextDiff::from_lines(original, new)
      .unified_diff()
      .context_radius(CONTEXT_LINES)
      .header(&format!("a/{display}"), &format!("b/{display}"))
      .to_string()
  }

  /// Shows and/or saves the diff between `original` and `new` for `path`.
  pub fn display_diff(&self, path: &Path, original: &str, new: &str) -> Result<()> {
    if !self.is_active() {
      return Ok(());
    }

    let diff = Self::render(path, original, new);

    if self.show_diff {
      for line in diff.lines() {
        if line.starts_with('+') && !line.starts_with("+++") {
          eprintln!("{}", line.if_supports_color(Stream::Stderr, |l| l.green()));
        } else if line.starts_with('-') && !line.starts_with("---") {
          eprintln!("{}", line.if_supports_color(Stream::Stderr, |l| l.red()));
        } else {
          eprintln!("{line}");
        }
      }
    }

    if let Some(ref diff_path) = self.save_diff_path {
      let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(diff_path)
        .with_context(|| format!("Failed to open diff file: {}", diff_path.display()))?;
      file
        .write_all(diff.as_bytes())
        .with_context(|| format!("Failed to write diff file: {}", diff_path.display()))?;
    }

    Ok(())
  }
}
