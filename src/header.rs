//! # Header Module
//!
//! The header text applied to every file, and the policy that decides how
//! many leading lines of a file count as an existing header block.
//!
//! ## Example
//!
//! ```rust
//! use reheader::header::{HeaderText, HeaderWindow};
//!
//! let header = HeaderText::new("/*\n * Copyright (c) {{year}} OpenMonero\n */\n").render("2023");
//! assert_eq!(header.as_str(), "/*\n * Copyright (c) 2023 OpenMonero\n */\n");
//! assert_eq!(header.line_count(), 3);
//!
//! let window: HeaderWindow = "9".parse().unwrap();
//! assert_eq!(window, HeaderWindow::Fixed(9));
//! ```

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use tracing::debug;

use crate::processor::split_lines;

/// Placeholder replaced by the configured year when the header is rendered.
pub const YEAR_PLACEHOLDER: &str = "{{year}}";

/// Immutable block of header text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderText {
  text: String,
}

impl HeaderText {
  pub fn new(text: impl Into<String>) -> Self {
    Self { text: text.into() }
  }

  /// Loads header text from a file.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or is not valid UTF-8.
  pub fn from_file(path: &Path) -> Result<Self> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read header file: {}", path.display()))?;
    debug!("Loaded {} byte header from {}", text.len(), path.display());
    Ok(Self { text })
  }

  /// Replaces every `{{year}}` placeholder with `year`.
  ///
  /// Text without the placeholder is returned unchanged.
  #[must_use]
  pub fn render(&self, year: &str) -> Self {
    if !self.text.contains(YEAR_PLACEHOLDER) {
      return self.clone();
    }
    Self {
      text: self.text.replace(YEAR_PLACEHOLDER, year),
    }
  }

  pub fn as_str(&self) -> &str {
    &self.text
  }

  /// Number of lines in the header, counting a trailing partial line.
  ///
  /// Lines are split the same way as file content.
  pub fn line_count(&self) -> usize {
    split_lines(&self.text).len()
  }
}

impl fmt::Display for HeaderText {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.text)
  }
}

/// How many leading lines of a file form its existing header block.
///
/// Only consulted once a file has been recognized as starting with a
/// `/*`, ` *`, ` *` comment block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderWindow {
  /// As many lines as the header being applied.
  #[default]
  HeaderLines,
  /// Up to and including the first line that closes the comment with `*/`.
  CommentEnd,
  /// A fixed number of lines.
  Fixed(usize),
}

impl HeaderWindow {
  /// The nine-line window used by [`apply_header`](crate::processor::apply_header).
  pub const LEGACY: Self = Self::Fixed(9);

  /// Number of lines to drop from `lines` before writing the header.
  ///
  /// Never exceeds `lines.len()`. [`HeaderWindow::CommentEnd`] falls back to
  /// `header_lines` when no line closes the comment.
  pub fn skip_count(&self, header_lines: usize, lines: &[&str]) -> usize {
    let skip = match self {
      HeaderWindow::HeaderLines => header_lines,
      HeaderWindow::CommentEnd => lines
        .iter()
        .position(|line| line.contains("*/"))
        .map_or(header_lines, |idx| idx + 1),
      HeaderWindow::Fixed(n) => *n,
    };
    skip.min(lines.len())
  }
}

impl fmt::Display for HeaderWindow {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      HeaderWindow::HeaderLines => write!(f, "header-lines"),
      HeaderWindow::CommentEnd => write!(f, "comment-end"),
      HeaderWindow::Fixed(n) => write!(f, "{n}"),
    }
  }
}

/// Error returned when a header window setting cannot be parsed.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid header window '{0}': expected 'header-lines', 'comment-end', or a line count")]
pub struct WindowParseError(pub String);

impl FromStr for HeaderWindow {
  type Err = WindowParseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "header-lines" => Ok(HeaderWindow::HeaderLines),
      "comment-end" => Ok(HeaderWindow::CommentEnd),
      other => other
        .parse::<usize>()
        .ok()
        .map(HeaderWindow::Fixed)
        .ok_or_else(|| WindowParseError(s.to_string())),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_line_count_with_trailing_newline() {
    assert_eq!(HeaderText::new("/*\n * a\n */\n").line_count(), 3);
  }

  #[test]
  fn test_line_count_without_trailing_newline() {
    assert_eq!(HeaderText::new("/*\n * a\n */").line_count(), 3);
  }

  #[test]
  fn test_line_count_empty() {
    assert_eq!(HeaderText::new("").line_count(), 0);
  }

  #[test]
  fn test_render_replaces_every_placeholder() {
    let header = HeaderText::new("(c) {{year}}\nGenerated {{year}}\n");
    assert_eq!(header.render("2023").as_str(), "(c) 2023\nGenerated 2023\n");
  }

  #[test]
  fn test_render_without_placeholder_is_verbatim() {
    let header = HeaderText::new("/*\n * Generated on 03-07-2023.\n */\n");
    assert_eq!(header.render("2030"), header);
  }

  #[test]
  fn test_parse_window() {
    assert_eq!("header-lines".parse(), Ok(HeaderWindow::HeaderLines));
    assert_eq!("Comment-End".parse(), Ok(HeaderWindow::CommentEnd));
    assert_eq!(" 9 ".parse(), Ok(HeaderWindow::Fixed(9)));
    assert_eq!(
      "nine".parse::<HeaderWindow>(),
      Err(WindowParseError("nine".to_string()))
    );
    assert!("-1".parse::<HeaderWindow>().is_err());
  }

  #[test]
  fn test_window_display_round_trips() {
    for window in [HeaderWindow::HeaderLines, HeaderWindow::CommentEnd, HeaderWindow::Fixed(9)] {
      assert_eq!(window.to_string().parse(), Ok(window));
    }
  }

  #[test]
  fn test_legacy_window_is_nine_lines() {
    let lines = vec!["x\n"; 12];
    assert_eq!(HeaderWindow::LEGACY.skip_count(4, &lines), 9);
  }

  #[test]
  fn test_skip_count_clamps_to_file_length() {
    let lines = ["/*\n", " * a\n", " * b\n", " */\n"];
    assert_eq!(HeaderWindow::Fixed(9).skip_count(9, &lines), 4);
    assert_eq!(HeaderWindow::HeaderLines.skip_count(9, &lines), 4);
    assert_eq!(HeaderWindow::HeaderLines.skip_count(2, &lines), 2);
  }

  #[test]
  fn test_skip_count_comment_end() {
    let lines = ["/*\n", " * a\n", " * b\n", " */\n", "\n", "package main\n"];
    assert_eq!(HeaderWindow::CommentEnd.skip_count(9, &lines), 4);
  }

  #[test]
  fn test_skip_count_comment_end_without_close_falls_back() {
    let lines = ["/*\n", " * a\n", " * b\n", " * c\n", " * d\n"];
    assert_eq!(HeaderWindow::CommentEnd.skip_count(3, &lines), 3);
  }
}
