//! # Content Transformer Module
//!
//! Decides whether a file already starts with a header block and composes the
//! rewritten content.
//!
//! Detection is a heuristic, not a comment parser: a file with at least four
//! lines whose first three lines start with `/*`, ` *` and ` *` is treated as
//! carrying a header. The size of that header is decided by the configured
//! [`HeaderWindow`].

use crate::header::{HeaderText, HeaderWindow};

/// Minimum number of lines a file needs before its header can be replaced.
pub const MIN_LINES_FOR_REPLACEMENT: usize = 4;

/// What the transformer did to a file's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rewrite {
  /// The leading `skipped_lines` lines were dropped and the header written in
  /// their place.
  Replaced { skipped_lines: usize },
  /// The header and a blank line were written before the original content.
  Prepended,
}

/// Splits content into lines, keeping each line's terminator.
///
/// A line ends at `\n`, at `\r\n`, or at a lone `\r`. Concatenating the
/// result reproduces the input exactly, including a missing final newline.
pub fn split_lines(content: &str) -> Vec<&str> {
  let bytes = content.as_bytes();
  let mut lines = Vec::new();
  let mut start = 0;

  for (idx, &byte) in bytes.iter().enumerate() {
    let ends_line = byte == b'\n' || (byte == b'\r' && bytes.get(idx + 1) != Some(&b'\n'));
    if ends_line {
      lines.push(&content[start..=idx]);
      start = idx + 1;
    }
  }
  if start < content.len() {
    lines.push(&content[start..]);
  }

  lines
}

/// Rewrites file content so that it starts with the header.
pub struct ContentTransformer {
  /// How many lines an existing header block spans
  window: HeaderWindow,
}

impl ContentTransformer {
  pub const fn new(window: HeaderWindow) -> Self {
    Self { window }
  }

  pub const fn window(&self) -> HeaderWindow {
    self.window
  }

  /// Returns `true` if `lines` look like they start with a `/* ... */` header.
  pub fn has_existing_header(lines: &[&str]) -> bool {
    lines.len() >= MIN_LINES_FOR_REPLACEMENT
      && lines[0].starts_with("/*")
      && lines[1].starts_with(" *")
      && lines[2].starts_with(" *")
  }

  /// Composes the new content for a file.
  ///
  /// # Returns
  ///
  /// The kind of rewrite performed and the full new content.
  pub fn rewrite(&self, header: &HeaderText, content: &str) -> (Rewrite, String) {
    let lines = split_lines(content);

    if Self::has_existing_header(&lines) {
      let skipped_lines = self.window.skip_count(header.line_count(), &lines);
      let remainder: usize = lines[skipped_lines..].iter().map(|line| line.len()).sum();

      let mut new_content = String::with_capacity(header.as_str().len() + remainder);
      new_content.push_str(header.as_str());
      for line in &lines[skipped_lines..] {
        new_content.push_str(line);
      }
      return (Rewrite::Replaced { skipped_lines }, new_content);
    }

    let mut new_content = String::with_capacity(header.as_str().len() + 1 + content.len());
    new_content.push_str(header.as_str());
    new_content.push('\n');
    new_content.push_str(content);
    (Rewrite::Prepended, new_content)
  }
}
