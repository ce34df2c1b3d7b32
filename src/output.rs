//! # Output Module
//!
//! All user-facing terminal output for reheader: consistent formatting,
//! colors, and symbols. Quiet mode reduces listings to bare paths so they can
//! be piped.

use std::path::Path;

use owo_colors::{OwoColorize, Stream};

use crate::logging::{is_quiet, is_verbose};
use crate::report::{FileAction, FileReport, ProcessingSummary};

/// Symbols used in output
pub mod symbols {
  /// Success
  pub const SUCCESS: &str = "\u{2713}"; // ✓
  /// Failure
  pub const FAILURE: &str = "\u{2717}"; // ✗
  /// Header replaced
  pub const REPLACED: &str = "\u{21bb}"; // ↻
  /// Header prepended
  pub const ADDED: &str = "+";
}

/// Maximum number of files to show in the default output before truncating
const DEFAULT_FILE_LIST_LIMIT: usize = 20;

/// Print the initial "Rewriting headers under ROOT..." message.
pub fn print_start_message(root: &Path, dry_run: bool) {
  if is_quiet() {
    return;
  }

  let verb = if dry_run { "Checking" } else { "Rewriting" };
  println!("{} headers under {}...", verb, root.display());
}

/// Print a blank line for visual separation (respects quiet mode).
pub fn print_blank_line() {
  if !is_quiet() {
    println!();
  }
}

/// Reports grouped by outcome, in walk order.
#[derive(Default)]
pub struct CategorizedReports<'a> {
  pub replaced: Vec<&'a FileReport>,
  pub prepended: Vec<&'a FileReport>,
  pub unchanged: Vec<&'a FileReport>,
  pub ignored: Vec<&'a FileReport>,
  pub failed: Vec<&'a FileReport>,
}

impl<'a> CategorizedReports<'a> {
  pub fn from_reports(reports: &'a [FileReport]) -> Self {
    let mut categorized = Self::default();
    for report in reports {
      let bucket = match report.action {
        FileAction::Replaced => &mut categorized.replaced,
        FileAction::Prepended => &mut categorized.prepended,
        FileAction::Unchanged => &mut categorized.unchanged,
        FileAction::Ignored => &mut categorized.ignored,
        FileAction::Failed => &mut categorized.failed,
      };
      bucket.push(report);
    }
    categorized
  }

  pub fn has_changes(&self) -> bool {
    !self.replaced.is_empty() || !self.prepended.is_empty()
  }
}

/// Print a titled list of files, truncated unless verbose.
///
/// In quiet mode only the bare paths are printed.
pub fn print_file_list(title: &str, symbol: &str, files: &[&FileReport], root: Option<&Path>) {
  if files.is_empty() {
    return;
  }

  if is_quiet() {
    for file in files {
      println!("{}", make_relative_path(&file.path, root));
    }
    return;
  }

  let count = files.len();
  println!(
    "{} {} {} {}:",
    symbol.if_supports_color(Stream::Stdout, |s| s.green()),
    title,
    count,
    if count == 1 { "file" } else { "files" }
  );

  let show_all = is_verbose();
  let limit = if show_all { count } else { DEFAULT_FILE_LIST_LIMIT };

  for file in files.iter().take(limit) {
    let display_path = make_relative_path(&file.path, root);
    match file.detail {
      Some(ref detail) if file.action == FileAction::Failed => println!("  {display_path}: {detail}"),
      _ => println!("  {display_path}"),
    }
  }

  if count > limit {
    println!(
      "  {} (use -v to see all)",
      format!("... and {} more", count - limit).if_supports_color(Stream::Stdout, |s| s.dimmed())
    );
  }
}

/// Print the per-category file lists for a run.
pub fn print_changes(categorized: &CategorizedReports<'_>, root: Option<&Path>, dry_run: bool) {
  let (replaced_title, prepended_title) = if dry_run {
    ("Would replace header in", "Would add header to")
  } else {
    ("Replaced header in", "Added header to")
  };

  print_file_list(replaced_title, symbols::REPLACED, &categorized.replaced, root);
  if !categorized.replaced.is_empty() && !categorized.prepended.is_empty() {
    print_blank_line();
  }
  print_file_list(prepended_title, symbols::ADDED, &categorized.prepended, root);

  if !categorized.failed.is_empty() {
    print_blank_line();
    print_file_list("Failed to process", symbols::FAILURE, &categorized.failed, root);
  }

  if !categorized.has_changes() && categorized.failed.is_empty() && !is_quiet() {
    println!(
      "{} All files already carry the header.",
      symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green())
    );
  }
}

/// Print the processing summary.
///
/// Format: "Summary: X replaced, Y added, Z unchanged, W ignored"
/// In verbose mode, also shows timing.
pub fn print_summary(summary: &ProcessingSummary) {
  if is_quiet() {
    return;
  }

  let mut line = format!(
    "Summary: {} replaced, {} added, {} unchanged, {} ignored",
    summary.replaced.if_supports_color(Stream::Stdout, |s| s.cyan()),
    summary.prepended.if_supports_color(Stream::Stdout, |s| s.cyan()),
    summary.unchanged.if_supports_color(Stream::Stdout, |s| s.cyan()),
    summary.ignored.if_supports_color(Stream::Stdout, |s| s.dimmed()),
  );

  if summary.failed > 0 {
    line.push_str(&format!(
      ", {} failed",
      summary.failed.if_supports_color(Stream::Stdout, |s| s.red())
    ));
  }

  if is_verbose() {
    line.push_str(&format!(" ({:.2}s)", summary.processing_time.as_secs_f64()));
  }

  println!("{line}");
}

/// Print a hint for the user about what to do next.
pub fn print_hint(message: &str) {
  if is_quiet() {
    return;
  }

  println!("{}", message.if_supports_color(Stream::Stdout, |s| s.yellow()));
}

/// Make a path relative to the root for display.
fn make_relative_path(path: &Path, root: Option<&Path>) -> String {
  let Some(root) = root else {
    return path.to_string_lossy().to_string();
  };

  if let Ok(stripped) = path.strip_prefix(root) {
    return stripped.to_string_lossy().to_string();
  }

  match pathdiff::diff_paths(path, root) {
    Some(rel) if path.is_absolute() == root.is_absolute() => rel.to_string_lossy().to_string(),
    _ => path.to_string_lossy().to_string(),
  }
}
