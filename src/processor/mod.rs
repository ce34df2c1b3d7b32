//! # Processor Module
//!
//! The header rewriter: walks a root directory and makes every file that is
//! not ignored start with the header text.
//!
//! The module is organized into several submodules:
//! - [`file_io`] - Reading files and writing them back, atomically or in place
//! - [`content_transformer`] - Header detection and content composition
//! - [`file_collector`] - Directory traversal
//!
//! The [`Processor`] struct drives a run. [`apply_header`] is the short form
//! with the fixed nine-line header window.

mod content_transformer;
mod file_collector;
mod file_io;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
pub use content_transformer::{ContentTransformer, MIN_LINES_FOR_REPLACEMENT, Rewrite, split_lines};
pub use file_collector::{FileCollector, WalkEntry};
pub use file_io::{FileIO, WriteMode};
use tracing::{debug, error, trace};

use crate::diff::DiffManager;
use crate::header::{HeaderText, HeaderWindow};
use crate::ignore::SuffixIgnore;
use crate::info_log;
use crate::report::{FileAction, FileReport};

/// Options for a rewrite run.
///
/// Use struct update syntax to override specific fields:
/// ```rust
/// use reheader::processor::RewriteOptions;
///
/// let options = RewriteOptions {
///   dry_run: true,
///   ..RewriteOptions::default()
/// };
/// assert!(!options.keep_going);
/// ```
#[derive(Debug, Default)]
pub struct RewriteOptions {
  /// Files whose path ends with any of these are left alone
  pub ignore: SuffixIgnore,
  /// How many lines an existing header block spans
  pub window: HeaderWindow,
  /// How rewritten files are written
  pub write_mode: WriteMode,
  /// Compute and report rewrites without writing anything
  pub dry_run: bool,
  /// Record per-file failures and continue instead of aborting
  pub keep_going: bool,
  /// Diff rendering for dry runs
  pub diff_manager: DiffManager,
}

/// Drives a header rewrite over a directory tree.
///
/// Processing is sequential: one file is read, transformed and written before
/// the next is opened.
pub struct Processor {
  header: HeaderText,
  ignore: SuffixIgnore,
  transformer: ContentTransformer,
  write_mode: WriteMode,
  dry_run: bool,
  keep_going: bool,
  diff_manager: DiffManager,
}

impl Processor {
  pub fn new(header: HeaderText, options: RewriteOptions) -> Self {
    Self {
      header,
      ignore: options.ignore,
      transformer: ContentTransformer::new(options.window),
      write_mode: options.write_mode,
      dry_run: options.dry_run,
      keep_going: options.keep_going,
      diff_manager: options.diff_manager,
    }
  }

  /// Rewrites every file under `root`.
  ///
  /// Symlinks to files are rewritten through to their target. Each target is
  /// rewritten at most once, however many links or paths lead to it.
  ///
  /// # Returns
  ///
  /// One report per file or symlink found, in walk order.
  ///
  /// # Errors
  ///
  /// Fails if `root` cannot be walked. Without `keep_going`, the first file
  /// that cannot be read or written aborts the run; files rewritten before it
  /// stay rewritten. A dangling symlink counts as a file that cannot be read.
  /// With `keep_going`, failures are recorded as [`FileAction::Failed`]
  /// instead.
  pub fn process(&self, root: &Path) -> Result<Vec<FileReport>> {
    let entries = FileCollector::new(root).collect()?;
    debug!(
      "Processing {} entries under {} (window: {}, mode: {:?}, dry run: {})",
      entries.len(),
      root.display(),
      self.transformer.window(),
      self.write_mode,
      self.dry_run
    );

    let mut visited = HashSet::new();
    let mut reports = Vec::with_capacity(entries.len());
    for entry in entries {
      match self.visit(&entry, &mut visited) {
        Ok(report) => reports.push(report),
        Err(e) if self.keep_going => {
          error!("Error processing {}: {:#}", entry.path().display(), e);
          reports.push(FileReport::new(entry.path(), FileAction::Failed).with_detail(format!("{e:#}")));
        }
        Err(e) => return Err(e),
      }
    }

    Ok(reports)
  }

  /// Applies the header to a single file, honoring the ignore list.
  ///
  /// A symlink is resolved and its target rewritten; the link itself stays.
  pub fn process_file(&self, path: &Path) -> Result<FileReport> {
    let metadata = fs::symlink_metadata(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    let entry = if metadata.file_type().is_symlink() {
      WalkEntry::Symlink(path.to_path_buf())
    } else {
      WalkEntry::File(path.to_path_buf())
    };
    self.visit(&entry, &mut HashSet::new())
  }

  fn visit(&self, entry: &WalkEntry, visited: &mut HashSet<PathBuf>) -> Result<FileReport> {
    let path = entry.path();
    if let Some(suffix) = self.ignore.matching_suffix(path) {
      trace!("Skipping: {} (ignored suffix {:?})", path.display(), suffix);
      return Ok(FileReport::new(path, FileAction::Ignored).with_detail(suffix));
    }

    let target = fs::canonicalize(path).with_context(|| match entry {
      WalkEntry::Symlink(_) => format!("Failed to resolve symlink: {}", path.display()),
      WalkEntry::File(_) => format!("Failed to read file: {}", path.display()),
    })?;

    if matches!(entry, WalkEntry::Symlink(_)) && target.is_dir() {
      trace!("Skipping: {} (symlink to directory)", path.display());
      return Ok(FileReport::new(path, FileAction::Ignored).with_detail("symlink to directory"));
    }

    if !visited.insert(target.clone()) {
      trace!("Skipping: {} (already visited as {})", path.display(), target.display());
      return Ok(FileReport::new(path, FileAction::Ignored).with_detail(format!("same file as {}", target.display())));
    }

    match entry {
      WalkEntry::Symlink(_) => self.rewrite(path, &target),
      WalkEntry::File(_) => self.rewrite(path, path),
    }
  }

  /// Rewrites `target`, reporting it under `path`.
  fn rewrite(&self, path: &Path, target: &Path) -> Result<FileReport> {
    let content = FileIO::read_full_content(target)?;
    let (rewrite, new_content) = self.transformer.rewrite(&self.header, &content);

    if new_content == content {
      trace!("Unchanged: {}", path.display());
      return Ok(FileReport::new(path, FileAction::Unchanged));
    }

    let action = match rewrite {
      Rewrite::Replaced { skipped_lines } => {
        trace!("Replacing {} header lines in {}", skipped_lines, path.display());
        FileAction::Replaced
      }
      Rewrite::Prepended => FileAction::Prepended,
    };

    if self.dry_run {
      self.diff_manager.display_diff(path, &content, &new_content)?;
      return Ok(FileReport::new(path, action));
    }

    FileIO::write_file(target, &new_content, self.write_mode)?;
    match action {
      FileAction::Replaced => info_log!("Replaced header in: {}", path.display()),
      _ => info_log!("Added header to: {}", path.display()),
    }

    Ok(FileReport::new(path, action))
  }
}

/// Applies `header_text` to every file under `root_path` whose path does not
/// end with one of `ignored_suffixes`.
///
/// A file recognized as carrying a header loses its first nine lines,
/// whatever the length of `header_text`. Writes are atomic and the first
/// failure aborts the run.
///
/// ```rust,no_run
/// let header = "/*\n * Copyright (c) 2023 OpenMonero\n * All Rights Reserved.\n */\n";
/// reheader::processor::apply_header("../src".as_ref(), header, &[".json".to_string()])?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn apply_header(root_path: &Path, header_text: &str, ignored_suffixes: &[String]) -> Result<()> {
  let options = RewriteOptions {
    ignore: SuffixIgnore::new(ignored_suffixes.to_vec()),
    window: HeaderWindow::LEGACY,
    ..RewriteOptions::default()
  };
  let processor = Processor::new(HeaderText::new(header_text), options);
  let reports = processor.process(root_path)?;

  let failed = reports.iter().filter(|r| r.action == FileAction::Failed).count();
  if failed > 0 {
    bail!("Failed to rewrite {} file(s)", failed);
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use std::fs;

  use tempfile::TempDir;

  use super::*;

  const HEADER: &str = "/*\n * Copyright\n * Test\n */\n";

  fn processor(options: RewriteOptions) -> Processor {
    Processor::new(HeaderText::new(HEADER), options)
  }

  #[test]
  fn test_process_file_prepends() {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("a.txt");
    fs::write(&path, "hello\n").expect("write");

    let report = processor(RewriteOptions::default()).process_file(&path).expect("process");

    assert_eq!(report.action, FileAction::Prepended);
    assert_eq!(fs::read_to_string(&path).expect("read"), format!("{HEADER}\nhello\n"));
  }

  #[test]
  fn test_process_file_ignored_is_untouched() {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("data.json");
    fs::write(&path, "{}").expect("write");

    let options = RewriteOptions {
      ignore: SuffixIgnore::new(vec![".json".to_string()]),
      ..RewriteOptions::default()
    };
    let report = processor(options).process_file(&path).expect("process");

    assert_eq!(report.action, FileAction::Ignored);
    assert_eq!(report.detail.as_deref(), Some(".json"));
    assert_eq!(fs::read_to_string(&path).expect("read"), "{}");
  }

  #[test]
  fn test_process_file_unchanged_when_header_present() {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("a.go");
    let content = format!("{HEADER}package main\n");
    fs::write(&path, &content).expect("write");

    let report = processor(RewriteOptions::default()).process_file(&path).expect("process");

    assert_eq!(report.action, FileAction::Unchanged);
    assert_eq!(fs::read_to_string(&path).expect("read"), content);
  }

  #[test]
  fn test_dry_run_reports_without_writing() {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("a.txt");
    fs::write(&path, "hello\n").expect("write");

    let options = RewriteOptions {
      dry_run: true,
      ..RewriteOptions::default()
    };
    let reports = processor(options).process(dir.path()).expect("process");

    assert_eq!(reports, vec![FileReport::new(&path, FileAction::Prepended)]);
    assert_eq!(fs::read_to_string(&path).expect("read"), "hello\n");
  }

  #[test]
  fn test_keep_going_records_failures() {
    let dir = TempDir::new().expect("create temp dir");
    fs::write(dir.path().join("a.bin"), [0xFF, 0xFE]).expect("write");
    fs::write(dir.path().join("b.txt"), "b\n").expect("write");

    let options = RewriteOptions {
      keep_going: true,
      ..RewriteOptions::default()
    };
    let reports = processor(options).process(dir.path()).expect("process");

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].action, FileAction::Failed);
    assert_eq!(reports[1].action, FileAction::Prepended);
  }

  #[test]
  fn test_fail_fast_aborts_on_first_error() {
    let dir = TempDir::new().expect("create temp dir");
    fs::write(dir.path().join("a.bin"), [0xFF, 0xFE]).expect("write");
    fs::write(dir.path().join("b.txt"), "b\n").expect("write");

    let result = processor(RewriteOptions::default()).process(dir.path());

    assert!(result.is_err());
    assert_eq!(fs::read_to_string(dir.path().join("b.txt")).expect("read"), "b\n");
  }

  #[cfg(unix)]
  #[test]
  fn test_dangling_symlink_is_a_read_error() {
    let dir = TempDir::new().expect("create temp dir");
    std::os::unix::fs::symlink(dir.path().join("gone.go"), dir.path().join("link.go")).expect("symlink");

    let err = processor(RewriteOptions::default())
      .process(dir.path())
      .expect_err("dangling link should abort");
    assert!(format!("{err:#}").contains("link.go"));
  }

  #[cfg(unix)]
  #[test]
  fn test_symlink_to_directory_is_ignored() {
    let dir = TempDir::new().expect("create temp dir");
    fs::create_dir(dir.path().join("real")).expect("mkdir");
    fs::write(dir.path().join("real/a.go"), "package a\n").expect("write");
    std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("alias")).expect("symlink");

    let reports = processor(RewriteOptions::default()).process(dir.path()).expect("process");

    assert_eq!(reports[0].action, FileAction::Ignored);
    assert_eq!(reports[0].detail.as_deref(), Some("symlink to directory"));
    assert_eq!(reports[1].action, FileAction::Prepended);
  }

  #[cfg(unix)]
  #[test]
  fn test_process_file_writes_through_symlink() {
    let dir = TempDir::new().expect("create temp dir");
    let target = dir.path().join("target.go");
    let link = dir.path().join("link.go");
    fs::write(&target, "package t\n").expect("write");
    std::os::unix::fs::symlink(&target, &link).expect("symlink");

    let report = processor(RewriteOptions::default()).process_file(&link).expect("process");

    assert_eq!(report, FileReport::new(&link, FileAction::Prepended));
    assert!(fs::symlink_metadata(&link).expect("lstat").file_type().is_symlink());
    assert_eq!(fs::read_to_string(&target).expect("read"), format!("{HEADER}\npackage t\n"));
  }
}
