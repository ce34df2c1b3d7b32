//! # Apply Command
//!
//! Resolves the run configuration from flags and the config file, then drives
//! the header rewriter and prints the results.

use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use chrono::Datelike;
use clap::Args;
use tracing::{debug, warn};

use crate::config::{Config, load_config};
use crate::diff::DiffManager;
use crate::header::{HeaderText, HeaderWindow};
use crate::ignore::SuffixIgnore;
use crate::info_log;
use crate::logging::{ColorMode, init_tracing, set_quiet, set_verbose};
use crate::output::{
  CategorizedReports, print_blank_line, print_changes, print_hint, print_start_message, print_summary,
};
use crate::processor::{Processor, RewriteOptions, WriteMode};
use crate::report::{FileReport, ProcessingSummary, write_json_report};

/// Arguments for applying a header
#[derive(Args, Debug)]
pub struct ApplyArgs {
  /// Directory to walk recursively [default: config `root`, then "."]
  #[arg(value_name = "ROOT")]
  pub root: Option<PathBuf>,

  /// File containing the header text
  #[arg(long, short = 'f', value_name = "FILE", conflicts_with = "header")]
  pub header_file: Option<PathBuf>,

  /// Header text given inline
  #[arg(long, value_name = "TEXT")]
  pub header: Option<String>,

  /// Leave files whose path ends with this suffix untouched (repeatable)
  #[arg(long, short = 'i', value_name = "SUFFIX")]
  pub ignore: Vec<String>,

  /// Lines treated as the existing header: "header-lines", "comment-end", or
  /// a fixed count [default: header-lines]
  #[arg(long, value_name = "WINDOW")]
  pub window: Option<HeaderWindow>,

  /// Overwrite files directly instead of writing a temporary file and
  /// renaming it into place
  #[arg(long)]
  pub in_place: bool,

  /// Report what would change without writing anything
  #[arg(long, short = 'n')]
  pub dry_run: bool,

  /// Like --dry-run, but exit with status 1 if any file would change
  #[arg(long)]
  pub check: bool,

  /// Print a diff of each pending change (dry run only)
  #[arg(long)]
  pub show_diff: bool,

  /// Append a diff of each pending change to FILE (dry run only)
  #[arg(long, short = 'o', value_name = "FILE")]
  pub save_diff: Option<PathBuf>,

  /// Record failures and continue with the remaining files
  #[arg(long)]
  pub keep_going: bool,

  /// Value for {{year}} placeholders in the header [default: current year]
  #[arg(long)]
  pub year: Option<String>,

  /// Write a JSON report of the run to FILE
  #[arg(long, value_name = "FILE")]
  pub report_json: Option<PathBuf>,

  /// Path to config file (default: .reheader.toml in the current directory)
  #[arg(long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Ignore config file even if present
  #[arg(long)]
  pub no_config: bool,

  /// Increase verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Suppress all output except errors
  #[arg(short, long, conflicts_with = "verbose")]
  pub quiet: bool,

  /// Control when to use colored output (auto, never, always)
  #[arg(
    long,
    value_name = "WHEN",
    num_args = 0..=1,
    default_value_t = ColorMode::Auto,
    default_missing_value = "always",
    value_enum
  )]
  pub colors: ColorMode,
}

/// Fully resolved settings for one run.
#[derive(Debug)]
struct RunSettings {
  root: PathBuf,
  header: HeaderText,
  options: RewriteOptions,
}

/// Merges flags over the config file over defaults.
fn resolve_settings(args: &ApplyArgs, config: Option<Config>) -> Result<RunSettings> {
  let config = config.unwrap_or_default();

  let header = match (&args.header_file, &args.header, &config.header_file, &config.header) {
    (Some(path), _, _, _) => HeaderText::from_file(path)?,
    (None, Some(text), _, _) => HeaderText::new(text.clone()),
    (None, None, Some(path), _) => HeaderText::from_file(path)?,
    (None, None, None, Some(text)) => HeaderText::new(text.clone()),
    (None, None, None, None) => {
      bail!("Missing header: pass --header-file or --header, or set header-file in the config file")
    }
  };

  let year = args
    .year
    .clone()
    .or_else(|| config.year.clone())
    .unwrap_or_else(|| chrono::Local::now().year().to_string());
  let header = header.render(&year);

  let root = args
    .root
    .clone()
    .or_else(|| config.root.clone())
    .unwrap_or_else(|| PathBuf::from("."));

  let mut ignore = SuffixIgnore::new(config.ignore.clone());
  ignore.extend(args.ignore.iter().cloned());

  let window = match args.window {
    Some(window) => window,
    None => config.header_window()?.unwrap_or_default(),
  };

  let write_mode = if args.in_place || config.atomic == Some(false) {
    WriteMode::InPlace
  } else {
    WriteMode::Atomic
  };

  let dry_run = args.dry_run || args.check;
  let diff_manager = if dry_run {
    DiffManager::new(args.show_diff, args.save_diff.clone())
  } else {
    if args.show_diff || args.save_diff.is_some() {
      warn!("--show-diff and --save-diff only apply to dry runs; ignoring");
    }
    DiffManager::default()
  };

  Ok(RunSettings {
    root,
    header,
    options: RewriteOptions {
      ignore,
      window,
      write_mode,
      dry_run,
      keep_going: args.keep_going,
      diff_manager,
    },
  })
}

/// Run the header rewrite with the given arguments
pub fn run_apply(args: ApplyArgs) -> Result<()> {
  init_tracing(args.quiet, args.verbose);

  if args.verbose > 0 {
    set_verbose();
  } else if args.quiet {
    set_quiet();
  }
  args.colors.apply();

  let current_dir = std::env::current_dir().context("Failed to get current directory")?;
  let config = load_config(args.config.as_deref(), &current_dir, args.no_config)?;
  if config.is_some() {
    debug!("Using configuration file");
  }

  let settings = resolve_settings(&args, config)?;
  debug!(
    "Header has {} lines; window: {}; ignored suffixes: {:?}",
    settings.header.line_count(),
    settings.options.window,
    settings.options.ignore.suffixes()
  );

  settings.options.diff_manager.init()?;

  let dry_run = settings.options.dry_run;
  let root = settings.root;
  let processor = Processor::new(settings.header, settings.options);

  print_start_message(&root, dry_run);

  let start_time = Instant::now();
  let reports = processor.process(&root)?;
  let summary = ProcessingSummary::from_reports(&reports, start_time.elapsed());
  let categorized = CategorizedReports::from_reports(&reports);

  print_blank_line();
  print_changes(&categorized, Some(&root), dry_run);
  print_blank_line();
  print_summary(&summary);

  if let Some(ref output_path) = args.report_json {
    write_report(output_path, &root, dry_run, &reports, &summary)?;
  }

  if summary.failed > 0 {
    bail!("Failed to process {} file(s)", summary.failed);
  }

  if args.check && summary.changed() > 0 {
    print_blank_line();
    print_hint("Run without --check to rewrite these headers.");
    process::exit(1);
  }

  Ok(())
}

fn write_report(
  output_path: &Path,
  root: &Path,
  dry_run: bool,
  reports: &[FileReport],
  summary: &ProcessingSummary,
) -> Result<()> {
  write_json_report(output_path, root, dry_run, reports, summary)?;
  info_log!("Generated JSON report at {}", output_path.display());
  Ok(())
}
