//! # CLI Module
//!
//! The command-line interface, built on clap's derive API.

mod apply;

pub use apply::{ApplyArgs, run_apply};
use clap::Parser;
use clap::builder::styling::{AnsiColor, Color, Style, Styles};

const CUSTOM_STYLES: Styles = Styles::styled()
  .header(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .usage(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Blue))).bold())
  .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan))))
  .error(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red))).bold())
  .valid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))))
  .invalid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow))));

/// Top-level CLI arguments
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  about,
  styles = CUSTOM_STYLES,
  after_help = "Examples:
  # Apply the header in HEADER.txt to every file under src/
  reheader --header-file HEADER.txt src/

  # Preview the changes as a diff without touching any file
  reheader --header-file HEADER.txt --dry-run --show-diff src/

  # Fail (exit 1) if any file would change, e.g. in CI
  reheader --header-file HEADER.txt --check src/

  # Skip generated and data files by path suffix
  reheader --header-file HEADER.txt --ignore .pb.go --ignore .json src/

  # Reproduce the fixed nine-line header window
  reheader --header-file HEADER.txt --window 9 src/
",
  help_template = "{before-help}{name} v{version}
{about-section}
{usage-heading} {usage}

{all-args}{after-help}
"
)]
pub struct Cli {
  #[command(flatten)]
  pub apply_args: ApplyArgs,
}

impl Cli {
  /// Parse CLI arguments and return the Cli struct
  pub fn parse_args() -> Self {
    Self::parse()
  }
}
