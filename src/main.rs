//! # reheader
//!
//! Rewrites a copyright/license header onto every file under a directory.

use anyhow::Result;
use reheader::cli::{Cli, run_apply};

fn main() -> Result<()> {
  let cli = Cli::parse_args();
  run_apply(cli.apply_args)
}
