use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

use crate::config::ConfigOverrides;
use crate::util;

#[derive(Parser, Debug)]
#[command(
    name = "weeek-report",
    version,
    about = "Summarise WEEEK task time tracking for two biweekly periods into a Google Sheet",
    long_about = None
)]
pub struct Cli {
  /// Reference date, YYYY-MM-DD (default: today). Periods are derived from it.
  #[arg(long, value_parser = parse_reference_date)]
  pub today: Option<NaiveDate>,

  /// Worksheet to replace (default: WEEEK_REPORT_SHEET_NAME or "WEEEK report")
  #[arg(long)]
  pub sheet_name: Option<String>,

  /// Dotenv file to load before reading the environment (default: ./.env)
  #[arg(long)]
  pub env_file: Option<PathBuf>,

  /// Do not touch Google Sheets; emit the planned sheet contents as JSON
  #[arg(long)]
  pub preview: bool,

  /// Preview output: file path, or "-" for stdout (requires --preview)
  #[arg(long)]
  pub out: Option<String>,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,
}

fn parse_reference_date(raw: &str) -> Result<NaiveDate, String> {
  NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

#[derive(Debug, Clone)]
pub struct EffectiveConfig {
  pub today: NaiveDate,
  pub overrides: ConfigOverrides,
  /// `Some(target)` in preview mode.
  pub preview_out: Option<String>,
}

pub fn normalize(cli: Cli) -> Result<EffectiveConfig> {
  if cli.out.is_some() && !cli.preview {
    bail!("--out only applies to --preview runs");
  }

  let preview_out = cli.preview.then(|| cli.out.clone().unwrap_or_else(|| "-".to_string()));

  Ok(EffectiveConfig {
    today: util::effective_today(cli.today),
    overrides: ConfigOverrides {
      env_file: cli.env_file,
      sheet_name: cli.sheet_name,
      preview: cli.preview,
    },
    preview_out,
  })
}
