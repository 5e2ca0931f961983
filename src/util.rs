// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Utilities for lenient date parsing, hour rounding, "today" resolution and man page rendering
// role: utilities/helpers
// inputs: Raw timestamp strings; minute totals; clap CommandFactory
// outputs: Calendar dates, rounded hours, man page text
// side_effects: parse_date_string logs a warning for unparsable input
// invariants:
// - ceil_hours returns None for zero/negative minutes, ceil(m/60) otherwise
// - parse_date_string keeps the calendar date as written (no timezone conversion)
// errors: None surfaced from parsing; render_man_page bubbles IO errors
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use clap::CommandFactory;
use tracing::warn;

const DATE_TIME_FORMATS: &[&str] = &[
  "%Y-%m-%dT%H:%M:%S%.f",
  "%Y-%m-%d %H:%M:%S%.f",
  "%Y-%m-%dT%H:%M",
  "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y", "%Y/%m/%d"];

fn parse_date_quiet(raw: &str) -> Option<NaiveDate> {
  let s = raw.trim();

  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Some(dt.date_naive());
  }

  if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z") {
    return Some(dt.date_naive());
  }

  for fmt in DATE_TIME_FORMATS {
    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
      return Some(ndt.date());
    }
  }

  DATE_FORMATS
    .iter()
    .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Parse an API timestamp or date into a calendar date.
///
/// Missing or empty input yields `None` silently; anything else that fails to
/// parse is logged and also yields `None`.
pub fn parse_date_string(raw: Option<&str>) -> Option<NaiveDate> {
  let s = raw?.trim();

  if s.is_empty() {
    return None;
  }

  let parsed = parse_date_quiet(s);

  if parsed.is_none() {
    warn!(value = s, "could not parse date");
  }

  parsed
}

/// Round minutes up to whole hours; `None` when there is nothing to report.
pub fn ceil_hours(minutes: i64) -> Option<i64> {
  if minutes > 0 {
    Some(minutes / 60 + i64::from(minutes % 60 != 0))
  } else {
    None
  }
}

/// Returns the effective reference date given an optional override.
pub fn effective_today(override_today: Option<NaiveDate>) -> NaiveDate {
  override_today.unwrap_or_else(|| Local::now().date_naive())
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
/// Returns the troff content as a UTF-8 string.
pub fn render_man_page<T: CommandFactory>() -> anyhow::Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}
