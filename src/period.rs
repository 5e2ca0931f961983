// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Compute the two biweekly reporting periods (6th-20th, 21st-5th) anchored on a reference date
// role: periods/calendar
// inputs: Reference NaiveDate (today or --today override)
// outputs: Two closed ReportingPeriod intervals plus header labels
// invariants:
// - day-of-month <= 5 anchors on the previous month; otherwise on the reference month
// - period 1 ends the day before period 2 starts; period 2 ends on day 5 of the following month
// - year boundaries roll over (December -> January)
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{Datelike, NaiveDate};

const PERIOD1_START_DAY: u32 = 6;
const PERIOD1_END_DAY: u32 = 20;
const PERIOD2_START_DAY: u32 = 21;
const PERIOD2_END_DAY: u32 = 5;

/// A closed date interval `[start, end]`.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct ReportingPeriod {
  pub start: NaiveDate,
  pub end: NaiveDate,
}

impl ReportingPeriod {
  pub fn contains(&self, date: NaiveDate) -> bool {
    self.start <= date && date <= self.end
  }

  /// `dd.mm - dd.mm`, used in the tracked-time column headers.
  pub fn label(&self) -> String {
    format!("{} - {}", self.start.format("%d.%m"), self.end.format("%d.%m"))
  }
}

fn previous_month(year: i32, month: u32) -> (i32, u32) {
  if month == 1 { (year - 1, 12) } else { (year, month - 1) }
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
  if month == 12 { (year + 1, 1) } else { (year, month + 1) }
}

fn day_in(year: i32, month: u32, day: u32) -> NaiveDate {
  // Only days 5..=21 are ever requested; every month has them.
  NaiveDate::from_ymd_opt(year, month, day).expect("day exists in every month")
}

/// Year and month the report is anchored on.
pub fn base_month(reference: NaiveDate) -> (i32, u32) {
  if reference.day() > PERIOD2_END_DAY {
    (reference.year(), reference.month())
  } else {
    previous_month(reference.year(), reference.month())
  }
}

/// Compute (period 1, period 2) for a reference date.
pub fn reporting_periods(reference: NaiveDate) -> (ReportingPeriod, ReportingPeriod) {
  let (y, m) = base_month(reference);
  let (ny, nm) = next_month(y, m);

  let first = ReportingPeriod {
    start: day_in(y, m, PERIOD1_START_DAY),
    end: day_in(y, m, PERIOD1_END_DAY),
  };
  let second = ReportingPeriod {
    start: day_in(y, m, PERIOD2_START_DAY),
    end: day_in(ny, nm, PERIOD2_END_DAY),
  };

  (first, second)
}
