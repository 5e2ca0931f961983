// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Turn typed tasks plus lookup maps into report rows with per-period tracked hours and comment rollups
// role: aggregation/core
// inputs: &[Task], MemberMap, BoardColumnMap, two ReportingPeriods
// outputs: Vec<ReportRow>, one per task, in task order
// side_effects: Logs unparsable dates (via util::parse_date_string); no IO
// invariants:
// - Each task is processed independently; a malformed field only blanks that field
// - Workload minutes count toward each period whose closed interval contains the date (independently)
// - Hours are ceil(minutes / 60) or absent; comment lists are numbered in encounter order
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::NaiveDate;

use crate::model::{BoardColumnMap, MemberMap, RawId, ReportRow, Task, Workload};
use crate::period::ReportingPeriod;
use crate::util::{ceil_hours, parse_date_string};

pub const PRIORITY_LOW: &str = "Low";
pub const PRIORITY_MEDIUM: &str = "Medium";
pub const PRIORITY_HIGH: &str = "High";
pub const PRIORITY_FROZEN: &str = "Frozen";

fn priority_name(code: i64) -> Option<&'static str> {
  match code {
    0 => Some(PRIORITY_LOW),
    1 => Some(PRIORITY_MEDIUM),
    2 => Some(PRIORITY_HIGH),
    3 => Some(PRIORITY_FROZEN),
    _ => None,
  }
}

pub fn priority_label(priority: Option<&RawId>) -> String {
  match priority {
    None => String::new(),
    Some(RawId::Int(code)) => priority_name(*code).map(str::to_string).unwrap_or_else(|| code.to_string()),
    Some(other) => other.to_string(),
  }
}

pub fn executor_label(user_id: Option<&str>, members: &MemberMap) -> String {
  match user_id {
    Some(id) => members.get(id).cloned().unwrap_or_else(|| id.to_string()),
    None => String::new(),
  }
}

pub fn status_label(board_id: Option<&RawId>, column_id: Option<&RawId>, columns: &BoardColumnMap) -> String {
  let board = board_id.map(RawId::normalized);
  let Some(column) = column_id.map(RawId::normalized) else {
    return String::new();
  };

  match (board.as_ref().and_then(RawId::as_int), column.as_int()) {
    (Some(b), Some(c)) => columns.get(&(b, c)).cloned().unwrap_or_else(|| c.to_string()),
    _ => column.to_string(),
  }
}

/// Latest workload date when completed; otherwise the last update; otherwise nothing.
pub fn completion_date(task: &Task) -> Option<NaiveDate> {
  if !task.is_completed {
    return None;
  }

  let entries: &[Workload] = if task.workloads.is_empty() { &task.time_entries } else { &task.workloads };

  let latest = entries
    .iter()
    .filter_map(|w| parse_date_string(w.date.as_deref()))
    .max();

  latest.or_else(|| parse_date_string(task.updated_at.as_deref()))
}

/// Minutes and comments collected for one reporting period.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PeriodTally {
  pub minutes: i64,
  pub comments: Vec<String>,
}

impl PeriodTally {
  fn add(&mut self, workload: &Workload) {
    self.minutes = self.minutes.saturating_add(workload.minutes);

    if let Some(c) = workload.comment.as_deref().filter(|c| !c.is_empty()) {
      self.comments.push(c.to_string());
    }
  }

  pub fn hours(&self) -> Option<i64> {
    ceil_hours(self.minutes)
  }

  /// "1. first\n2. second", or empty when there are no comments.
  pub fn numbered_comments(&self) -> String {
    self
      .comments
      .iter()
      .enumerate()
      .map(|(i, c)| format!("{}. {}", i + 1, c))
      .collect::<Vec<_>>()
      .join("\n")
  }
}

pub fn tally_periods(workloads: &[Workload], first: &ReportingPeriod, second: &ReportingPeriod) -> (PeriodTally, PeriodTally) {
  let mut p1 = PeriodTally::default();
  let mut p2 = PeriodTally::default();

  for workload in workloads.iter().filter(|w| w.minutes > 0) {
    let Some(date) = parse_date_string(workload.date.as_deref()) else {
      continue;
    };

    if first.contains(date) {
      p1.add(workload);
    }
    if second.contains(date) {
      p2.add(workload);
    }
  }

  (p1, p2)
}

fn task_label(task: &Task) -> String {
  let id = task.id.as_ref().map(RawId::to_string).unwrap_or_default();
  format!("{} ({})", task.title, id)
}

pub fn build_row(
  task: &Task,
  members: &MemberMap,
  columns: &BoardColumnMap,
  first: &ReportingPeriod,
  second: &ReportingPeriod,
) -> ReportRow {
  let (p1, p2) = tally_periods(&task.workloads, first, second);

  ReportRow {
    task: task_label(task),
    priority: priority_label(task.priority.as_ref()),
    executor: executor_label(task.user_id.as_deref(), members),
    status: status_label(task.board_id.as_ref(), task.board_column_id.as_ref(), columns),
    created: parse_date_string(task.created_at.as_deref()),
    completed: completion_date(task),
    estimate_hours: task.duration.and_then(ceil_hours),
    period1_hours: p1.hours(),
    period1_comments: p1.numbered_comments(),
    period2_hours: p2.hours(),
    period2_comments: p2.numbered_comments(),
  }
}

/// One row per task, in task order.
pub fn build_rows(
  tasks: &[Task],
  members: &MemberMap,
  columns: &BoardColumnMap,
  first: &ReportingPeriod,
  second: &ReportingPeriod,
) -> Vec<ReportRow> {
  tasks
    .iter()
    .map(|t| build_row(t, members, columns, first, second))
    .collect()
}
