// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Define the typed domain model (tasks, workloads, lookup maps, report rows) shared by fetch, aggregation and sheet rendering
// role: model/types
// outputs: Plain structs/enums; ReportRow renders to sheet cell values
// invariants:
// - Raw API identifiers keep their original shape until normalized (RawId)
// - ReportRow column order is fixed and matches REPORT_COLUMN_COUNT
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

/// An identifier or code as the WEEEK API sends it: sometimes a number, sometimes a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RawId {
  Int(i64),
  Text(String),
}

impl RawId {
  /// Digit-only text becomes `Int`; everything else is returned unchanged.
  pub fn normalized(&self) -> RawId {
    match self {
      RawId::Text(s) if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) => match s.parse::<i64>() {
        Ok(n) => RawId::Int(n),
        Err(_) => self.clone(),
      },
      other => other.clone(),
    }
  }

  pub fn as_int(&self) -> Option<i64> {
    match self {
      RawId::Int(n) => Some(*n),
      RawId::Text(_) => None,
    }
  }
}

impl fmt::Display for RawId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RawId::Int(n) => write!(f, "{n}"),
      RawId::Text(s) => f.write_str(s),
    }
  }
}

/// One logged time entry against a task.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workload {
  pub date: Option<String>,
  pub minutes: i64,
  pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Task {
  pub id: Option<RawId>,
  pub title: String,
  pub priority: Option<RawId>,
  pub user_id: Option<String>,
  pub board_id: Option<RawId>,
  pub board_column_id: Option<RawId>,
  pub created_at: Option<String>,
  pub is_completed: bool,
  pub updated_at: Option<String>,
  /// Estimated duration in minutes.
  pub duration: Option<i64>,
  pub workloads: Vec<Workload>,
  /// Alternate time entry list; only consulted for the completion date when `workloads` is empty.
  pub time_entries: Vec<Workload>,
}

/// member id -> display name
pub type MemberMap = HashMap<String, String>;

/// (board id, column id) -> column name
pub type BoardColumnMap = HashMap<(i64, i64), String>;

pub const REPORT_COLUMN_COUNT: usize = 13;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportRow {
  pub task: String,
  pub priority: String,
  pub executor: String,
  pub status: String,
  pub created: Option<NaiveDate>,
  pub completed: Option<NaiveDate>,
  pub estimate_hours: Option<i64>,
  pub period1_hours: Option<i64>,
  pub period1_comments: String,
  pub period2_hours: Option<i64>,
  pub period2_comments: String,
}

/// A single value as written into the sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
  Text(String),
  Number(i64),
}

impl CellValue {
  pub fn blank() -> Self {
    CellValue::Text(String::new())
  }

  pub fn is_number(&self) -> bool {
    matches!(self, CellValue::Number(_))
  }
}

fn date_cell(d: Option<NaiveDate>) -> CellValue {
  d.map(|d| CellValue::Text(d.format("%Y-%m-%d").to_string()))
    .unwrap_or_else(CellValue::blank)
}

fn hours_cell(h: Option<i64>) -> CellValue {
  h.map(CellValue::Number).unwrap_or_else(CellValue::blank)
}

impl ReportRow {
  /// Render in sheet column order; hourly rate and salary are left blank for the writer.
  pub fn to_cells(&self) -> Vec<CellValue> {
    vec![
      CellValue::Text(self.task.clone()),
      CellValue::Text(self.priority.clone()),
      CellValue::Text(self.executor.clone()),
      CellValue::Text(self.status.clone()),
      date_cell(self.created),
      date_cell(self.completed),
      hours_cell(self.estimate_hours),
      hours_cell(self.period1_hours),
      CellValue::Text(self.period1_comments.clone()),
      hours_cell(self.period2_hours),
      CellValue::Text(self.period2_comments.clone()),
      CellValue::blank(),
      CellValue::blank(),
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn raw_id_normalizes_digit_strings_only() {
    assert_eq!(RawId::Text("42".into()).normalized(), RawId::Int(42));
    assert_eq!(RawId::Text("4a".into()).normalized(), RawId::Text("4a".into()));
    assert_eq!(RawId::Text(String::new()).normalized(), RawId::Text(String::new()));
    assert_eq!(RawId::Int(7).normalized(), RawId::Int(7));
  }

  #[test]
  fn raw_id_displays_its_original_text() {
    assert_eq!(RawId::Int(5).to_string(), "5");
    assert_eq!(RawId::Text("abc".into()).to_string(), "abc");
  }

  #[test]
  fn empty_row_renders_thirteen_blank_or_text_cells() {
    let cells = ReportRow::default().to_cells();
    assert_eq!(cells.len(), REPORT_COLUMN_COUNT);
    assert!(cells.iter().all(|c| !c.is_number()));
  }

  #[test]
  fn row_cells_snapshot() {
    let row = ReportRow {
      task: "Fix login (17)".into(),
      priority: "High".into(),
      executor: "Anna".into(),
      status: "In progress".into(),
      created: NaiveDate::from_ymd_opt(2024, 2, 1),
      completed: None,
      estimate_hours: Some(3),
      period1_hours: Some(2),
      period1_comments: "1. a".into(),
      period2_hours: None,
      period2_comments: String::new(),
    };

    insta::assert_json_snapshot!(row.to_cells(), @r###"
    [
      "Fix login (17)",
      "High",
      "Anna",
      "In progress",
      "2024-02-01",
      "",
      3,
      2,
      "1. a",
      "",
      "",
      "",
      ""
    ]
    "###);
  }
}
