// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Pure sheet layout: headers, value matrix (with salary formulas) and the formatting batch requests
// role: sheets/layout
// inputs: Reporting periods, ReportRows, worksheet gid
// outputs: Vec<String> headers, Vec<Vec<Value>> values, Vec<Value> Sheets batchUpdate requests
// invariants:
// - Column order is fixed; indices below are the single source for formatting targets
// - Data rows start at sheet row 2 (A1 notation), row index 1 (grid ranges)
// - Priority colours only apply to known priority labels
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use serde_json::{json, Value};

use crate::aggregate::{PRIORITY_FROZEN, PRIORITY_HIGH, PRIORITY_LOW, PRIORITY_MEDIUM};
use crate::model::{CellValue, ReportRow, REPORT_COLUMN_COUNT};
use crate::period::ReportingPeriod;

pub const COL_TASK: usize = 0;
pub const COL_PRIORITY: usize = 1;
pub const COL_ESTIMATE: usize = 6;
pub const COL_PERIOD1_HOURS: usize = 7;
pub const COL_PERIOD1_COMMENTS: usize = 8;
pub const COL_PERIOD2_HOURS: usize = 9;
pub const COL_PERIOD2_COMMENTS: usize = 10;
pub const COL_RATE: usize = 11;
pub const COL_SALARY: usize = 12;

const FONT_FAMILY: &str = "Times New Roman";
const FONT_SIZE: u32 = 12;

const LEFT_ALIGNED: [usize; 3] = [COL_TASK, COL_PERIOD1_COMMENTS, COL_PERIOD2_COMMENTS];
const HOUR_COLUMNS: [usize; 3] = [COL_ESTIMATE, COL_PERIOD1_HOURS, COL_PERIOD2_HOURS];

/// Background colour (r, g, b) for a priority label.
pub fn priority_color(label: &str) -> Option<(f64, f64, f64)> {
  match label {
    PRIORITY_FROZEN => Some((0.36, 0.73, 1.0)),
    PRIORITY_HIGH => Some((1.0, 0.6, 0.0)),
    PRIORITY_MEDIUM => Some((1.0, 0.9, 0.4)),
    PRIORITY_LOW => Some((0.7, 0.85, 0.5)),
    _ => None,
  }
}

pub fn report_headers(first: &ReportingPeriod, second: &ReportingPeriod) -> Vec<String> {
  vec![
    "Task (ID)".to_string(),
    "Priority".to_string(),
    "Executor".to_string(),
    "Status".to_string(),
    "Start date".to_string(),
    "End date".to_string(),
    "Estimate".to_string(),
    format!("Tracked ({})", first.label()),
    "Comments".to_string(),
    format!("Tracked ({})", second.label()),
    "Comments".to_string(),
    "Hourly rate".to_string(),
    "Salary".to_string(),
  ]
}

/// Zero-based column index to A1 letters (0 -> A, 25 -> Z, 26 -> AA).
pub fn column_letter(index: usize) -> String {
  let mut n = index + 1;
  let mut letters = Vec::new();

  while n > 0 {
    let rem = (n - 1) % 26;
    letters.push((b'A' + rem as u8) as char);
    n = (n - 1) / 26;
  }

  letters.iter().rev().collect()
}

/// Salary formula for a 1-based sheet row: (tracked 1 + tracked 2) * hourly rate.
pub fn salary_formula(sheet_row: usize) -> String {
  format!(
    "=(N({p1}{r})+N({p2}{r}))*N({rate}{r})",
    p1 = column_letter(COL_PERIOD1_HOURS),
    p2 = column_letter(COL_PERIOD2_HOURS),
    rate = column_letter(COL_RATE),
    r = sheet_row
  )
}

fn cell_json(cell: &CellValue) -> Value {
  match cell {
    CellValue::Text(s) => Value::String(s.clone()),
    CellValue::Number(n) => json!(n),
  }
}

/// Header row plus one row per report row; the salary column carries its formula.
pub fn sheet_values(headers: &[String], rows: &[ReportRow]) -> Vec<Vec<Value>> {
  let mut out = Vec::with_capacity(rows.len() + 1);
  out.push(headers.iter().map(|h| Value::String(h.clone())).collect());

  for (i, row) in rows.iter().enumerate() {
    let mut values: Vec<Value> = row.to_cells().iter().map(cell_json).collect();

    if let Some(salary) = values.get_mut(COL_SALARY) {
      *salary = Value::String(salary_formula(i + 2));
    }

    out.push(values);
  }

  out
}

fn grid_range(sheet_id: i64, rows: (usize, usize), cols: (usize, usize)) -> Value {
  json!({
    "sheetId": sheet_id,
    "startRowIndex": rows.0,
    "endRowIndex": rows.1,
    "startColumnIndex": cols.0,
    "endColumnIndex": cols.1,
  })
}

fn repeat_cell(range: Value, format: Value, fields: &str) -> Value {
  json!({
    "repeatCell": {
      "range": range,
      "cell": { "userEnteredFormat": format },
      "fields": fields,
    }
  })
}

/// The formatting batch applied after the data write.
pub fn format_requests(sheet_id: i64, column_count: usize, rows: &[ReportRow]) -> Vec<Value> {
  let mut requests = Vec::new();
  let data_end = rows.len() + 1;

  requests.push(repeat_cell(
    grid_range(sheet_id, (0, 1), (0, column_count)),
    json!({
      "textFormat": { "bold": true, "fontFamily": FONT_FAMILY, "fontSize": FONT_SIZE },
      "horizontalAlignment": "CENTER",
      "verticalAlignment": "MIDDLE",
    }),
    "userEnteredFormat(textFormat,horizontalAlignment,verticalAlignment)",
  ));

  if !rows.is_empty() {
    requests.push(repeat_cell(
      grid_range(sheet_id, (1, data_end), (0, column_count)),
      json!({
        "textFormat": { "fontFamily": FONT_FAMILY, "fontSize": FONT_SIZE },
        "verticalAlignment": "MIDDLE",
        "wrapStrategy": "WRAP",
      }),
      "userEnteredFormat(textFormat,verticalAlignment,wrapStrategy)",
    ));

    for col in 0..column_count {
      let align = if LEFT_ALIGNED.contains(&col) { "LEFT" } else { "CENTER" };
      requests.push(repeat_cell(
        grid_range(sheet_id, (1, data_end), (col, col + 1)),
        json!({ "horizontalAlignment": align }),
        "userEnteredFormat.horizontalAlignment",
      ));
    }

    for (i, row) in rows.iter().enumerate() {
      let row_index = i + 1;

      if let Some((red, green, blue)) = priority_color(&row.priority) {
        requests.push(repeat_cell(
          grid_range(sheet_id, (row_index, row_index + 1), (COL_PRIORITY, COL_PRIORITY + 1)),
          json!({ "backgroundColor": { "red": red, "green": green, "blue": blue } }),
          "userEnteredFormat.backgroundColor",
        ));
      }

      let cells = row.to_cells();

      for col in HOUR_COLUMNS.iter().copied().filter(|c| cells.get(*c).is_some_and(CellValue::is_number)) {
        requests.push(repeat_cell(
          grid_range(sheet_id, (row_index, row_index + 1), (col, col + 1)),
          json!({ "numberFormat": { "type": "NUMBER", "pattern": "0" } }),
          "userEnteredFormat.numberFormat",
        ));
      }
    }

    if COL_SALARY < column_count {
      requests.push(repeat_cell(
        grid_range(sheet_id, (1, data_end), (COL_SALARY, COL_SALARY + 1)),
        json!({ "numberFormat": { "type": "NUMBER", "pattern": "0.00" } }),
        "userEnteredFormat.numberFormat",
      ));
    }
  }

  if column_count > 0 {
    requests.push(json!({
      "autoResizeDimensions": {
        "dimensions": {
          "sheetId": sheet_id,
          "dimension": "COLUMNS",
          "startIndex": 0,
          "endIndex": column_count,
        }
      }
    }));
  }

  requests
}

/// Size for a freshly created worksheet: (rows, columns).
pub fn new_sheet_size(row_count: usize, column_count: usize) -> (usize, usize) {
  ((row_count + 1).max(100), column_count.max(20).max(REPORT_COLUMN_COUNT))
}
