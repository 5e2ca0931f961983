// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Google Sheets v4 access behind a trait seam, and the writer that lays the report out on a worksheet
// role: sheets/google
// inputs: SheetConfig (spreadsheet id, credentials file), worksheet name, HTTP timeout
// outputs: Worksheet replaced with header + rows, formatted
// side_effects: Network calls to sheets.googleapis.com and the token endpoint
// invariants:
// - Worksheet is located by exact title; created when absent, cleared when present
// - Values are written in one USER_ENTERED update so salary formulas evaluate
// - Formatting goes out as one batchUpdate after the values
// errors: SheetError; HTTP 404 on the spreadsheet maps to NotFound
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::time::Duration;

use serde_json::{json, Value};
use tracing::{debug, error, info};

use super::auth::{fetch_access_token, read_service_account};
use super::layout::{format_requests, new_sheet_size, sheet_values};
use super::{SheetError, SheetWriter, WriteOutcome};
use crate::config::SheetConfig;
use crate::model::ReportRow;

pub const SHEETS_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

// --- Trait seam for the Sheets API ---
pub trait SheetsApi {
  /// Sheet id (gid) of the worksheet with this exact title.
  fn find_worksheet(&self, title: &str) -> Result<Option<i64>, SheetError>;
  fn add_worksheet(&self, title: &str, rows: usize, cols: usize) -> Result<i64, SheetError>;
  fn clear_worksheet(&self, title: &str) -> Result<(), SheetError>;
  fn update_values(&self, range: &str, values: &[Vec<Value>]) -> Result<(), SheetError>;
  fn batch_update(&self, requests: &[Value]) -> Result<(), SheetError>;
}

/// `'Title'!A1` with embedded quotes doubled.
pub fn a1_origin(title: &str) -> String {
  format!("'{}'!A1", title.replace('\'', "''"))
}

/// Percent-encode everything outside the RFC 3986 unreserved set.
pub fn encode_path_segment(raw: &str) -> String {
  let mut out = String::with_capacity(raw.len());

  for b in raw.bytes() {
    match b {
      b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => out.push(b as char),
      _ => out.push_str(&format!("%{b:02X}")),
    }
  }

  out
}

pub struct GoogleSheetsHttp {
  agent: ureq::Agent,
  spreadsheet_id: String,
  access_token: String,
}

impl GoogleSheetsHttp {
  /// Authenticate with the service account and bind to one spreadsheet.
  pub fn connect(config: &SheetConfig, timeout_secs: u64) -> Result<Self, SheetError> {
    let agent: ureq::Agent = ureq::Agent::config_builder()
      .timeout_global(Some(Duration::from_secs(timeout_secs)))
      .build()
      .into();

    let key = read_service_account(&config.credentials_file)?;
    let access_token = fetch_access_token(&agent, &key)?;
    info!(client = %key.client_email, "authenticated with Google");

    Ok(Self {
      agent,
      spreadsheet_id: config.spreadsheet_id.clone(),
      access_token,
    })
  }

  fn url(&self, suffix: &str) -> String {
    format!("{}/{}{}", SHEETS_BASE_URL, self.spreadsheet_id, suffix)
  }

  fn bearer(&self) -> String {
    format!("Bearer {}", self.access_token)
  }

  fn map_error(&self, operation: &'static str, err: ureq::Error) -> SheetError {
    match err {
      ureq::Error::StatusCode(404) => SheetError::NotFound {
        spreadsheet_id: self.spreadsheet_id.clone(),
      },
      other => SheetError::Api {
        operation,
        message: other.to_string(),
      },
    }
  }

  fn post_json(&self, operation: &'static str, url: &str, body: &Value) -> Result<Value, SheetError> {
    debug!(%url, operation, "POST");
    let mut resp = self
      .agent
      .post(url)
      .header("Authorization", &self.bearer())
      .send_json(body)
      .map_err(|e| self.map_error(operation, e))?;

    resp.body_mut().read_json::<Value>().map_err(|e| self.map_error(operation, e))
  }
}

impl SheetsApi for GoogleSheetsHttp {
  fn find_worksheet(&self, title: &str) -> Result<Option<i64>, SheetError> {
    let url = self.url("");
    debug!(%url, "GET");

    let mut resp = self
      .agent
      .get(&url)
      .header("Authorization", &self.bearer())
      .query("fields", "sheets.properties(sheetId,title)")
      .call()
      .map_err(|e| self.map_error("metadata", e))?;

    let meta: Value = resp.body_mut().read_json().map_err(|e| self.map_error("metadata", e))?;

    Ok(
      meta
        .get("sheets")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .map(|s| &s["properties"])
        .find(|p| p["title"].as_str() == Some(title))
        .and_then(|p| p["sheetId"].as_i64()),
    )
  }

  fn add_worksheet(&self, title: &str, rows: usize, cols: usize) -> Result<i64, SheetError> {
    let body = json!({
      "requests": [{
        "addSheet": {
          "properties": {
            "title": title,
            "gridProperties": { "rowCount": rows, "columnCount": cols },
          }
        }
      }]
    });

    let reply = self.post_json("addSheet", &self.url(":batchUpdate"), &body)?;

    reply["replies"][0]["addSheet"]["properties"]["sheetId"]
      .as_i64()
      .ok_or_else(|| SheetError::Api {
        operation: "addSheet",
        message: "reply carries no sheetId".into(),
      })
  }

  fn clear_worksheet(&self, title: &str) -> Result<(), SheetError> {
    let range = encode_path_segment(&format!("'{}'", title.replace('\'', "''")));
    self.post_json("clear", &self.url(&format!("/values/{range}:clear")), &json!({}))?;
    Ok(())
  }

  fn update_values(&self, range: &str, values: &[Vec<Value>]) -> Result<(), SheetError> {
    let url = self.url(&format!("/values/{}", encode_path_segment(range)));
    debug!(%url, rows = values.len(), "PUT");

    self
      .agent
      .put(&url)
      .header("Authorization", &self.bearer())
      .query("valueInputOption", "USER_ENTERED")
      .send_json(json!({ "range": range, "majorDimension": "ROWS", "values": values }))
      .map_err(|e| self.map_error("values.update", e))?;

    Ok(())
  }

  fn batch_update(&self, requests: &[Value]) -> Result<(), SheetError> {
    self.post_json("batchUpdate", &self.url(":batchUpdate"), &json!({ "requests": requests }))?;
    Ok(())
  }
}

/// Writes the report onto one worksheet through any `SheetsApi`.
pub struct SpreadsheetWriter<A: SheetsApi> {
  api: A,
  sheet_name: String,
}

impl<A: SheetsApi> SpreadsheetWriter<A> {
  pub fn new(api: A, sheet_name: impl Into<String>) -> Self {
    Self {
      api,
      sheet_name: sheet_name.into(),
    }
  }

  fn prepare_worksheet(&self, rows: usize, cols: usize) -> Result<i64, SheetError> {
    match self.api.find_worksheet(&self.sheet_name)? {
      Some(gid) => {
        info!(sheet = %self.sheet_name, "clearing existing worksheet");
        self.api.clear_worksheet(&self.sheet_name)?;
        Ok(gid)
      }
      None => {
        let (r, c) = new_sheet_size(rows, cols);
        info!(sheet = %self.sheet_name, rows = r, cols = c, "creating worksheet");
        self.api.add_worksheet(&self.sheet_name, r, c)
      }
    }
  }
}

impl<A: SheetsApi> SheetWriter for SpreadsheetWriter<A> {
  fn write_report(&self, headers: &[String], rows: &[ReportRow]) -> Result<WriteOutcome, SheetError> {
    let gid = self.prepare_worksheet(rows.len(), headers.len())?;

    self
      .api
      .update_values(&a1_origin(&self.sheet_name), &sheet_values(headers, rows))?;
    info!(sheet = %self.sheet_name, rows = rows.len(), "report values written");

    let formatted = match self.api.batch_update(&format_requests(gid, headers.len(), rows)) {
      Ok(()) => true,
      Err(e) => {
        error!(error = %e, "formatting failed; data was written unformatted");
        false
      }
    };

    Ok(WriteOutcome {
      sheet_name: self.sheet_name.clone(),
      rows_written: rows.len(),
      formatted,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::cell::RefCell;

  #[derive(Default)]
  struct RecordingApi {
    existing: Option<i64>,
    fail_values: bool,
    fail_format: bool,
    calls: RefCell<Vec<String>>,
    values: RefCell<Vec<Vec<Value>>>,
    requests: RefCell<Vec<Value>>,
  }

  impl SheetsApi for &RecordingApi {
    fn find_worksheet(&self, title: &str) -> Result<Option<i64>, SheetError> {
      self.calls.borrow_mut().push(format!("find {title}"));
      Ok(self.existing)
    }

    fn add_worksheet(&self, title: &str, rows: usize, cols: usize) -> Result<i64, SheetError> {
      self.calls.borrow_mut().push(format!("add {title} {rows}x{cols}"));
      Ok(99)
    }

    fn clear_worksheet(&self, title: &str) -> Result<(), SheetError> {
      self.calls.borrow_mut().push(format!("clear {title}"));
      Ok(())
    }

    fn update_values(&self, range: &str, values: &[Vec<Value>]) -> Result<(), SheetError> {
      self.calls.borrow_mut().push(format!("update {range}"));
      if self.fail_values {
        return Err(SheetError::Api {
          operation: "values.update",
          message: "quota".into(),
        });
      }
      *self.values.borrow_mut() = values.to_vec();
      Ok(())
    }

    fn batch_update(&self, requests: &[Value]) -> Result<(), SheetError> {
      self.calls.borrow_mut().push("format".to_string());
      if self.fail_format {
        return Err(SheetError::Api {
          operation: "batchUpdate",
          message: "bad request".into(),
        });
      }
      *self.requests.borrow_mut() = requests.to_vec();
      Ok(())
    }
  }

  fn headers() -> Vec<String> {
    (0..13).map(|i| format!("h{i}")).collect()
  }

  fn rows() -> Vec<ReportRow> {
    vec![ReportRow {
      task: "Write docs (7)".into(),
      priority: "High".into(),
      ..Default::default()
    }]
  }

  #[test]
  fn creates_missing_worksheet_then_writes_and_formats() {
    let api = RecordingApi::default();
    let writer = SpreadsheetWriter::new(&api, "Report");

    let outcome = writer.write_report(&headers(), &rows()).unwrap();
    assert_eq!(
      outcome,
      WriteOutcome {
        sheet_name: "Report".into(),
        rows_written: 1,
        formatted: true
      }
    );
    assert_eq!(
      *api.calls.borrow(),
      vec!["find Report", "add Report 100x20", "update 'Report'!A1", "format"]
    );
    assert_eq!(api.values.borrow().len(), 2);
    assert_eq!(api.requests.borrow()[0]["repeatCell"]["range"]["sheetId"], 99);
  }

  #[test]
  fn existing_worksheet_is_cleared_not_recreated() {
    let api = RecordingApi {
      existing: Some(5),
      ..Default::default()
    };
    SpreadsheetWriter::new(&api, "Report").write_report(&headers(), &rows()).unwrap();

    let calls = api.calls.borrow();
    assert_eq!(calls[1], "clear Report");
    assert!(!calls.iter().any(|c| c.starts_with("add")));
    assert_eq!(api.requests.borrow()[0]["repeatCell"]["range"]["sheetId"], 5);
  }

  #[test]
  fn value_write_failure_is_fatal() {
    let api = RecordingApi {
      fail_values: true,
      ..Default::default()
    };
    let err = SpreadsheetWriter::new(&api, "Report").write_report(&headers(), &rows()).unwrap_err();
    assert!(err.to_string().contains("quota"));
    assert!(!api.calls.borrow().contains(&"format".to_string()));
  }

  #[test]
  fn format_failure_is_reported_in_outcome() {
    let api = RecordingApi {
      fail_format: true,
      ..Default::default()
    };
    let outcome = SpreadsheetWriter::new(&api, "Report").write_report(&headers(), &rows()).unwrap();
    assert!(!outcome.formatted);
    assert_eq!(api.values.borrow().len(), 2);
  }

  #[test]
  fn ranges_are_quoted_and_encoded() {
    assert_eq!(a1_origin("WEEEK report"), "'WEEEK report'!A1");
    assert_eq!(a1_origin("Bob's"), "'Bob''s'!A1");
    assert_eq!(encode_path_segment("'A b'!A1"), "%27A%20b%27%21A1");
    assert_eq!(encode_path_segment("Отчёт"), "%D0%9E%D1%82%D1%87%D1%91%D1%82");
  }
}
