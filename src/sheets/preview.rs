// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Dry-run writer emitting the planned sheet contents and formatting as JSON instead of calling Google
// role: sheets/preview
// inputs: Worksheet name, output target ("-" for stdout or a file path)
// outputs: Pretty JSON { sheet, values, requests } with a placeholder sheet id of 0
// invariants: Same values and requests the Google writer would send
// errors: SheetError::Output when the target cannot be written
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::io::Write;
use std::path::PathBuf;

use serde_json::json;
use tracing::info;

use super::layout::{format_requests, sheet_values};
use super::{SheetError, SheetWriter, WriteOutcome};
use crate::model::ReportRow;

pub struct PreviewWriter {
  sheet_name: String,
  out: String,
}

impl PreviewWriter {
  pub fn new(sheet_name: impl Into<String>, out: impl Into<String>) -> Self {
    Self {
      sheet_name: sheet_name.into(),
      out: out.into(),
    }
  }

  fn emit(&self, text: &str) -> Result<(), SheetError> {
    let path = PathBuf::from(&self.out);
    let wrap = |source: std::io::Error| SheetError::Output { path: path.clone(), source };

    if self.out == "-" {
      let mut stdout = std::io::stdout().lock();
      writeln!(stdout, "{text}").map_err(wrap)
    } else {
      std::fs::write(&path, format!("{text}\n")).map_err(wrap)?;
      info!(path = %path.display(), "preview written");
      Ok(())
    }
  }
}

impl SheetWriter for PreviewWriter {
  fn write_report(&self, headers: &[String], rows: &[ReportRow]) -> Result<WriteOutcome, SheetError> {
    let plan = json!({
      "sheet": self.sheet_name,
      "values": sheet_values(headers, rows),
      "requests": format_requests(0, headers.len(), rows),
    });

    let text = serde_json::to_string_pretty(&plan).map_err(|e| SheetError::Output {
      path: PathBuf::from(&self.out),
      source: e.into(),
    })?;
    self.emit(&text)?;

    Ok(WriteOutcome {
      sheet_name: self.sheet_name.clone(),
      rows_written: rows.len(),
      formatted: true,
    })
  }
}
