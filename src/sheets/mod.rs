// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Report output: the SheetWriter seam, its Google Sheets and preview backends, and shared errors
// role: sheets/namespace
// inputs: Header labels and ReportRows
// outputs: WriteOutcome describing what was written
// invariants:
// - A failed data write is fatal; a failed formatting batch is logged and reported in the outcome
// - Existing content of the target worksheet is replaced, never appended to
// errors: SheetError
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

pub mod auth;
pub mod google;
pub mod layout;
pub mod preview;

use std::path::PathBuf;

use crate::model::ReportRow;

#[derive(Debug, thiserror::Error)]
pub enum SheetError {
  #[error(transparent)]
  Auth(#[from] auth::AuthError),
  #[error("spreadsheet {spreadsheet_id} not found or not shared with the service account")]
  NotFound { spreadsheet_id: String },
  #[error("sheets API {operation} failed: {message}")]
  Api { operation: &'static str, message: String },
  #[error("cannot write preview to {path}: {source}")]
  Output { path: PathBuf, source: std::io::Error },
}

/// What a writer did with the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOutcome {
  pub sheet_name: String,
  pub rows_written: usize,
  /// False when the formatting batch was rejected; data is in place regardless.
  pub formatted: bool,
}

pub trait SheetWriter {
  fn write_report(&self, headers: &[String], rows: &[ReportRow]) -> Result<WriteOutcome, SheetError>;
}
