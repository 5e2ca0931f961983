// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Orchestrate one report run: periods, WEEEK fetch, aggregation, sheet write
// role: processing/orchestrator
// inputs: AppConfig, EffectiveConfig (reference date, preview target)
// outputs: WriteOutcome; the worksheet (or preview JSON) as a side effect
// side_effects: Network calls through the selected backends
// invariants:
// - The sheet writer is built (and authenticated) before any WEEEK call
// - An empty task list aborts the run before anything is written
// - Rows keep the order tasks were returned in
// errors: anyhow with stage context; member/task fetch failures are fatal
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use tracing::info;

use crate::aggregate::build_rows;
use crate::cli::EffectiveConfig;
use crate::config::AppConfig;
use crate::period::reporting_periods;
use crate::sheets::google::{GoogleSheetsHttp, SpreadsheetWriter};
use crate::sheets::layout::report_headers;
use crate::sheets::preview::PreviewWriter;
use crate::sheets::{SheetWriter, WriteOutcome};
use crate::weeek::api::{build_api, WeeekApi};
use crate::weeek::fetch::DataFetcher;

/// Pick the output backend: preview JSON, or the configured spreadsheet.
pub fn build_writer(cfg: &AppConfig, eff: &EffectiveConfig) -> Result<Box<dyn SheetWriter>> {
  if let Some(out) = &eff.preview_out {
    info!(out = %out, "preview mode; Google Sheets will not be touched");
    return Ok(Box::new(PreviewWriter::new(cfg.sheet_name.clone(), out.clone())));
  }

  let sheet = cfg
    .sheet
    .as_ref()
    .context("spreadsheet settings are required outside preview mode")?;
  let api = GoogleSheetsHttp::connect(sheet, cfg.api.timeout_secs).context("connecting to Google Sheets")?;

  Ok(Box::new(SpreadsheetWriter::new(api, cfg.sheet_name.clone())))
}

/// Fetch, aggregate and write with already-built backends.
pub fn generate(api: &dyn WeeekApi, writer: &dyn SheetWriter, today: NaiveDate) -> Result<WriteOutcome> {
  // Phase 1: periods
  let (first, second) = reporting_periods(today);
  info!(
    reference = %today,
    period1 = %first.label(),
    period2 = %second.label(),
    "reporting periods"
  );

  // Phase 2: fetch
  let data = DataFetcher::new(api).fetch_all().context("fetching WEEEK data")?;

  if data.tasks.is_empty() {
    bail!("WEEEK returned no tasks; nothing to report");
  }

  // Phase 3: aggregate
  let rows = build_rows(&data.tasks, &data.members, &data.columns, &first, &second);
  info!(rows = rows.len(), "report rows built");

  // Phase 4: write
  let headers = report_headers(&first, &second);
  let outcome = writer.write_report(&headers, &rows).context("writing the report sheet")?;

  info!(
    sheet = %outcome.sheet_name,
    rows = outcome.rows_written,
    formatted = outcome.formatted,
    "report complete"
  );
  Ok(outcome)
}

pub fn run(cfg: &AppConfig, eff: &EffectiveConfig) -> Result<WriteOutcome> {
  let writer = build_writer(cfg, eff)?;
  let api = build_api(&cfg.api);
  generate(api.as_ref(), writer.as_ref(), eff.today)
}
