// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Install the tracing subscriber for the run
// role: logging/init
// inputs: Fallback filter string (WEEEK_REPORT_LOG); RUST_LOG wins when set
// outputs: Global fmt subscriber writing compact lines to stderr
// invariants: stdout is never written by logging (preview JSON goes there)
// errors: TelemetryError for a bad filter or a second init
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
  #[error("invalid log level/filter '{value}': unable to build EnvFilter")]
  EnvFilter { value: String, source: ParseError },
  #[error("telemetry error: {0}")]
  Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

pub fn init(fallback_filter: &str) -> Result<(), TelemetryError> {
  let env_filter = match EnvFilter::try_from_default_env() {
    Ok(filter) => filter,
    Err(_) => EnvFilter::try_new(fallback_filter).map_err(|source| TelemetryError::EnvFilter {
      value: fallback_filter.to_string(),
      source,
    })?,
  };

  tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .compact()
    .with_ansi(false)
    .try_init()
    .map_err(TelemetryError::Subscriber)
}
