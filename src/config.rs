// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Load the run configuration once from .env and the process environment
// role: config/loading
// inputs: Optional .env path; env WEEEK_API_TOKEN, GOOGLE_SHEET_ID, GOOGLE_CREDENTIALS_FILENAME and optional WEEEK_* knobs
// outputs: AppConfig passed explicitly to every stage
// side_effects: dotenvy populates the process environment from the .env file (existing vars win)
// invariants:
// - Empty values count as missing
// - Sheet settings are only required when writing to Google (not in preview)
// errors: ConfigError naming the offending variable
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::env;
use std::path::{Path, PathBuf};

pub const ENV_API_TOKEN: &str = "WEEEK_API_TOKEN";
pub const ENV_API_BASE_URL: &str = "WEEEK_API_BASE_URL";
pub const ENV_HTTP_TIMEOUT: &str = "WEEEK_HTTP_TIMEOUT_SECS";
pub const ENV_SHEET_ID: &str = "GOOGLE_SHEET_ID";
pub const ENV_CREDENTIALS: &str = "GOOGLE_CREDENTIALS_FILENAME";
pub const ENV_SHEET_NAME: &str = "WEEEK_REPORT_SHEET_NAME";
pub const ENV_LOG: &str = "WEEEK_REPORT_LOG";

pub const DEFAULT_API_BASE_URL: &str = "https://api.weeek.net/public/v1/";
pub const DEFAULT_SHEET_NAME: &str = "WEEEK report";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_ENV_FILE: &str = ".env";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
  #[error("required environment variable {0} is not set or empty")]
  Missing(&'static str),
  #[error("{var} must be a positive whole number of seconds, got '{value}'")]
  InvalidTimeout { var: &'static str, value: String },
  #[error("cannot load env file {path}: {message}")]
  EnvFile { path: PathBuf, message: String },
}

/// Settings for talking to the WEEEK API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub token: String,
  pub timeout_secs: u64,
}

/// Target spreadsheet and the service-account credentials used to reach it.
#[derive(Debug, Clone)]
pub struct SheetConfig {
  pub spreadsheet_id: String,
  pub credentials_file: PathBuf,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub api: ApiConfig,
  /// `None` in preview mode.
  pub sheet: Option<SheetConfig>,
  pub sheet_name: String,
}

/// Command-line values that take precedence over the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
  pub env_file: Option<PathBuf>,
  pub sheet_name: Option<String>,
  pub preview: bool,
}

fn non_empty(var: &str) -> Option<String> {
  env::var(var).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn required(var: &'static str) -> Result<String, ConfigError> {
  non_empty(var).ok_or(ConfigError::Missing(var))
}

/// Load a dotenv file if present. `Ok(false)` when there is no such file;
/// a file that exists but cannot be read or parsed is an error.
/// Runs before logging is installed, so the caller reports the outcome.
pub fn load_env_file(path: Option<&Path>) -> Result<bool, ConfigError> {
  let path = path.unwrap_or_else(|| Path::new(DEFAULT_ENV_FILE));

  match dotenvy::from_path(path) {
    Ok(()) => Ok(true),
    Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
    Err(e) => Err(ConfigError::EnvFile {
      path: path.to_path_buf(),
      message: e.to_string(),
    }),
  }
}

/// Log filter from the environment; usable before the rest of the config loads.
pub fn log_filter_from_env() -> String {
  non_empty(ENV_LOG).unwrap_or_else(|| "info".to_string())
}

impl AppConfig {
  /// Build the configuration from the (already loaded) environment.
  pub fn from_env(overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
    let token = required(ENV_API_TOKEN)?;

    let timeout_secs = match non_empty(ENV_HTTP_TIMEOUT) {
      None => DEFAULT_TIMEOUT_SECS,
      Some(v) => v
        .parse::<u64>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or(ConfigError::InvalidTimeout {
          var: ENV_HTTP_TIMEOUT,
          value: v,
        })?,
    };

    let sheet = if overrides.preview {
      None
    } else {
      Some(SheetConfig {
        spreadsheet_id: required(ENV_SHEET_ID)?,
        credentials_file: PathBuf::from(required(ENV_CREDENTIALS)?),
      })
    };

    let sheet_name = overrides
      .sheet_name
      .clone()
      .filter(|s| !s.trim().is_empty())
      .or_else(|| non_empty(ENV_SHEET_NAME))
      .unwrap_or_else(|| DEFAULT_SHEET_NAME.to_string());

    Ok(Self {
      api: ApiConfig {
        base_url: non_empty(ENV_API_BASE_URL).unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
        token,
        timeout_secs,
      },
      sheet,
      sheet_name,
    })
  }
}
