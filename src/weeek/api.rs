// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: WEEEK public API access behind a trait seam (HTTP backend plus env-backed fixtures for tests)
// role: weeek/api
// inputs: API base URL, bearer token, timeout; env WEEEK_TEST_* fixtures when present
// outputs: Raw JSON envelopes for members, task pages and board columns
// side_effects: Network calls to the WEEEK API (HTTP backend only)
// invariants:
// - One blocking request per call with a bounded timeout; no retries
// - HTTP status >= 400, transport and JSON decode failures all map to FetchError with the endpoint attached
// - The env backend is selected whenever any WEEEK_TEST_* fixture variable is set
// errors: FetchError; callers decide whether a failure is fatal
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::config::ApiConfig;

pub const ENDPOINT_MEMBERS: &str = "ws/members";
pub const ENDPOINT_TASKS: &str = "tm/tasks";
pub const ENDPOINT_BOARD_COLUMNS: &str = "tm/board-columns";

pub const ENV_TEST_MEMBERS: &str = "WEEEK_TEST_MEMBERS_JSON";
pub const ENV_TEST_TASK_PAGES: &str = "WEEEK_TEST_TASK_PAGES_JSON";
pub const ENV_TEST_BOARD_COLUMNS: &str = "WEEEK_TEST_BOARD_COLUMNS_JSON";

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
  #[error("request to {endpoint} failed: {message}")]
  Transport { endpoint: String, message: String },
  #[error("{endpoint} answered with HTTP {status}")]
  Status { endpoint: String, status: u16 },
  #[error("malformed JSON from {endpoint}: {message}")]
  Decode { endpoint: String, message: String },
  #[error("{endpoint} did not report success or lacks '{key}'")]
  Unsuccessful { endpoint: String, key: String },
}

// --- Trait seam for the WEEEK API ---
pub trait WeeekApi {
  fn members_json(&self) -> Result<Value, FetchError>;
  fn tasks_page_json(&self, cursor: Option<&str>) -> Result<Value, FetchError>;
  fn board_columns_json(&self, board_id: i64) -> Result<Value, FetchError>;
}

struct WeeekHttpApi {
  base_url: String,
  token: String,
  agent: ureq::Agent,
}

impl WeeekHttpApi {
  fn new(config: &ApiConfig) -> Self {
    let agent: ureq::Agent = ureq::Agent::config_builder()
      .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
      .build()
      .into();

    let mut base_url = config.base_url.clone();

    if !base_url.ends_with('/') {
      base_url.push('/');
    }

    Self {
      base_url,
      token: config.token.clone(),
      agent,
    }
  }

  fn get_json(&self, endpoint: &str, query: &[(&str, String)]) -> Result<Value, FetchError> {
    let url = format!("{}{}", self.base_url, endpoint);
    debug!(%url, "GET");

    let mut req = self
      .agent
      .get(&url)
      .header("Accept", "application/json")
      .header("User-Agent", "weeek-report")
      .header("Authorization", &format!("Bearer {}", self.token));

    for (k, v) in query {
      req = req.query(*k, v);
    }

    let mut resp = req.call().map_err(|e| map_ureq_error(endpoint, e))?;

    resp
      .body_mut()
      .read_json::<Value>()
      .map_err(|e| map_ureq_error(endpoint, e))
  }
}

fn map_ureq_error(endpoint: &str, err: ureq::Error) -> FetchError {
  match err {
    ureq::Error::StatusCode(status) => FetchError::Status {
      endpoint: endpoint.to_string(),
      status,
    },
    ureq::Error::Json(e) => FetchError::Decode {
      endpoint: endpoint.to_string(),
      message: e.to_string(),
    },
    other => FetchError::Transport {
      endpoint: endpoint.to_string(),
      message: other.to_string(),
    },
  }
}

impl WeeekApi for WeeekHttpApi {
  fn members_json(&self) -> Result<Value, FetchError> {
    self.get_json(ENDPOINT_MEMBERS, &[])
  }

  fn tasks_page_json(&self, cursor: Option<&str>) -> Result<Value, FetchError> {
    let query: Vec<(&str, String)> = cursor.map(|c| vec![("cursor", c.to_string())]).unwrap_or_default();
    self.get_json(ENDPOINT_TASKS, &query)
  }

  fn board_columns_json(&self, board_id: i64) -> Result<Value, FetchError> {
    self.get_json(ENDPOINT_BOARD_COLUMNS, &[("boardId", board_id.to_string())])
  }
}

/// Fixture-backed API reading canned envelopes from `WEEEK_TEST_*` variables.
///
/// - members: the envelope itself
/// - task pages: a JSON array of envelopes; a cursor selects the page after the one that issued it
/// - board columns: an object keyed by board id; unknown boards answer HTTP 404
struct WeeekEnvApi;

fn env_json(var: &str, endpoint: &str) -> Result<Value, FetchError> {
  let raw = std::env::var(var).map_err(|_| FetchError::Transport {
    endpoint: endpoint.to_string(),
    message: format!("fixture {var} not set"),
  })?;

  serde_json::from_str::<Value>(&raw).map_err(|e| FetchError::Decode {
    endpoint: endpoint.to_string(),
    message: e.to_string(),
  })
}

impl WeeekApi for WeeekEnvApi {
  fn members_json(&self) -> Result<Value, FetchError> {
    env_json(ENV_TEST_MEMBERS, ENDPOINT_MEMBERS)
  }

  fn tasks_page_json(&self, cursor: Option<&str>) -> Result<Value, FetchError> {
    let pages = env_json(ENV_TEST_TASK_PAGES, ENDPOINT_TASKS)?;
    let Some(pages) = pages.as_array() else {
      return Err(FetchError::Decode {
        endpoint: ENDPOINT_TASKS.to_string(),
        message: "task page fixture must be an array".into(),
      });
    };

    let index = match cursor {
      None => Some(0),
      Some(c) => pages
        .iter()
        .position(|p| p.get("cursor").and_then(|v| v.as_str()) == Some(c))
        .map(|i| i + 1),
    };

    index
      .and_then(|i| pages.get(i).cloned())
      .ok_or_else(|| FetchError::Status {
        endpoint: ENDPOINT_TASKS.to_string(),
        status: 404,
      })
  }

  fn board_columns_json(&self, board_id: i64) -> Result<Value, FetchError> {
    let boards = env_json(ENV_TEST_BOARD_COLUMNS, ENDPOINT_BOARD_COLUMNS)?;

    boards
      .get(board_id.to_string())
      .cloned()
      .ok_or_else(|| FetchError::Status {
        endpoint: ENDPOINT_BOARD_COLUMNS.to_string(),
        status: 404,
      })
  }
}

fn env_wants_mock() -> bool {
  [ENV_TEST_MEMBERS, ENV_TEST_TASK_PAGES, ENV_TEST_BOARD_COLUMNS]
    .iter()
    .any(|k| std::env::var(k).is_ok())
}

/// Select the API backend: env fixtures when present, HTTP otherwise.
pub fn build_api(config: &ApiConfig) -> Box<dyn WeeekApi> {
  if env_wants_mock() {
    debug!("using WEEEK_TEST_* fixtures instead of the HTTP API");
    Box::new(WeeekEnvApi)
  } else {
    Box::new(WeeekHttpApi::new(config))
  }
}

// Fixture backend constructor for unit tests.
#[cfg(test)]
pub fn make_env_api() -> Box<dyn WeeekApi> {
  Box::new(WeeekEnvApi)
}
