// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Dotted-path access into loosely typed WEEEK JSON with lenient typed extraction (ids, minutes, flags)
// role: extension/serde_json
// outputs: JsonFetch trait and JsonFetched wrapper
// invariants:
// - No panics; missing paths and JSON null both yield None
// - as_raw_id accepts numbers and strings; as_minutes accepts integers, floats (ceil) and numeric strings
// - as_flag treats only JSON true as true
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use crate::model::RawId;

/// Wrapper around a JSON location to allow typed extraction via a clear second step.
pub struct JsonFetched<'a> {
  inner: Option<&'a serde_json::Value>,
}

impl<'a> JsonFetched<'a> {
  fn present(&self) -> Option<&'a serde_json::Value> {
    self.inner.filter(|v| !v.is_null())
  }

  /// Number or string identifier. Floats with no fractional part count as integers.
  pub fn as_raw_id(&self) -> Option<RawId> {
    match self.present()? {
      serde_json::Value::Number(n) => n
        .as_i64()
        .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
        .map(RawId::Int)
        .or_else(|| Some(RawId::Text(n.to_string()))),
      serde_json::Value::String(s) => Some(RawId::Text(s.clone())),
      _ => None,
    }
  }

  /// Scalar rendered as text (strings verbatim, numbers and bools via Display).
  pub fn as_text(&self) -> Option<String> {
    match self.present()? {
      serde_json::Value::String(s) => Some(s.clone()),
      serde_json::Value::Number(n) => Some(n.to_string()),
      serde_json::Value::Bool(b) => Some(b.to_string()),
      _ => None,
    }
  }

  /// Whole minutes; fractional minutes round up.
  pub fn as_minutes(&self) -> Option<i64> {
    match self.present()? {
      serde_json::Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.ceil() as i64)),
      serde_json::Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f.ceil() as i64),
      _ => None,
    }
  }

  pub fn as_flag(&self) -> bool {
    matches!(self.present(), Some(serde_json::Value::Bool(true)))
  }

  pub fn as_array(&self) -> Option<&'a Vec<serde_json::Value>> {
    self.present().and_then(|v| v.as_array())
  }
}

/// Extension to fetch nested values via dotted paths like "task.boardId".
pub trait JsonFetch {
  fn fetch(&self, path: &str) -> JsonFetched<'_>;
}

impl JsonFetch for serde_json::Value {
  fn fetch(&self, path: &str) -> JsonFetched<'_> {
    if path.is_empty() {
      return JsonFetched { inner: Some(self) };
    }

    let mut cur = self;

    for key in path.split('.') {
      match cur.get(key) {
        Some(next) => cur = next,
        None => return JsonFetched { inner: None },
      }
    }

    JsonFetched { inner: Some(cur) }
  }
}
