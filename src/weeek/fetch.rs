// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Fetch members, all task pages and per-board columns; map raw JSON into typed Task/Workload values
// role: weeek/fetch
// inputs: &dyn WeeekApi
// outputs: MemberMap, Vec<Task>, BoardColumnMap (bundled as WeeekData)
// side_effects: API calls through the seam; logs progress and degraded lookups
// invariants:
// - Task order is page order, then in-page order
// - Pagination stops when hasMore is false, no cursor is returned, or a cursor comes back a second time
// - Member and task failures propagate; a board column failure only drops that board from the map
// errors: FetchError for members/tasks
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::{BTreeSet, HashSet};

use serde_json::Value;
use tracing::{info, warn};

use crate::ext::serde_json::JsonFetch;
use crate::model::{BoardColumnMap, MemberMap, RawId, Task, Workload};
use crate::weeek::api::{FetchError, WeeekApi, ENDPOINT_BOARD_COLUMNS, ENDPOINT_MEMBERS, ENDPOINT_TASKS};

/// Everything the aggregator needs from WEEEK for one run.
#[derive(Debug, Default)]
pub struct WeeekData {
  pub members: MemberMap,
  pub tasks: Vec<Task>,
  pub columns: BoardColumnMap,
}

/// Return the list under `key` when the envelope reports success.
fn envelope_list<'a>(v: &'a Value, endpoint: &str, key: &str) -> Result<&'a Vec<Value>, FetchError> {
  let list = if v.fetch("success").as_flag() { v.fetch(key).as_array() } else { None };

  list.ok_or_else(|| FetchError::Unsuccessful {
    endpoint: endpoint.to_string(),
    key: key.to_string(),
  })
}

fn workload_from_json(v: &Value) -> Workload {
  Workload {
    date: v.fetch("date").as_text(),
    minutes: v.fetch("duration").as_minutes().unwrap_or(0),
    comment: v.fetch("comment").as_text(),
  }
}

fn workloads_at(v: &Value, key: &str) -> Vec<Workload> {
  v.fetch(key)
    .as_array()
    .map(|arr| arr.iter().map(workload_from_json).collect())
    .unwrap_or_default()
}

/// Map one raw task object into a typed `Task`. Unknown shapes degrade per field.
pub fn task_from_json(v: &Value) -> Task {
  Task {
    id: v.fetch("id").as_raw_id(),
    title: v.fetch("title").as_text().unwrap_or_default(),
    priority: v.fetch("priority").as_raw_id(),
    user_id: v.fetch("userId").as_text(),
    board_id: v.fetch("boardId").as_raw_id(),
    board_column_id: v.fetch("boardColumnId").as_raw_id(),
    created_at: v.fetch("createdAt").as_text(),
    is_completed: v.fetch("isCompleted").as_flag(),
    updated_at: v.fetch("updatedAt").as_text(),
    duration: v.fetch("duration").as_minutes(),
    workloads: workloads_at(v, "workloads"),
    time_entries: workloads_at(v, "timeEntries"),
  }
}

pub struct DataFetcher<'a> {
  api: &'a dyn WeeekApi,
}

impl<'a> DataFetcher<'a> {
  pub fn new(api: &'a dyn WeeekApi) -> Self {
    Self { api }
  }

  /// member id -> first name (or the id itself when the name is missing).
  pub fn fetch_members(&self) -> Result<MemberMap, FetchError> {
    info!("loading workspace members");
    let data = self.api.members_json()?;
    let members = envelope_list(&data, ENDPOINT_MEMBERS, "members")?;

    let mut map = MemberMap::new();

    for member in members {
      let Some(id) = member.fetch("id").as_text().filter(|s| !s.is_empty()) else {
        continue;
      };
      let name = member
        .fetch("firstName")
        .as_text()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| id.clone());

      map.insert(id, name);
    }

    info!(count = map.len(), "workspace members loaded");
    Ok(map)
  }

  /// Follow the task cursor until the API reports no more pages.
  pub fn fetch_all_tasks(&self) -> Result<Vec<Task>, FetchError> {
    info!("loading tasks");
    let mut tasks: Vec<Task> = Vec::new();
    let mut cursor: Option<String> = None;
    let mut page = 0usize;
    let mut seen: HashSet<String> = HashSet::new();

    loop {
      page += 1;
      let data = self.api.tasks_page_json(cursor.as_deref()).map_err(|e| {
        warn!(page, error = %e, "task page failed");
        e
      })?;
      let items = envelope_list(&data, ENDPOINT_TASKS, "tasks")?;

      tasks.extend(items.iter().map(task_from_json));

      let has_more = data.fetch("hasMore").as_flag();
      let next = data.fetch("cursor").as_text().filter(|c| !c.is_empty());

      match next {
        Some(c) if has_more => {
          if !seen.insert(c.clone()) {
            warn!(page, cursor = %c, "task cursor already visited; stopping pagination");
            break;
          }
          cursor = Some(c);
        }
        _ => break,
      }
    }

    info!(count = tasks.len(), pages = page, "tasks loaded");
    Ok(tasks)
  }

  /// (column id, name) pairs for a board. Columns without an integer id are skipped.
  pub fn fetch_columns_for_board(&self, board_id: i64) -> Result<Vec<(i64, String)>, FetchError> {
    let data = self.api.board_columns_json(board_id)?;
    let columns = envelope_list(&data, ENDPOINT_BOARD_COLUMNS, "boardColumns")?;

    let mut out = Vec::with_capacity(columns.len());

    for column in columns {
      let raw = column.fetch("id").as_raw_id();

      match raw.as_ref().and_then(|r| r.normalized().as_int()) {
        Some(col_id) => {
          let name = column
            .fetch("name")
            .as_text()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| col_id.to_string());
          out.push((col_id, name));
        }
        None => {
          if let Some(r) = raw {
            warn!(board_id, column_id = %r, "column id is not numeric; skipping column");
          }
        }
      }
    }

    Ok(out)
  }

  /// Build the (board, column) -> name map for every board referenced by `tasks`.
  pub fn fetch_board_columns(&self, tasks: &[Task]) -> BoardColumnMap {
    let mut boards: BTreeSet<i64> = BTreeSet::new();

    for raw in tasks.iter().filter_map(|t| t.board_id.as_ref()) {
      match raw.normalized() {
        RawId::Int(id) => {
          boards.insert(id);
        }
        RawId::Text(s) => warn!(board_id = %s, "board id is not numeric; skipping board"),
      }
    }

    let mut map = BoardColumnMap::new();

    for board_id in boards {
      match self.fetch_columns_for_board(board_id) {
        Ok(columns) => {
          for (col_id, name) in columns {
            map.insert((board_id, col_id), name);
          }
        }
        Err(e) => warn!(board_id, error = %e, "could not load board columns; statuses fall back to column ids"),
      }
    }

    map
  }

  /// Members, then tasks, then the columns of every board the tasks mention.
  pub fn fetch_all(&self) -> Result<WeeekData, FetchError> {
    let members = self.fetch_members()?;
    let tasks = self.fetch_all_tasks()?;
    let columns = self.fetch_board_columns(&tasks);

    Ok(WeeekData { members, tasks, columns })
  }
}
