use predicates::prelude::*;
use serde_json::{json, Value};
use test_support;

fn preview_cmd() -> (assert_cmd::Command, tempfile::TempDir) {
  let (mut cmd, cwd) = test_support::cmd_bin("weeek-report");
  cmd
    .envs(test_support::weeek_fixture_env())
    .env("WEEEK_API_TOKEN", "test-token")
    .args(["--preview", "--today", "2024-03-03"]);
  (cmd, cwd)
}

fn run_preview() -> Value {
  let (mut cmd, _cwd) = preview_cmd();
  let out = cmd.output().unwrap();
  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
  serde_json::from_slice(&out.stdout).unwrap()
}

#[test]
fn preview_lays_out_all_pages_in_order() {
  let plan = run_preview();
  assert_eq!(plan["sheet"], "WEEEK report");

  let values = plan["values"].as_array().unwrap();
  assert_eq!(values.len(), 4, "header plus one row per task across both pages");

  assert_eq!(
    values[0],
    json!([
      "Task (ID)",
      "Priority",
      "Executor",
      "Status",
      "Start date",
      "End date",
      "Estimate",
      "Tracked (06.02 - 20.02)",
      "Comments",
      "Tracked (21.02 - 05.03)",
      "Comments",
      "Hourly rate",
      "Salary"
    ])
  );

  assert_eq!(
    values[1],
    json!([
      "Landing page (101)",
      "High",
      "Anna",
      "Done",
      "2024-02-01",
      "2024-02-25",
      4,
      2,
      "1. layout",
      2,
      "1. fixes\n2. review",
      "",
      "=(N(H2)+N(J2))*N(L2)"
    ])
  );

  assert_eq!(
    values[2],
    json!([
      "Billing (102)",
      "Low",
      "u-oleg",
      "In progress",
      "2024-02-15",
      "",
      "",
      "",
      "",
      "",
      "",
      "",
      "=(N(H3)+N(J3))*N(L3)"
    ])
  );
}

#[test]
fn unknown_board_falls_back_to_raw_column_id() {
  let plan = run_preview();
  let research = &plan["values"][3];
  assert_eq!(research[0], "Research (103)");
  assert_eq!(research[1], "");
  assert_eq!(research[2], "");
  assert_eq!(research[3], "5");
  assert_eq!(research[7], "", "work outside both periods is not counted");
}

#[test]
fn preview_formatting_colours_known_priorities() {
  let plan = run_preview();
  let colours: Vec<&Value> = plan["requests"]
    .as_array()
    .unwrap()
    .iter()
    .filter(|r| r["repeatCell"]["fields"] == "userEnteredFormat.backgroundColor")
    .collect();

  assert_eq!(colours.len(), 2, "High and Low rows only");
  assert_eq!(colours[0]["repeatCell"]["range"]["startRowIndex"], 1);
  assert_eq!(colours[1]["repeatCell"]["range"]["startRowIndex"], 2);
}

#[test]
fn preview_to_file_and_custom_sheet_name() {
  let (mut cmd, cwd) = preview_cmd();
  cmd
    .args(["--out", "plan.json", "--sheet-name", "March"])
    .assert()
    .success()
    .stdout(predicate::str::is_empty());

  let plan: Value = serde_json::from_str(&std::fs::read_to_string(cwd.path().join("plan.json")).unwrap()).unwrap();
  assert_eq!(plan["sheet"], "March");
  assert_eq!(plan["values"].as_array().unwrap().len(), 4);
}

#[test]
fn env_file_supplies_token() {
  let (mut cmd, cwd) = test_support::cmd_bin("weeek-report");
  std::fs::write(cwd.path().join("custom.env"), "WEEEK_API_TOKEN=from-file\nWEEEK_REPORT_SHEET_NAME=\"From file\"\n").unwrap();

  let out = cmd
    .envs(test_support::weeek_fixture_env())
    .args(["--preview", "--today", "2024-03-03", "--env-file", "custom.env"])
    .output()
    .unwrap();
  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

  let plan: Value = serde_json::from_slice(&out.stdout).unwrap();
  assert_eq!(plan["sheet"], "From file");
}

#[test]
fn fixture_pages_chain_by_cursor() {
  let pages: Value = test_support::read_fixture_json("weeek/task_pages.json");
  assert_eq!(pages[0]["hasMore"], true);
  assert_eq!(pages[0]["cursor"], "page-2");
  assert_eq!(pages[1]["hasMore"], false);
}
