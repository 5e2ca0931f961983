use predicates::prelude::*;
use serde_json::json;
use test_support;

#[test]
fn missing_token_fails_before_fetching() {
  let (mut cmd, _cwd) = test_support::cmd_bin("weeek-report");
  cmd
    .envs(test_support::weeek_fixture_env())
    .args(["--preview", "--today", "2024-03-03"])
    .assert()
    .failure()
    .stdout(predicate::str::is_empty())
    .stderr(predicate::str::contains("WEEEK_API_TOKEN"));
}

#[test]
fn missing_sheet_settings_fail_outside_preview() {
  let (mut cmd, _cwd) = test_support::cmd_bin("weeek-report");
  cmd
    .envs(test_support::weeek_fixture_env())
    .env("WEEEK_API_TOKEN", "test-token")
    .args(["--today", "2024-03-03"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("GOOGLE_SHEET_ID"));
}

#[test]
fn unusable_credentials_abort_the_run() {
  let (mut cmd, _cwd) = test_support::cmd_bin("weeek-report");
  let creds = test_support::fixtures_dir().join("service_account.json");
  cmd
    .envs(test_support::weeek_fixture_env())
    .env("WEEEK_API_TOKEN", "test-token")
    .env("GOOGLE_SHEET_ID", "sheet-under-test")
    .env("GOOGLE_CREDENTIALS_FILENAME", &creds)
    .args(["--today", "2024-03-03"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("private key"));
}

#[test]
fn task_fetch_failure_writes_nothing() {
  let (mut cmd, _cwd) = test_support::cmd_bin("weeek-report");
  // The first page points at a cursor no fixture page answers to.
  let pages = json!([{ "success": true, "hasMore": true, "cursor": "gone", "tasks": [{ "id": 1, "title": "A" }] }]);
  cmd
    .envs(test_support::weeek_fixture_env())
    .env("WEEEK_TEST_TASK_PAGES_JSON", pages.to_string())
    .env("WEEEK_API_TOKEN", "test-token")
    .args(["--preview", "--today", "2024-03-03"])
    .assert()
    .failure()
    .stdout(predicate::str::is_empty())
    .stderr(predicate::str::contains("HTTP 404"));
}

#[test]
fn empty_workspace_is_an_error() {
  let (mut cmd, _cwd) = test_support::cmd_bin("weeek-report");
  let pages = json!([{ "success": true, "hasMore": false, "tasks": [] }]);
  cmd
    .envs(test_support::weeek_fixture_env())
    .env("WEEEK_TEST_TASK_PAGES_JSON", pages.to_string())
    .env("WEEEK_API_TOKEN", "test-token")
    .args(["--preview", "--today", "2024-03-03"])
    .assert()
    .failure()
    .stdout(predicate::str::is_empty())
    .stderr(predicate::str::contains("no tasks"));
}

#[test]
fn malformed_env_file_fails_instead_of_half_loading() {
  let (mut cmd, cwd) = test_support::cmd_bin("weeek-report");
  std::fs::write(cwd.path().join("broken.env"), "WEEEK_API_TOKEN=test-token\nWEEEK_REPORT_SHEET_NAME=From file\n").unwrap();

  cmd
    .envs(test_support::weeek_fixture_env())
    .args(["--preview", "--today", "2024-03-03", "--env-file", "broken.env"])
    .assert()
    .failure()
    .stdout(predicate::str::is_empty())
    .stderr(predicate::str::contains("broken.env"));
}

#[test]
fn out_requires_preview() {
  let (mut cmd, _cwd) = test_support::cmd_bin("weeek-report");
  cmd
    .env("WEEEK_API_TOKEN", "test-token")
    .args(["--out", "plan.json"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("--preview"));
}
