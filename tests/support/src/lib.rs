//! test-support: helpers for robust, nextest-friendly tests.
//!
//! Add as a dev-dependency in your top-level `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test_support = { path = "tests/support", features = ["serde"] }
//! ```
//!
//! Then in tests:
//! ```rust,ignore
//! use test_support::{cmd_bin, weeek_fixture_env};
//!
//! let (mut cmd, _cwd) = cmd_bin("weeek-report");
//! cmd.envs(weeek_fixture_env());
//! ```

use once_cell::sync::Lazy;
use tracing_subscriber::{fmt, EnvFilter};

use std::env;
use std::path::{Path, PathBuf};

/// Env variables the binary reads WEEEK fixtures from, paired with fixture files.
pub const WEEEK_FIXTURES: [(&str, &str); 3] = [
    ("WEEEK_TEST_MEMBERS_JSON", "weeek/members.json"),
    ("WEEEK_TEST_TASK_PAGES_JSON", "weeek/task_pages.json"),
    ("WEEEK_TEST_BOARD_COLUMNS_JSON", "weeek/board_columns.json"),
];

/// Initialize `tracing` once, honoring `RUST_LOG` and writing via the test writer.
///
/// Safe to call from multiple tests; only the first call configures the global subscriber.
pub fn init_tracing() {
    static INIT: Lazy<()> = Lazy::new(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new("warn,test=info"))
            .unwrap();
        // with_test_writer() causes logs to appear alongside failing tests only (cargo/nextest)
        let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
    });
    Lazy::force(&INIT);
}

/// Return the path to the repository's `tests/fixtures` directory.
///
/// This crate lives in `<repo>/tests/support`, so fixtures sit next to it.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("..").join("fixtures")
}

/// Read a UTF-8 text fixture into a string.
pub fn read_fixture_text<P: AsRef<Path>>(rel_path: P) -> String {
    let path = fixtures_dir().join(rel_path);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()))
}

/// Deserialize a JSON fixture into `T` (enable `serde` feature).
#[cfg(feature = "serde")]
pub fn read_fixture_json<T, P>(rel_path: P) -> T
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = fixtures_dir().join(rel_path);
    let file = std::fs::File::open(&path)
        .unwrap_or_else(|e| panic!("failed to open fixture {}: {e}", path.display()));
    serde_json::from_reader::<_, T>(file)
        .unwrap_or_else(|e| panic!("failed to parse JSON fixture {}: {e}", path.display()))
}

/// `(var, json)` pairs for the canned WEEEK workspace, ready for `Command::envs`.
pub fn weeek_fixture_env() -> Vec<(String, String)> {
    WEEEK_FIXTURES
        .iter()
        .map(|(var, file)| (var.to_string(), read_fixture_text(file)))
        .collect()
}

/// Create a temp directory that deletes on drop.
pub fn tempdir() -> tempfile::TempDir {
    tempfile::tempdir().expect("create tempdir")
}

/// Run a binary target with `assert_cmd`, returning the ready-to-run `Command`.
///
/// The command starts in a fresh temp directory (so no stray `.env` is picked up)
/// with the WEEEK/Google variables of the calling shell removed.
pub fn cmd_bin(bin: &str) -> (assert_cmd::Command, tempfile::TempDir) {
    init_tracing();
    let td = tempdir();
    let mut cmd = assert_cmd::Command::cargo_bin(bin).expect("binary target not found");
    cmd.current_dir(td.path());

    for (key, _) in env::vars() {
        if key.starts_with("WEEEK_") || key.starts_with("GOOGLE_") || key == "RUST_LOG" {
            cmd.env_remove(&key);
        }
    }

    (cmd, td)
}
