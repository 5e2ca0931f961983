use test_support;

#[test]
fn gen_man_outputs_troff() {
  let (mut cmd, _cwd) = test_support::cmd_bin("weeek-report");
  let out = cmd.args(["--gen-man"]).output().unwrap();
  assert!(out.status.success());
  let s = String::from_utf8_lossy(&out.stdout);
  assert!(s.contains(".TH"), "expected troff man header");
  assert!(s.contains("weeek-report"));
  assert!(s.contains("preview"));
}
