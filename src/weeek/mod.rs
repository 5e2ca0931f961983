// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Namespace for the WEEEK integration (API seam and typed fetching)
// role: weeek/namespace
// outputs: Public submodules api and fetch
// invariants: Raw JSON never leaves this namespace; callers see Task/Workload and lookup maps
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

pub mod api;
pub mod fetch;
