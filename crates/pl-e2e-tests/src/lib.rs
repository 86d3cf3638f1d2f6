//! Test-only crate. See `tests/` for the end-to-end suites and
//! `tests/helpers/mod.rs` for the shared harness.
