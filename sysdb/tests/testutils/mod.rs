//! Test utilities for sysdb integration tests
//!
//! Every fixture owns its own catalog, so tests never share state and can
//! run in parallel.

pub mod test_fixture;
